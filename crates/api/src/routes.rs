pub mod account;
pub mod assistant;
pub mod health;
pub mod schedule;
pub mod site;
