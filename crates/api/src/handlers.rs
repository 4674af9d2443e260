pub mod agenda;
pub mod assistant;
pub mod auth;
pub mod events;
pub mod profiles;
pub mod reports;
pub mod settings;
pub mod views;
