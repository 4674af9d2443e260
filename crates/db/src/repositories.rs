pub mod account;
pub mod event;
pub mod profile;
pub mod site_stats;
