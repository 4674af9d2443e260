pub mod event;
pub mod profile;
pub mod settings;
