//! Domain model and rules of the weekly work schedule.

pub mod access;
pub mod agenda;
pub mod errors;
pub mod models;
pub mod ports;
pub mod report;
pub mod services;
pub mod week;
