
mod agenda_test;
mod assistant_test;
mod auth_test;
mod events_test;
mod middleware_test;
mod reports_test;
mod settings_test;
