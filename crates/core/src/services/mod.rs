//! Application services sitting between the HTTP layer and the ports.

pub mod assistant;
pub mod events;
pub mod profiles;
pub mod settings;
pub mod views;

pub use assistant::Assistant;
pub use events::EventGateway;
pub use profiles::ProfileGateway;
pub use settings::SiteConfigGateway;
pub use views::ViewCountGateway;
