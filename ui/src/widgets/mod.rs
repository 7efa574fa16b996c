mod api_health;
mod env_version;
pub mod users;

pub use api_health::api_health;
pub use env_version::env_version;
pub use users::users_panel;
