//! Pages module for the application.
//!
//! This module contains the different pages that can be displayed based on the route:
//! - `users_page`: User management table for administrator sessions
//! - `denied_page`: Shown when the current session is not an administrator

mod denied_page;
mod users_page;

pub use denied_page::denied_page;
pub use users_page::users_page;
