//! User directory widgets.
//!
//! `users_panel` is the entry point: toolbar, filters, the records table and
//! whichever modal dialog is open.

mod modals;
mod panel;
pub mod table;

pub use panel::users_panel;
