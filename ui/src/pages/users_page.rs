//! User management page for administrator sessions.
//!
//! Thin wrapper around the users panel: heading plus the table, filters and
//! dialogs.

use crate::{state::State, widgets};
use egui::{Response, Ui};

/// Renders the user management page.
pub fn users_page(state: &mut State, ui: &mut Ui) -> Response {
    ui.vertical(|ui| {
        ui.heading("User Management");
        ui.add_space(8.0);

        widgets::users_panel(&mut state.ctx, ui);
    })
    .response
}
