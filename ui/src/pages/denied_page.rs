//! Access denied page for non-administrator sessions.
//!
//! The user directory is admin-only. Anyone else lands here instead of the
//! table, with a hint about which account is signed in.

use crate::{state::State, utils::colors::COLOR_AMBER};
use egui::{Response, RichText, Ui};
use roster_business::SessionState;

/// Renders the access denied page.
pub fn denied_page(state: &mut State, ui: &mut Ui) -> Response {
    let session = state.ctx.state::<SessionState>();
    let hint = match session.operator() {
        Some(operator) => {
            format!("Signed in as {operator}, which is not an administrator role.")
        }
        None => "No session is active.".to_owned(),
    };

    ui.vertical(|ui| {
        ui.heading("Access denied");
        ui.add_space(8.0);

        ui.colored_label(
            COLOR_AMBER,
            RichText::new("⚠️ This page requires an administrator account.").strong(),
        );
        ui.add_space(4.0);
        ui.label(hint);
    })
    .response
}
