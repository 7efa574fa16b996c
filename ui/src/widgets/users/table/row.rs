//! Row rendering for the users table.

use egui::{Stroke, Ui};
use egui_extras::TableRow;
use roster_business::UserRecord;

use super::cells::{
    render_action_buttons, render_created_cell, render_email_cell, render_role_cell,
    render_status_cell, render_username_cell,
};

/// A table action requested from a row's buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

/// Renders a single user row with all cells.
///
/// Returns the action requested from this row's buttons, if any. The panel
/// applies the action after the table has rendered, so the row itself never
/// needs mutable access to the state context.
#[inline]
pub fn render_user_row(row: &mut TableRow<'_, '_>, user: &UserRecord) -> Option<RowAction> {
    let mut action = None;

    // Username cell
    row.col(|ui| {
        render_username_cell(ui, &user.username);
        draw_cell_bottom_border(ui);
    });

    // Email cell
    row.col(|ui| {
        render_email_cell(ui, &user.email);
        draw_cell_bottom_border(ui);
    });

    // Role badge cell
    row.col(|ui| {
        render_role_cell(ui, user.role);
        draw_cell_bottom_border(ui);
    });

    // Status cell
    row.col(|ui| {
        render_status_cell(ui, user.status);
        draw_cell_bottom_border(ui);
    });

    // Created timestamp cell
    row.col(|ui| {
        render_created_cell(ui, &user.created_at);
        draw_cell_bottom_border(ui);
    });

    // Action buttons
    row.col(|ui| {
        action = render_action_buttons(ui);
        draw_cell_bottom_border(ui);
    });

    action
}

/// Draws a bottom border line for a cell.
#[inline]
fn draw_cell_bottom_border(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let border_color = ui.visuals().widgets.noninteractive.bg_stroke.color;
    ui.painter().hline(
        rect.left()..=rect.right(),
        rect.bottom(),
        Stroke::new(1.0, border_color),
    );
}
