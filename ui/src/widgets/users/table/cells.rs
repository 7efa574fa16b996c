//! Cell rendering functions for the users table.
//!
//! Each function renders a specific type of cell content with
//! centered alignment and appropriate styling.

use chrono::{DateTime, Utc};
use egui::{Color32, RichText, Ui};
use roster_business::{AccountStatus, Role};

use super::row::RowAction;
use crate::utils::colors::{COLOR_AMBER, COLOR_BLUE, COLOR_GRAY, COLOR_GREEN, COLOR_RED};
use crate::utils::format::format_created_at;

/// Renders the username cell.
#[inline]
pub fn render_username_cell(ui: &mut Ui, username: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(username);
    });
}

/// Renders the email cell.
#[inline]
pub fn render_email_cell(ui: &mut Ui, email: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(email);
    });
}

/// Renders the role cell as a colored badge.
#[inline]
pub fn render_role_cell(ui: &mut Ui, role: Role) {
    ui.centered_and_justified(|ui| {
        ui.label(
            RichText::new(role.to_string())
                .color(role_color(role))
                .strong(),
        );
    });
}

/// Gets the badge color for a role.
///
/// Colors:
/// - Red: admin
/// - Blue: moderator
/// - Green: user
/// - Gray: unknown roles from newer backends
#[inline]
fn role_color(role: Role) -> Color32 {
    match role {
        Role::Admin => COLOR_RED,
        Role::Moderator => COLOR_BLUE,
        Role::User => COLOR_GREEN,
        Role::Unknown => COLOR_GRAY,
    }
}

/// Renders the account status cell with color coding.
#[inline]
pub fn render_status_cell(ui: &mut Ui, status: AccountStatus) {
    let color = match status {
        AccountStatus::Active => COLOR_GREEN,
        AccountStatus::Suspended => COLOR_AMBER,
    };

    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(status.to_string()).color(color));
    });
}

/// Renders the creation date cell.
#[inline]
pub fn render_created_cell(ui: &mut Ui, created_at: &DateTime<Utc>) {
    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(format_created_at(created_at)).monospace());
    });
}

/// Renders the action buttons cell.
///
/// Returns the action to start if any button was clicked.
#[inline]
pub fn render_action_buttons(ui: &mut Ui) -> Option<RowAction> {
    let mut action = None;

    ui.centered_and_justified(|ui| {
        ui.horizontal(|ui| {
            if ui.button("✏️ Edit").on_hover_text("Edit user").clicked() {
                action = Some(RowAction::Edit);
            }
            if ui.button("🗑️").on_hover_text("Delete user").clicked() {
                action = Some(RowAction::Delete);
            }
        });
    });

    action
}
