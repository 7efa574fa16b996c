//! Main panel for the users table.
//!
//! The panel folds finished command results into [`UsersState`] at the top
//! of every frame, renders from plain states and caches, and enqueues
//! commands for everything that must reach the network. Commands are
//! enqueued only; the app loop flushes them end-of-frame.

use egui::{Response, Ui};
use egui_extras::TableBuilder;
use roster_business::{
    AccountStatus, FetchUsersCommand, FetchUsersCompute, FetchUsersResult, FilterCriteria, Role,
    UserActionCompute, UserActionKind, UserActionState, UserDialog, UserRecord, UsersState,
    VisibleUsersCompute,
};
use roster_states::{StateCtx, Time};

use crate::utils::colors::COLOR_RED;

use super::modals::{show_delete_user_modal, show_edit_user_modal};
use super::table::columns::{HEADER_HEIGHT, ROW_HEIGHT, table_columns};
use super::table::header::render_table_header;
use super::table::row::{RowAction, render_user_row};

/// Displays the users panel: toolbar, error banner, filter row, table and
/// any open modal.
pub fn users_panel(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    integrate_results(state_ctx);
    ensure_loaded(state_ctx);

    ui.vertical(|ui| {
        toolbar(state_ctx, ui);
        error_banner(state_ctx, ui);

        ui.add_space(8.0);
        filter_row(state_ctx, ui);
        ui.add_space(8.0);

        users_table(state_ctx, ui);

        // Modals float above the table as windows.
        match state_ctx.state::<UsersState>().dialog.clone() {
            Some(UserDialog::Edit { .. }) => show_edit_user_modal(state_ctx, ui),
            Some(UserDialog::ConfirmDelete { .. }) => show_delete_user_modal(state_ctx, ui),
            None => {}
        }
    })
    .response
}

/// Folds finished command results into [`UsersState`].
///
/// Each cache is reset to idle after folding so a result is applied exactly
/// once even though the panel renders every frame.
fn integrate_results(state_ctx: &mut StateCtx) {
    let fetch = state_ctx.cached::<FetchUsersCompute>().cloned();
    match fetch.map(|cache| cache.result) {
        Some(FetchUsersResult::Loaded(users)) => {
            let now = *state_ctx.state::<Time>().as_ref();
            state_ctx.update::<UsersState>(|state| state.finish_fetch(users, now));
            state_ctx.updater().set(FetchUsersCompute::default());
        }
        Some(FetchUsersResult::Error(message)) => {
            state_ctx.update::<UsersState>(|state| state.fail_fetch(message));
            state_ctx.updater().set(FetchUsersCompute::default());
        }
        Some(FetchUsersResult::Idle | FetchUsersResult::Loading) | None => {}
    }

    let action = state_ctx.cached::<UserActionCompute>().cloned();
    match action.map(|cache| cache.state) {
        Some(UserActionState::Success {
            kind, id, draft, ..
        }) => {
            state_ctx.update::<UsersState>(|state| {
                match kind {
                    UserActionKind::Save => {
                        if let Some(draft) = &draft {
                            state.patch_user(id.as_str(), draft);
                        }
                    }
                    UserActionKind::Delete => state.remove_user(id.as_str()),
                }
                state.close_dialog();
            });
            state_ctx.updater().set(UserActionCompute::default());
        }
        Some(UserActionState::Error { message, .. }) => {
            // The dialog stays open with the draft intact: deletes converge
            // on retry, and a failed save can be resubmitted or cancelled.
            state_ctx.update::<UsersState>(|state| state.set_error(message));
            state_ctx.updater().set(UserActionCompute::default());
        }
        Some(UserActionState::Idle | UserActionState::InFlight { .. }) | None => {}
    }
}

/// Fetches the full directory exactly once, on the panel's first frame.
fn ensure_loaded(state_ctx: &mut StateCtx) {
    if !state_ctx.state::<UsersState>().load_started {
        start_fetch(state_ctx);
    }
}

fn start_fetch(state_ctx: &mut StateCtx) {
    state_ctx.update::<UsersState>(|state| state.begin_fetch());
    state_ctx.enqueue_command::<FetchUsersCommand>();
}

fn toolbar(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let is_fetching = state_ctx.state::<UsersState>().is_fetching;

    ui.horizontal(|ui| {
        if ui.button("🔄 Refresh").clicked() && !is_fetching {
            start_fetch(state_ctx);
        }

        if is_fetching {
            ui.spinner();
            ui.label("Loading users...");
        }
    });
}

fn error_banner(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let Some(error) = state_ctx.state::<UsersState>().error.clone() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.colored_label(COLOR_RED, format!("Error: {error}"));
        // Reloading is the only way to dismiss the banner.
        if ui.button("Reload").clicked() {
            start_fetch(state_ctx);
        }
    });
}

fn filter_row(state_ctx: &mut StateCtx, ui: &mut Ui) {
    // Clone-and-writeback so dependents of the criteria are marked dirty
    // only when something actually changed.
    let mut criteria = state_ctx.state::<FilterCriteria>().clone();
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Search:");
        changed |= ui
            .add(
                egui::TextEdit::singleline(&mut criteria.search_text)
                    .hint_text("username or email"),
            )
            .changed();

        ui.label("Role:");
        let selected = criteria
            .role
            .map_or_else(|| "All".to_owned(), |role| role.to_string());
        egui::ComboBox::from_id_salt("role_filter")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut criteria.role, None, "All")
                    .changed();
                for role in Role::ALL {
                    changed |= ui
                        .selectable_value(&mut criteria.role, Some(role), role.to_string())
                        .changed();
                }
            });

        ui.label("Status:");
        let selected = criteria
            .status
            .map_or_else(|| "All".to_owned(), |status| status.to_string());
        egui::ComboBox::from_id_salt("status_filter")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut criteria.status, None, "All")
                    .changed();
                for status in AccountStatus::ALL {
                    changed |= ui
                        .selectable_value(&mut criteria.status, Some(status), status.to_string())
                        .changed();
                }
            });

        if !criteria.is_empty() && ui.button("Clear").clicked() {
            criteria.clear();
            changed = true;
        }
    });

    if changed {
        state_ctx.update::<FilterCriteria>(|current| *current = criteria);
    }
}

fn users_table(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let users_state = state_ctx.state::<UsersState>();
    let store_empty = users_state.users.is_empty();
    let is_fetching = users_state.is_fetching;

    if store_empty {
        if !is_fetching {
            ui.label("No users yet.");
        }
        return;
    }

    let visible: Vec<UserRecord> = state_ctx
        .cached::<VisibleUsersCompute>()
        .map(|cache| cache.users.clone())
        .unwrap_or_default();

    if visible.is_empty() {
        ui.label("No users match the current filters.");
        return;
    }

    let mut action: Option<(RowAction, UserRecord)> = None;

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
    for column in table_columns() {
        table = table.column(column);
    }

    table
        .header(HEADER_HEIGHT, |mut header| {
            render_table_header(&mut header);
        })
        .body(|mut body| {
            for user in &visible {
                body.row(ROW_HEIGHT, |mut row| {
                    if let Some(row_action) = render_user_row(&mut row, user) {
                        action = Some((row_action, user.clone()));
                    }
                });
            }
        });

    if let Some((row_action, record)) = action {
        state_ctx.update::<UsersState>(|state| match row_action {
            RowAction::Edit => state.open_edit(&record),
            RowAction::Delete => state.open_delete(&record),
        });
    }
}
