//! Modal dialogs for user management actions.
//!
//! Both dialogs read the open [`UserDialog`] from [`UsersState`], render a
//! window over the table, and enqueue the matching command when confirmed.
//! While a command is in flight the dialog shows a spinner instead of its
//! controls, so a save or delete cannot be double-submitted.

use egui::{Color32, RichText, Ui, Window};
use roster_business::{
    DeleteUserCommand, EditDraft, Role, SaveUserCommand, UserActionCompute, UserActionInput,
    UserDialog, UserRecord, UsersState,
};
use roster_states::StateCtx;
use ustr::Ustr;

/// Shows the edit modal for the open [`UserDialog::Edit`] dialog.
pub fn show_edit_user_modal(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let Some(UserDialog::Edit { id, draft }) = state_ctx.state::<UsersState>().dialog.clone()
    else {
        return;
    };

    let Some(record) = state_ctx.state::<UsersState>().user(id.as_str()).cloned() else {
        // The record disappeared under the dialog.
        state_ctx.update::<UsersState>(|state| state.close_dialog());
        return;
    };

    let in_flight = state_ctx
        .cached::<UserActionCompute>()
        .is_some_and(|action| action.is_in_flight());

    let mut draft = draft;
    let mut open = true;
    let mut submitted: Option<EditDraft> = None;
    let mut cancel = false;

    Window::new(format!("Edit User - {}", record.username))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            if in_flight {
                ui.label("Saving changes...");
                ui.spinner();
                return;
            }

            ui.horizontal(|ui| {
                ui.label("Username:");
                ui.text_edit_singleline(&mut draft.username);
            });
            ui.horizontal(|ui| {
                ui.label("Email:");
                ui.text_edit_singleline(&mut draft.email);
            });
            ui.horizontal(|ui| {
                ui.label("Role:");
                egui::ComboBox::from_id_salt("edit_user_role")
                    .selected_text(draft.role.to_string())
                    .show_ui(ui, |ui| {
                        for role in Role::ALL {
                            ui.selectable_value(&mut draft.role, role, role.to_string());
                        }
                    });
            });

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                let can_save = !draft.username.trim().is_empty() && draft.email.contains('@');

                if ui
                    .add_enabled(can_save, egui::Button::new("Save"))
                    .clicked()
                {
                    submitted = Some(draft.clone());
                }

                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    // Keep this frame's edits in the dialog without touching the record.
    if !in_flight
        && let Some(UserDialog::Edit { draft: current, .. }) =
            &mut state_ctx.state_mut::<UsersState>().dialog
    {
        *current = draft;
    }

    if let Some(applied) = submitted {
        start_save(state_ctx, &record, applied);
    }

    if cancel || !open {
        state_ctx.update::<UsersState>(|state| state.close_dialog());
    }
}

/// Fills [`UserActionInput`] and enqueues the save command.
///
/// `previous` is taken from the record before the edit so the command can
/// roll the identity store back if the profile update fails.
fn start_save(state_ctx: &mut StateCtx, record: &UserRecord, draft: EditDraft) {
    let user_id = Ustr::from(record.id.as_str());
    let username = Ustr::from(record.username.as_str());
    let previous = EditDraft::from_record(record);

    state_ctx.update::<UserActionInput>(|input| {
        input.user_id = Some(user_id);
        input.username = Some(username);
        input.draft = Some(draft);
        input.previous = Some(previous);
    });

    state_ctx.enqueue_command::<SaveUserCommand>();
}

/// Shows the delete confirmation for the open [`UserDialog::ConfirmDelete`].
pub fn show_delete_user_modal(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let Some(UserDialog::ConfirmDelete { id, username }) =
        state_ctx.state::<UsersState>().dialog.clone()
    else {
        return;
    };

    let in_flight = state_ctx
        .cached::<UserActionCompute>()
        .is_some_and(|action| action.is_in_flight());

    let mut open = true;
    let mut confirmed = false;
    let mut cancel = false;

    Window::new(format!("Delete User - {username}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            if in_flight {
                ui.label("Deleting user...");
                ui.spinner();
                return;
            }

            ui.colored_label(Color32::from_rgb(255, 165, 0), "⚠️ Warning");
            ui.add_space(4.0);
            ui.label(format!(
                "Are you sure you want to delete user '{username}'?"
            ));
            ui.label("This action cannot be undone.");

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui
                    .button(RichText::new("Delete").color(Color32::RED))
                    .clicked()
                {
                    confirmed = true;
                }

                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if confirmed {
        start_delete(state_ctx, id, username);
    }

    if cancel || !open {
        state_ctx.update::<UsersState>(|state| state.close_dialog());
    }
}

/// Fills [`UserActionInput`] and enqueues the delete command.
fn start_delete(state_ctx: &mut StateCtx, id: Ustr, username: Ustr) {
    state_ctx.update::<UserActionInput>(|input| {
        input.user_id = Some(id);
        input.username = Some(username);
        input.draft = None;
        input.previous = None;
    });

    state_ctx.enqueue_command::<DeleteUserCommand>();
}
