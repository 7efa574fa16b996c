//! Users "actions" cache + commands: the save and delete flows.
//!
//! Both flows touch two stores (identity, then profile), so a command, not
//! the UI, owns the sequencing:
//!
//! - `SaveUserCommand` updates identity then profile, and rolls the identity
//!   store back to the pre-edit values when the profile update fails.
//! - `DeleteUserCommand` deletes identity then profile; deletes treat 404 as
//!   success so a retry after a partial failure converges.
//!
//! UI sets [`UserActionInput`], dispatches the command, and reads progress
//! via `ctx.cached::<UserActionCompute>()`.

use std::any::Any;

use log::{error, info};
use roster_states::{
    Command, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater, State, Updater,
    compute_assign_impl,
};
use ustr::Ustr;

use crate::config::AppConfig;

use super::api;
use super::types::{EditDraft, IdentityUpdateRequest, ProfileUpdateRequest};

/// Strongly-typed action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserActionKind {
    Save,
    Delete,
}

/// Strongly-typed action state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserActionState {
    /// No active action.
    #[default]
    Idle,

    /// An action is currently running.
    InFlight { kind: UserActionKind, user: Ustr },

    /// An action succeeded against both stores.
    Success {
        kind: UserActionKind,
        user: Ustr,
        id: Ustr,
        /// The draft that was applied, for `Save`; `None` for `Delete`.
        draft: Option<EditDraft>,
    },

    /// An action failed. `message` names the phase that failed.
    Error {
        kind: UserActionKind,
        user: Ustr,
        message: String,
    },
}

/// Command-fed cache for user actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserActionCompute {
    pub state: UserActionState,
}

impl UserActionCompute {
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, UserActionState::InFlight { .. })
    }

    pub fn state(&self) -> &UserActionState {
        &self.state
    }
}

impl Compute for UserActionCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        // Updated explicitly by commands; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Intentionally no-op.
        //
        // Side effects (network) must not run inside a Compute due to implicit
        // execution. Dispatch one of the action commands to update this cache.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        compute_assign_impl(self, new_self);
    }
}

/// Input state for user actions.
///
/// UI sets these fields before dispatching the corresponding command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserActionInput {
    /// Target record id.
    pub user_id: Option<Ustr>,

    /// Target username, carried into action states for display.
    pub username: Option<Ustr>,

    /// Draft applied by `SaveUserCommand`.
    pub draft: Option<EditDraft>,

    /// Pre-edit values, used to roll the identity store back when the
    /// profile update fails.
    pub previous: Option<EditDraft>,
}

impl State for UserActionInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        Some(Box::new(self.clone()))
    }
}

fn missing(field: &str, cmd: &str) -> String {
    format!("{cmd}: missing required input field `{field}`")
}

fn error_state(kind: UserActionKind, user: Ustr, message: String) -> UserActionCompute {
    UserActionCompute {
        state: UserActionState::Error {
            kind,
            user,
            message,
        },
    }
}

/// Manual-only command that saves an edit draft to both stores.
///
/// Dispatch via `ctx.dispatch::<SaveUserCommand>()` after filling
/// [`UserActionInput`] with `user_id`, `username`, `draft` and `previous`.
#[derive(Default, Debug)]
pub struct SaveUserCommand;

impl Command for SaveUserCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let input: UserActionInput = snap.state::<UserActionInput>().clone();
        let config: AppConfig = snap.state::<AppConfig>().clone();

        Box::pin(async move {
            let kind = UserActionKind::Save;
            let user = input.username.unwrap_or_else(|| Ustr::from(""));

            let Some(id) = input.user_id else {
                updater.set(error_state(kind, user, missing("user_id", "SaveUserCommand")));
                return;
            };
            let Some(draft) = input.draft else {
                updater.set(error_state(kind, user, missing("draft", "SaveUserCommand")));
                return;
            };
            let Some(previous) = input.previous else {
                updater.set(error_state(kind, user, missing("previous", "SaveUserCommand")));
                return;
            };

            updater.set(UserActionCompute {
                state: UserActionState::InFlight { kind, user },
            });

            info!("saving user {id} to both stores");

            let base = config.api_base_url.as_str();
            let key = config.service_key();

            // Phase one: identity store.
            let identity = IdentityUpdateRequest {
                email: draft.email.clone(),
                display_name: draft.username.clone(),
            };
            if let Err(err) = api::update_identity(base, key, id.as_str(), &identity).await {
                error!("identity update failed for user {id}: {err}");
                updater.set(error_state(
                    kind,
                    user,
                    format!("identity update failed: {err}"),
                ));
                return;
            }

            // Phase two: profile store. On failure the identity change from
            // phase one is reverted so the stores keep agreeing.
            let profile = ProfileUpdateRequest {
                username: draft.username.clone(),
                email: draft.email.clone(),
                role: draft.role,
            };
            match api::update_profile(base, key, id.as_str(), &profile).await {
                Ok(()) => {
                    updater.set(UserActionCompute {
                        state: UserActionState::Success {
                            kind,
                            user,
                            id,
                            draft: Some(draft),
                        },
                    });
                }
                Err(profile_err) => {
                    let rollback = IdentityUpdateRequest {
                        email: previous.email.clone(),
                        display_name: previous.username.clone(),
                    };
                    let message =
                        match api::update_identity(base, key, id.as_str(), &rollback).await {
                            Ok(()) => format!(
                                "profile update failed, identity change rolled back: {profile_err}"
                            ),
                            Err(rollback_err) => format!(
                                "profile update failed: {profile_err}; identity rollback also failed: {rollback_err}. Reload and retry the save."
                            ),
                        };
                    error!("save failed for user {id}: {message}");
                    updater.set(error_state(kind, user, message));
                }
            }
        })
    }
}

/// Manual-only command that deletes a user from both stores.
///
/// Dispatch via `ctx.dispatch::<DeleteUserCommand>()` after filling
/// [`UserActionInput`] with `user_id` and `username`.
#[derive(Default, Debug)]
pub struct DeleteUserCommand;

impl Command for DeleteUserCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let input: UserActionInput = snap.state::<UserActionInput>().clone();
        let config: AppConfig = snap.state::<AppConfig>().clone();

        Box::pin(async move {
            let kind = UserActionKind::Delete;
            let user = input.username.unwrap_or_else(|| Ustr::from(""));

            let Some(id) = input.user_id else {
                updater.set(error_state(
                    kind,
                    user,
                    missing("user_id", "DeleteUserCommand"),
                ));
                return;
            };

            updater.set(UserActionCompute {
                state: UserActionState::InFlight { kind, user },
            });

            info!("deleting user {id} from both stores");

            let base = config.api_base_url.as_str();
            let key = config.service_key();

            if let Err(err) = api::delete_identity(base, key, id.as_str()).await {
                error!("identity delete failed for user {id}: {err}");
                updater.set(error_state(
                    kind,
                    user,
                    format!("identity delete failed: {err}"),
                ));
                return;
            }

            match api::delete_profile(base, key, id.as_str()).await {
                Ok(()) => {
                    updater.set(UserActionCompute {
                        state: UserActionState::Success {
                            kind,
                            user,
                            id,
                            draft: None,
                        },
                    });
                }
                Err(err) => {
                    // The identity record is already gone; deletes tolerate
                    // 404, so retrying finishes the job.
                    error!("profile delete failed for user {id}: {err}");
                    updater.set(error_state(
                        kind,
                        user,
                        format!("profile delete failed, retry to finish removing the user: {err}"),
                    ));
                }
            }
        })
    }
}
