//! Users "fetch all" cache + command.
//!
//! A command-fed cache (`FetchUsersCompute`) stores the latest status/result
//! and a manual-only command (`FetchUsersCommand`) performs the network IO,
//! publishing into the cache via `LatestOnlyUpdater::set()`.
//!
//! The users page reads the cache via `ctx.cached::<FetchUsersCompute>()`,
//! folds a terminal result into [`UsersState`](super::state::UsersState),
//! then resets the cache to `Idle` so each result is consumed exactly once.

use std::any::Any;

use log::{error, info};
use roster_states::{
    Command, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater, Updater,
    compute_assign_impl,
};

use crate::config::AppConfig;

use super::api;
use super::types::UserRecord;

/// Status/result of the directory list call.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchUsersResult {
    /// No request has been made yet (or the cache was consumed).
    #[default]
    Idle,

    /// A fetch is currently in-flight.
    Loading,

    /// The last fetch succeeded with these users, newest first.
    Loaded(Vec<UserRecord>),

    /// The last fetch failed with this error message.
    Error(String),
}

/// Command-fed cache for the full user list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchUsersCompute {
    pub result: FetchUsersResult,
}

impl FetchUsersCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.result, FetchUsersResult::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            FetchUsersResult::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn users(&self) -> Option<&[UserRecord]> {
        match &self.result {
            FetchUsersResult::Loaded(users) => Some(users.as_slice()),
            _ => None,
        }
    }
}

impl Compute for FetchUsersCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Intentionally no-op.
        //
        // Side effects (network) must not run inside a Compute due to implicit
        // execution. Dispatch `FetchUsersCommand` to update this cache.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        compute_assign_impl(self, new_self);
    }
}

/// Manual-only command that fetches every user record.
///
/// Dispatch explicitly via `ctx.dispatch::<FetchUsersCommand>()`.
#[derive(Default, Debug)]
pub struct FetchUsersCommand;

impl Command for FetchUsersCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let config: AppConfig = snap.state::<AppConfig>().clone();

        Box::pin(async move {
            info!("fetching the user directory");

            // Set loading immediately.
            updater.set(FetchUsersCompute {
                result: FetchUsersResult::Loading,
            });

            match api::list_users(&config.api_base_url, config.service_key()).await {
                Ok(mut users) => {
                    // Newest first, even when the store ignores the order param.
                    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                    updater.set(FetchUsersCompute {
                        result: FetchUsersResult::Loaded(users),
                    });
                }
                Err(err) => {
                    error!("user directory fetch failed: {err}");
                    updater.set(FetchUsersCompute {
                        result: FetchUsersResult::Error(err.to_string()),
                    });
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::types::Role;
    use chrono::{TimeZone as _, Utc};

    fn loaded(users: Vec<UserRecord>) -> FetchUsersCompute {
        FetchUsersCompute {
            result: FetchUsersResult::Loaded(users),
        }
    }

    #[test]
    fn test_cache_defaults_to_idle() {
        let cache = FetchUsersCompute::default();
        assert_eq!(cache.result, FetchUsersResult::Idle);
        assert!(!cache.is_loading());
        assert!(cache.users().is_none());
        assert!(cache.error_message().is_none());
    }

    #[test]
    fn test_cache_helpers_follow_result() {
        let cache = FetchUsersCompute {
            result: FetchUsersResult::Loading,
        };
        assert!(cache.is_loading());

        let user = UserRecord {
            id: "u_1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Admin,
            status: Default::default(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        let cache = loaded(vec![user]);
        assert_eq!(cache.users().map(<[UserRecord]>::len), Some(1));

        let cache = FetchUsersCompute {
            result: FetchUsersResult::Error("ListUsers failed".to_string()),
        };
        assert_eq!(cache.error_message(), Some("ListUsers failed"));
    }

    #[test]
    fn test_assign_box_replaces_cache() {
        let mut cache = FetchUsersCompute::default();
        cache.assign_box(Box::new(FetchUsersCompute {
            result: FetchUsersResult::Loading,
        }));
        assert!(cache.is_loading());
    }
}
