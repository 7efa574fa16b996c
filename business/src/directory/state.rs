//! Frame-owned state for the users page.
//!
//! `UsersState` is the single source the table renders from. Commands never
//! write it directly: their results land in command-fed caches
//! ([`FetchUsersResult`](super::fetch_users_compute::FetchUsersResult),
//! [`UserActionState`](super::action_compute::UserActionState)) and the page
//! folds those into this state at the top of the frame.

use chrono::{DateTime, Utc};
use roster_states::State;
use ustr::Ustr;

use super::types::{EditDraft, UserRecord};

/// The modal currently open over the users table, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDialog {
    /// Edit modal with the in-progress draft. The draft starts as a copy of
    /// the record and only touches the record on a successful save.
    Edit { id: Ustr, draft: EditDraft },
    /// Delete confirmation for the named user.
    ConfirmDelete { id: Ustr, username: Ustr },
}

/// Everything the users page renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    /// Full record set, newest first. Filtering happens downstream in
    /// [`VisibleUsersCompute`](super::visible_compute::VisibleUsersCompute).
    pub users: Vec<UserRecord>,
    pub is_fetching: bool,
    /// Set on the first fetch dispatch so mounting the page loads exactly
    /// once.
    pub load_started: bool,
    /// The page-level banner. Fetch failures and action failures share this
    /// slot; reloading clears it.
    pub error: Option<String>,
    pub last_fetch: Option<DateTime<Utc>>,
    pub dialog: Option<UserDialog>,
}

impl UsersState {
    /// Mark a fetch as dispatched. Clears the banner, so a reload dismisses
    /// a previous error.
    pub fn begin_fetch(&mut self) {
        self.is_fetching = true;
        self.load_started = true;
        self.error = None;
    }

    pub fn finish_fetch(&mut self, users: Vec<UserRecord>, now: DateTime<Utc>) {
        self.users = users;
        self.is_fetching = false;
        self.error = None;
        self.last_fetch = Some(now);
    }

    pub fn fail_fetch(&mut self, message: impl Into<String>) {
        self.is_fetching = false;
        self.error = Some(message.into());
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn user(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn open_edit(&mut self, record: &UserRecord) {
        self.dialog = Some(UserDialog::Edit {
            id: Ustr::from(record.id.as_str()),
            draft: EditDraft::from_record(record),
        });
    }

    pub fn open_delete(&mut self, record: &UserRecord) {
        self.dialog = Some(UserDialog::ConfirmDelete {
            id: Ustr::from(record.id.as_str()),
            username: Ustr::from(record.username.as_str()),
        });
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Shallow-merge a saved draft into the matching record. The id and
    /// creation date are immutable and survive untouched.
    pub fn patch_user(&mut self, id: &str, draft: &EditDraft) {
        if let Some(user) = self.users.iter_mut().find(|user| user.id == id) {
            user.username = draft.username.clone();
            user.email = draft.email.clone();
            user.role = draft.role;
        }
    }

    pub fn remove_user(&mut self, id: &str) {
        self.users.retain(|user| user.id != id);
    }
}

impl State for UsersState {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::types::Role;
    use chrono::TimeZone as _;

    fn record(id: &str, username: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: Role::User,
            status: Default::default(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 14, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_begin_fetch_dismisses_previous_error() {
        let mut state = UsersState::default();
        state.fail_fetch("ListUsers: boom");
        assert!(state.error.is_some());
        assert!(!state.is_fetching);

        state.begin_fetch();
        assert!(state.error.is_none());
        assert!(state.is_fetching);
        assert!(state.load_started);
    }

    #[test]
    fn test_finish_fetch_replaces_users_and_stamps_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut state = UsersState::default();
        state.begin_fetch();
        state.finish_fetch(vec![record("u_1", "alice")], now);

        assert_eq!(state.users.len(), 1);
        assert!(!state.is_fetching);
        assert_eq!(state.last_fetch, Some(now));
    }

    #[test]
    fn test_open_edit_seeds_draft_from_record() {
        let mut state = UsersState::default();
        let alice = record("u_1", "alice");
        state.open_edit(&alice);

        match state.dialog {
            Some(UserDialog::Edit { ref id, ref draft }) => {
                assert_eq!(id.as_str(), "u_1");
                assert_eq!(draft.username, "alice");
                assert_eq!(draft.email, "alice@example.com");
                assert_eq!(draft.role, Role::User);
            }
            ref other => panic!("expected edit dialog, got {other:?}"),
        }

        state.close_dialog();
        assert!(state.dialog.is_none());
    }

    #[test]
    fn test_patch_user_keeps_id_and_created_at() {
        let mut state = UsersState {
            users: vec![record("u_1", "alice"), record("u_2", "bob")],
            ..Default::default()
        };
        let created_at = state.users[1].created_at;

        let draft = EditDraft {
            username: "robert".to_string(),
            email: "robert@example.com".to_string(),
            role: Role::Moderator,
        };
        state.patch_user("u_2", &draft);

        let bob = state.user("u_2").expect("u_2 still present");
        assert_eq!(bob.username, "robert");
        assert_eq!(bob.email, "robert@example.com");
        assert_eq!(bob.role, Role::Moderator);
        assert_eq!(bob.created_at, created_at);
        assert_eq!(state.user("u_1").unwrap().username, "alice");
    }

    #[test]
    fn test_patch_unknown_id_is_a_no_op() {
        let mut state = UsersState {
            users: vec![record("u_1", "alice")],
            ..Default::default()
        };
        let before = state.users.clone();
        state.patch_user("u_404", &EditDraft::default());
        assert_eq!(state.users, before);
    }

    #[test]
    fn test_remove_user_drops_only_the_target() {
        let mut state = UsersState {
            users: vec![record("u_1", "alice"), record("u_2", "bob")],
            ..Default::default()
        };
        state.remove_user("u_1");
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].id, "u_2");
    }
}
