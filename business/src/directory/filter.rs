//! User list filtering.
//!
//! The criteria live in a plain state the filter row widgets mutate through
//! [`StateCtx::update`](roster_states::StateCtx::update); the actual
//! filtering is a pure function so it can be tested without a context and
//! reused by [`VisibleUsersCompute`](super::visible_compute::VisibleUsersCompute).

use roster_states::State;

use super::types::{AccountStatus, Role, UserRecord};

/// Filter inputs owned by the users page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Matched case-insensitively against username and email.
    pub search_text: String,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl FilterCriteria {
    /// True when no criterion would exclude any record.
    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty() && self.role.is_none() && self.status.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl State for FilterCriteria {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Apply `criteria` to `users`, preserving input order.
///
/// Search text matches as a case-insensitive substring of the username or
/// the email; role and status are exact matches when set. Empty criteria
/// return the whole input.
pub fn filter_users(users: &[UserRecord], criteria: &FilterCriteria) -> Vec<UserRecord> {
    let needle = criteria.search_text.trim().to_lowercase();

    users
        .iter()
        .filter(|user| {
            let text_matches = needle.is_empty()
                || user.username.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle);
            let role_matches = criteria.role.is_none_or(|role| user.role == role);
            let status_matches = criteria.status.is_none_or(|status| user.status == status);
            text_matches && role_matches && status_matches
        })
        .cloned()
        .collect()
}
