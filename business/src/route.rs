//! Route state for page navigation.
//!
//! This module defines the route enum that determines which page to display.

use roster_states::{State, state_assign_impl};
use serde::{Deserialize, Serialize};
use std::any::Any;

use crate::session::SessionState;

/// Represents the current page/route of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Access-denied page - shown while the session is not an admin
    #[default]
    Denied,
    /// Users page - the admin console, shown to admin sessions
    Users,
}

impl Route {
    /// The route a session is entitled to. Pure so the redirect rule is
    /// testable without a context.
    pub fn for_session(session: &SessionState) -> Self {
        if session.is_admin() {
            Route::Users
        } else {
            Route::Denied
        }
    }
}

impl State for Route {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Role;

    #[test]
    fn test_route_default_is_denied() {
        let route = Route::default();
        assert_eq!(route, Route::Denied);
    }

    #[test]
    fn test_admin_session_routes_to_users() {
        let session = SessionState::new("ops@rosterapp.io", Role::Admin);
        assert_eq!(Route::for_session(&session), Route::Users);
    }

    #[test]
    fn test_non_admin_sessions_route_to_denied() {
        assert_eq!(Route::for_session(&SessionState::default()), Route::Denied);

        let moderator = SessionState::new("mod@rosterapp.io", Role::Moderator);
        assert_eq!(Route::for_session(&moderator), Route::Denied);

        let unknown = SessionState::new("who@rosterapp.io", Role::Unknown);
        assert_eq!(Route::for_session(&unknown), Route::Denied);
    }
}
