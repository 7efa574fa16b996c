//! Operator session and access control.
//!
//! The console is deployed behind an identity-aware proxy, so the operator's
//! name and role arrive from the environment (`ROSTER_OPERATOR`,
//! `ROSTER_OPERATOR_ROLE`) rather than from a login flow. Until those prove
//! the operator is an admin, the session stays anonymous and the router
//! keeps every page but the denied screen off limits.

use roster_states::{State, state_assign_impl};
use std::any::Any;
use ustr::Ustr;

use crate::directory::Role;

/// Who is driving the console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub operator: Option<Ustr>,
    /// `Role::default()` is `User`, so a fresh session is never an admin.
    pub role: Role,
}

impl SessionState {
    pub fn new(operator: impl AsRef<str>, role: Role) -> Self {
        Self {
            operator: Some(Ustr::from(operator.as_ref())),
            role,
        }
    }

    /// Resolve the session from the environment on native targets; wasm
    /// keeps the anonymous default until the host seeds one.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            match read_session_overrides() {
                Ok(overrides) => Self::from_overrides(overrides),
                Err(err) => {
                    log::warn!("session: environment ignored: {err}");
                    Self::default()
                }
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self::default()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_ref().map(Ustr::as_str)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_overrides(overrides: SessionOverrides) -> Self {
        Self {
            operator: overrides
                .roster_operator
                .filter(|name| !name.trim().is_empty())
                .map(|name| Ustr::from(name.trim())),
            role: overrides.roster_operator_role.unwrap_or_default(),
        }
    }
}

impl State for SessionState {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Deserialize)]
struct SessionOverrides {
    roster_operator: Option<String>,
    /// An unrecognized role value parses as [`Role::Unknown`], which is not
    /// an admin.
    roster_operator_role: Option<Role>,
}

#[cfg(not(target_arch = "wasm32"))]
fn read_session_overrides() -> Result<SessionOverrides, serde_env::Error> {
    serde_env::from_iter(std::env::vars())
}
