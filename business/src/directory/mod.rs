//! User directory domain module.
//!
//! This module is the single home for:
//! - State stored in `StateCtx` for the users page (record list, filter
//!   criteria, dialog state)
//! - Computes that cache async results (fetch, save/delete actions) or
//!   derive the filtered view
//! - Business-layer API helpers for the identity and profile stores
//!
//! UI code under `ui/src/widgets/**` should not define domain
//! `State`/`Compute`/`Command`. It should only read via `ctx.cached::<T>()`
//! and trigger changes via `ctx.dispatch::<Cmd>()`.

pub mod action_compute;
pub mod api;
pub mod fetch_users_compute;
pub mod filter;
pub mod state;
pub mod types;
pub mod visible_compute;

pub use action_compute::{
    DeleteUserCommand, SaveUserCommand, UserActionCompute, UserActionInput, UserActionKind,
    UserActionState,
};

pub use fetch_users_compute::{FetchUsersCommand, FetchUsersCompute, FetchUsersResult};

pub use filter::{FilterCriteria, filter_users};

pub use state::{UserDialog, UsersState};

pub use types::{
    AccountStatus, EditDraft, IdentityUpdateRequest, ProfileUpdateRequest, Role, UserRecord,
};

pub use visible_compute::VisibleUsersCompute;
