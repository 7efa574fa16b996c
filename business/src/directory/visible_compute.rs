//! Derived, filtered view of the user list.

use std::any::{Any, TypeId};

use roster_states::{Compute, ComputeDeps, Dep, Updater, compute_assign_impl};

use super::filter::{FilterCriteria, filter_users};
use super::state::UsersState;
use super::types::UserRecord;

/// The rows the table actually renders: [`UsersState::users`] with the
/// current [`FilterCriteria`] applied.
///
/// Recomputed whenever either dependency changes through
/// [`StateCtx::update`](roster_states::StateCtx::update), so widget code
/// never filters by hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleUsersCompute {
    pub users: Vec<UserRecord>,
}

impl VisibleUsersCompute {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Compute for VisibleUsersCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [TypeId; 2] =
            [TypeId::of::<UsersState>(), TypeId::of::<FilterCriteria>()];
        const COMPUTE_IDS: [TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let state = deps.get_state_ref::<UsersState>();
        let criteria = deps.get_state_ref::<FilterCriteria>();

        updater.set(VisibleUsersCompute {
            users: filter_users(&state.users, criteria),
        });
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        compute_assign_impl(self, new_self);
    }
}
