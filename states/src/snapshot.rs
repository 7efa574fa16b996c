//! Immutable snapshots handed to commands at dispatch time.
//!
//! A [`CommandSnapshot`] holds boxed clones of every snapshottable state and
//! compute. Commands read their inputs synchronously from the snapshot before
//! building their future, so the future itself never touches the context.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;

use crate::StateError;

/// Boxed clones of snapshottable states, keyed by `TypeId`.
#[derive(Default)]
pub struct StateSnapshot {
    entries: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl StateSnapshot {
    pub(crate) fn insert(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.entries.insert(id, value);
    }

    /// Read a snapshotted state.
    ///
    /// Panics when `T` was not registered or does not override
    /// [`State::snapshot`](crate::State::snapshot); both are wiring bugs at
    /// the dispatch site, not runtime conditions.
    pub fn get<T: Any>(&self) -> &T {
        self.try_get::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn try_get<T: Any>(&self) -> Result<&T, StateError> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or_else(|| StateError::StateNotFound {
                id: TypeId::of::<T>(),
                context: std::any::type_name::<T>(),
            })
    }
}

/// Boxed clones of snapshottable computes, keyed by `TypeId`.
#[derive(Default)]
pub struct ComputeSnapshot {
    entries: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl ComputeSnapshot {
    pub(crate) fn insert(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.entries.insert(id, value);
    }

    pub fn get<T: Any>(&self) -> &T {
        self.try_get::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn try_get<T: Any>(&self) -> Result<&T, StateError> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or_else(|| StateError::ComputeNotFound {
                id: TypeId::of::<T>(),
                context: std::any::type_name::<T>(),
            })
    }
}

/// Everything a command may read: states plus computes.
#[derive(Default)]
pub struct CommandSnapshot {
    states: StateSnapshot,
    computes: ComputeSnapshot,
}

impl CommandSnapshot {
    pub(crate) fn new(states: StateSnapshot, computes: ComputeSnapshot) -> Self {
        Self { states, computes }
    }

    /// Read a snapshotted state; panics on a wiring bug (see
    /// [`StateSnapshot::get`]).
    pub fn state<T: Any>(&self) -> &T {
        self.states.get::<T>()
    }

    pub fn try_state<T: Any>(&self) -> Result<&T, StateError> {
        self.states.try_get::<T>()
    }

    /// Read a snapshotted compute; panics on a wiring bug.
    pub fn compute<T: Any>(&self) -> &T {
        self.computes.get::<T>()
    }

    pub fn try_compute<T: Any>(&self) -> Result<&T, StateError> {
        self.computes.try_get::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Weather {
        sunny: bool,
    }

    #[test]
    fn snapshot_round_trip() {
        let mut states = StateSnapshot::default();
        states.insert(TypeId::of::<Weather>(), Box::new(Weather { sunny: true }));
        let snapshot = CommandSnapshot::new(states, ComputeSnapshot::default());

        assert_eq!(
            snapshot.state::<Weather>(),
            &Weather { sunny: true },
            "snapshot must return the inserted clone"
        );
    }

    #[test]
    fn missing_state_is_an_error() {
        let snapshot = CommandSnapshot::default();
        let err = snapshot
            .try_state::<Weather>()
            .expect_err("nothing was inserted");
        assert!(
            matches!(err, StateError::StateNotFound { .. }),
            "missing state maps to StateNotFound"
        );
    }

    #[test]
    fn missing_compute_is_an_error() {
        let snapshot = CommandSnapshot::default();
        let err = snapshot
            .try_compute::<Weather>()
            .expect_err("nothing was inserted");
        assert!(
            matches!(err, StateError::ComputeNotFound { .. }),
            "missing compute maps to ComputeNotFound"
        );
    }

    #[test]
    #[should_panic(expected = "state not registered")]
    fn get_panics_with_type_name() {
        let snapshot = CommandSnapshot::default();
        let _ = snapshot.state::<Weather>();
    }
}
