//! Borrowed dependency view handed to [`Compute::compute`](crate::Compute::compute).
//!
//! A `Dep` borrows the context's registries for the duration of one compute
//! call. Reads are shared borrows, which is all a pure compute needs; a
//! compute publishes its own next value through the updater instead of
//! mutating anything in place.

use std::any::TypeId;
use std::collections::BTreeMap;

use crate::ctx::ComputeSlot;
use crate::{Compute, State};

/// Read access to registered states and computes during a compute run.
pub struct Dep<'a> {
    states: &'a BTreeMap<TypeId, Box<dyn State>>,
    computes: &'a BTreeMap<TypeId, ComputeSlot>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a BTreeMap<TypeId, Box<dyn State>>,
        computes: &'a BTreeMap<TypeId, ComputeSlot>,
    ) -> Self {
        Self { states, computes }
    }

    /// Read a dependency state.
    ///
    /// Panics when `T` is not registered: a compute reading a state it never
    /// declared (or one that was never added) is a wiring bug caught on the
    /// first run.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| {
                panic!("Dep: state not registered: {}", std::any::type_name::<T>())
            })
    }

    /// Read a dependency compute's cached value.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.compute.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| {
                panic!("Dep: compute not registered: {}", std::any::type_name::<T>())
            })
    }
}
