//! The [`Compute`] trait: a derived node in the state graph.
//!
//! A compute declares the `TypeId`s it reads and publishes its next value
//! through an [`Updater`]. `compute` must stay pure: it reads dependencies
//! through the borrowed [`Dep`] view and sends one result. Side effects
//! (network, filesystem) must not run inside a `Compute` because computes
//! execute implicitly whenever a dependency changes; side effects belong in
//! [`Command`](crate::Command)s, which run only when dispatched.
//!
//! A compute with no dependencies and an empty `compute` body is a
//! *command-fed cache*: it never derives anything itself, it just gives a
//! command's async result a typed home that UI code reads via
//! [`StateCtx::cached`](crate::StateCtx::cached).

use std::any::{Any, TypeId};

use crate::{Dep, Updater};

/// Dependency declaration: `(state TypeIds, compute TypeIds)`.
pub type ComputeDeps = (&'static [TypeId], &'static [TypeId]);

/// A derived value, recomputed when any declared dependency changes.
pub trait Compute: Any {
    fn as_any(&self) -> &dyn Any;

    /// The states and computes this node reads. Must be constant for the
    /// lifetime of the registration; the context records the edges once.
    fn deps(&self) -> ComputeDeps;

    /// Derive the next value from `deps` and publish it via `updater.set`.
    fn compute(&self, deps: Dep<'_>, updater: Updater);

    /// A boxed clone for [`CommandSnapshot`](crate::CommandSnapshot)
    /// consumption, or `None` when commands never need to read it.
    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        None
    }

    /// Replace the cached value with one published through an updater.
    fn assign_box(&mut self, value: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for computes.
pub fn compute_assign_impl<T: Compute>(slot: &mut T, value: Box<dyn Any + Send>) {
    match value.downcast::<T>() {
        Ok(next) => *slot = *next,
        Err(_) => log::error!(
            "assign_box: published value is not a {}",
            std::any::type_name::<T>()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Cache {
        label: String,
    }

    impl Compute for Cache {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn deps(&self) -> ComputeDeps {
            (&[], &[])
        }

        fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}

        fn assign_box(&mut self, value: Box<dyn Any + Send>) {
            compute_assign_impl(self, value);
        }
    }

    #[test]
    fn assign_box_replaces_cached_value() {
        let mut cache = Cache::default();
        cache.assign_box(Box::new(Cache {
            label: "ready".to_owned(),
        }));
        assert_eq!(cache.label, "ready", "assign_box should overwrite the cache");
    }

    #[test]
    fn assign_box_ignores_wrong_type() {
        let mut cache = Cache {
            label: "kept".to_owned(),
        };
        cache.assign_box(Box::new(17_u32));
        assert_eq!(cache.label, "kept", "mismatched assign must leave the cache untouched");
    }
}
