//! The [`State`] trait: a typed unit of application state owned by a
//! [`StateCtx`](crate::StateCtx).
//!
//! States are plain structs registered once at startup. The UI thread reads
//! and mutates them directly through the context; async commands see them
//! only through snapshots and replace them wholesale through the result
//! channel (`assign_box`).

use std::any::Any;

/// A unit of application state.
///
/// Implementors provide downcasting (`as_any`/`as_any_mut`). States that
/// commands read override `snapshot`; states that commands write override
/// `assign_box`, almost always as a one-liner delegating to
/// [`state_assign_impl`].
pub trait State: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// A boxed clone of this state for [`CommandSnapshot`] consumption, or
    /// `None` when commands never need to read it.
    ///
    /// [`CommandSnapshot`]: crate::CommandSnapshot
    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        None
    }

    /// Replace this state with a value published through an updater.
    fn assign_box(&mut self, value: Box<dyn Any + Send>) {
        drop(value);
        log::error!(
            "assign_box: {} does not accept published values",
            std::any::type_name::<Self>()
        );
    }
}

/// Shared `assign_box` body: downcast and overwrite in place.
///
/// A type mismatch means an updater published the wrong type for this slot;
/// that is a programming error, logged and dropped rather than propagated.
pub fn state_assign_impl<T: State>(slot: &mut T, value: Box<dyn Any + Send>) {
    match value.downcast::<T>() {
        Ok(next) => *slot = *next,
        Err(_) => log::error!(
            "assign_box: published value is not a {}",
            std::any::type_name::<T>()
        ),
    }
}
