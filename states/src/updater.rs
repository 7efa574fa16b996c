//! Result publication: typed values sent back to the context's channel.
//!
//! Two flavors exist. [`Updater`] is handed to computes; its results are
//! always applied. [`LatestOnlyUpdater`] is handed to commands; every result
//! carries the task's [`TaskId`] and the context drops results whose
//! generation has been superseded by a newer dispatch of the same command.
//!
//! Both wake the UI (via the context's waker callback, typically
//! `egui::Context::request_repaint`) after sending, so results published from
//! background tasks repaint promptly.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::TaskId;

pub(crate) type Waker = Arc<dyn Fn() + Send + Sync>;

/// One published value on its way to the context.
pub(crate) struct Envelope {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) value: Box<dyn Any + Send>,
    pub(crate) task: Option<TaskId>,
}

/// Publisher for computes: results are always applied.
#[derive(Clone)]
pub struct Updater {
    pub(crate) tx: flume::Sender<Envelope>,
    pub(crate) waker: Option<Waker>,
}

impl Updater {
    /// Publish `value` as the next content of the slot registered for `T`.
    pub fn set<T: Any + Send>(&self, value: T) {
        send(
            &self.tx,
            Envelope {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                value: Box::new(value),
                task: None,
            },
        );
        wake(self.waker.as_ref());
    }
}

/// Publisher for commands: results are stamped with the task generation and
/// dropped by the context once a newer dispatch of the same command exists.
#[derive(Clone)]
pub struct LatestOnlyUpdater {
    pub(crate) task: TaskId,
    pub(crate) tx: flume::Sender<Envelope>,
    pub(crate) waker: Option<Waker>,
}

impl LatestOnlyUpdater {
    pub fn set<T: Any + Send>(&self, value: T) {
        send(
            &self.tx,
            Envelope {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                value: Box::new(value),
                task: Some(self.task),
            },
        );
        wake(self.waker.as_ref());
    }

    pub fn task_id(&self) -> TaskId {
        self.task
    }
}

fn send(tx: &flume::Sender<Envelope>, envelope: Envelope) {
    // Only fails when the context (and its receiver) is gone, e.g. a result
    // arriving during shutdown.
    if tx.send(envelope).is_err() {
        log::warn!("updater: state context dropped, result discarded");
    }
}

fn wake(waker: Option<&Waker>) {
    if let Some(waker) = waker {
        waker();
    }
}
