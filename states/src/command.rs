//! The [`Command`] trait: an explicit async side effect.
//!
//! Commands are where network IO lives. They run on the background spawner,
//! read application state through an immutable [`CommandSnapshot`] taken at
//! dispatch time, and publish results through a [`LatestOnlyUpdater`]. The
//! updater stamps every result with the task generation so the context can
//! drop results from superseded dispatches.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, LatestOnlyUpdater};

/// An async side effect dispatched through
/// [`StateCtx::dispatch`](crate::StateCtx::dispatch).
///
/// `run` is called on the UI thread and must do its synchronous work (reading
/// the snapshot) before returning the boxed future; the future itself runs on
/// the spawner and must be `Send`. Re-dispatching the same command type
/// cancels the previous task's token, though commands are free to ignore it
/// since stale results are dropped by generation either way.
pub trait Command: 'static {
    fn run(
        &self,
        snapshot: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}
