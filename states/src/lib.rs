mod basic_state;
mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod runtime;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod updater;

pub use basic_state::Time;
pub use command::Command;
pub use compute::{Compute, ComputeDeps, compute_assign_impl};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::StateError;
pub use graph::{DependencyGraph, TopologyError};
pub use snapshot::{CommandSnapshot, ComputeSnapshot, StateSnapshot};
pub use state::{State, state_assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use updater::{LatestOnlyUpdater, Updater};
