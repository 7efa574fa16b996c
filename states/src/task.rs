//! Task identity and cancellation for dispatched commands.
//!
//! Every dispatch of a command type gets a fresh [`TaskId`] carrying a
//! monotonically increasing generation. The context keeps one [`TaskHandle`]
//! per command type; dispatching again cancels the previous handle's token
//! and bumps the generation, so results published by the older task are
//! recognizably stale.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

/// Identity of one dispatched command task: the command's `TypeId` plus the
/// dispatch generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when `self` is a newer dispatch of the same command type.
    pub fn supersedes(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.generation > other.generation
    }
}

/// A live task: its id plus the token the context trips when the task is
/// superseded.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// A clone of the token to hand to the command future.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
