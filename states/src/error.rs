//! Lookup errors for states and computes.

use std::any::TypeId;

use thiserror::Error;

/// A typed slot was not found in the context or a snapshot.
///
/// `context` carries the type name so the message is readable without
/// resolving the `TypeId`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state not registered: {context}")]
    StateNotFound {
        id: TypeId,
        context: &'static str,
    },
    #[error("compute not registered: {context}")]
    ComputeNotFound {
        id: TypeId,
        context: &'static str,
    },
}
