//! Shared UI helpers: colors and display formatting.

pub mod colors;
pub mod format;
