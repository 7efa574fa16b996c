//! Per-compute synchronization status.

/// Where a compute stands relative to its dependencies.
///
/// - `Init`: registered, never run.
/// - `Dirty`: a dependency changed since the last run.
/// - `Pending`: `compute` was called; its published value has not been
///   applied from the channel yet.
/// - `Clean`: the cached value reflects the current dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSyncStatus {
    Init,
    Pending,
    Dirty,
    Clean,
}

impl StateSyncStatus {
    /// True when the compute needs a run (`Init` or `Dirty`).
    pub fn is_stale(self) -> bool {
        matches!(self, Self::Init | Self::Dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staleness() {
        assert!(StateSyncStatus::Init.is_stale());
        assert!(StateSyncStatus::Dirty.is_stale());
        assert!(!StateSyncStatus::Pending.is_stale());
        assert!(!StateSyncStatus::Clean.is_stale());
    }
}
