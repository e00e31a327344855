use std::collections::TryReserveError;
use thiserror::Error;

/// Failures surfaced by table creation, insertion and growth.
///
/// Absent keys and duplicate inserts are ordinary outcomes and never show up
/// here.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("table capacity must be at least 1")]
    ZeroCapacity,
    #[error("cannot grow a table of {capacity} slots without overflowing usize")]
    CapacityOverflow { capacity: usize },
    #[error("failed to allocate {capacity} slots")]
    Alloc {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("table is full: all {capacity} slots hold live entries")]
    Full { capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: Messages name the offending capacity.
    #[test]
    fn display_messages() {
        assert_eq!(
            TableError::ZeroCapacity.to_string(),
            "table capacity must be at least 1"
        );
        assert_eq!(
            TableError::Full { capacity: 4 }.to_string(),
            "table is full: all 4 slots hold live entries"
        );
        assert!(TableError::CapacityOverflow { capacity: 8 }
            .to_string()
            .contains("8 slots"));
    }

    /// Invariant: Allocation failures keep the reserve error as their source.
    #[test]
    fn alloc_error_has_source() {
        use std::error::Error as _;
        let source = Vec::<u64>::new()
            .try_reserve_exact(usize::MAX)
            .expect_err("reserving usize::MAX elements must fail");
        let err = TableError::Alloc {
            capacity: usize::MAX,
            source,
        };
        assert!(err.source().is_some());
    }
}
