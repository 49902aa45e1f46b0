//! Invariant gate for the graph arena.
//!
//! Mutation paths call [`debug_invariants!`] after surgery so a broken
//! ring, slot pairing, or degree count is caught at the edit that caused
//! it instead of surfacing later as a bad traversal. The checks compile
//! away in release builds unless the `strict-invariants` or
//! `check-invariants` feature is on.

use crate::error::GraphError;

/// Structures whose internal consistency can be checked on demand.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), GraphError>;
}

/// Runs a fallible invariant check and panics with the failing operation's
/// name when checking is compiled in.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
