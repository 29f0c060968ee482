//! Additive path-length solver.
//!
//! The additive backend answers "how long is every way through the circuit"
//! rather than solving for a full scattering matrix:
//!
//! 1. Build a [`CircuitGraph`](crate::circuit::CircuitGraph) from the wiring
//! 2. Collapse internal pass-through nodes
//! 3. Enumerate simple paths between every pair of external ports, rejecting
//!    paths that take two device (`S`) edges in a row
//! 4. Outer-sum the length batches along each path
//!
//! Path counts grow combinatorially with the number of parallel routes.
//! [`SolverConfig::with_max_paths`] turns a runaway enumeration into an error.

mod additive;
mod paths;

pub use additive::{evaluate_additive, AdditiveCircuit, PathLengths};
pub use paths::{enumerate_paths, path_length, path_lengths, Path};

/// Prune pass-through nodes before enumerating paths unless told otherwise.
pub const DEFAULT_PRUNE: bool = true;

/// Configuration for the additive solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of paths per port pair; `None` for no limit.
    pub max_paths: Option<usize>,
    /// Whether to collapse pass-through nodes first.
    pub prune: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_paths: None,
            prune: DEFAULT_PRUNE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail evaluation when a port pair has more than `max_paths` paths.
    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = Some(max_paths);
        self
    }

    /// Enable or disable pruning.
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }
}
