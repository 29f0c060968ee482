//! # Lightpath Core
//!
//! Scattering-parameter representations and an additive path-length solver
//! for photonic circuits.
//!
//! This library provides:
//! - Three interchangeable encodings of a device's scattering response
//! - Expansion of singlemode responses into polarization/mode blocks and back
//! - A circuit graph built from instance wiring, with pass-through pruning
//! - Enumeration of physically valid paths and their accumulated lengths
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`stype`] - Sparse-dictionary, sparse-coordinate and dense encodings
//! - [`multimode`] - Mode expansion/contraction for representations and models
//! - [`circuit`] - Circuit graph construction and pruning
//! - [`solver`] - Path enumeration and the additive evaluator
//! - [`display`] - Compact value formatting
//! - [`cli`] - Command-line argument parsing (CLI only)
//!
//! ## Usage
//!
//! ```
//! use lightpath_core::circuit::{Connections, Instances, Ports};
//! use lightpath_core::solver::evaluate_additive;
//! use lightpath_core::stype::{SDict, SType};
//!
//! let mut instances = Instances::new();
//! instances.insert("wg1".into(), SType::from(SDict::new().with_scalar("in", "out", 1.5)));
//!
//! let mut ports = Ports::new();
//! ports.insert("o1".into(), "wg1,in".into());
//! ports.insert("o2".into(), "wg1,out".into());
//!
//! let result = evaluate_additive(&instances, &Connections::new(), &ports).unwrap();
//! assert_eq!(result[&("o1".to_string(), "o2".to_string())], vec![vec![1.5]]);
//! ```
//!
//! ## Path Validity
//!
//! A path alternates between wires (`C` edges) and trips through devices
//! (`S` edges). Two `S` edges in a row would re-enter a device without
//! leaving it, so such paths are discarded. Each path's length batch is the
//! outer sum of its edges' batches: one value per combination of per-edge
//! lengths.

pub mod circuit;
pub mod display;
pub mod error;
pub mod multimode;
pub mod solver;
pub mod stype;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types for convenience
pub use circuit::CircuitGraph;
pub use error::{LightpathError, Result};
pub use multimode::{contract_to_singlemode, expand_to_multimode};
pub use solver::{evaluate_additive, AdditiveCircuit, SolverConfig};
pub use stype::{SCoo, SDense, SDict, SKind, SType};
