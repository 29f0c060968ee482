//! Error types for the Lightpath circuit core.
//!
//! This module provides a unified error type [`LightpathError`] that covers
//! all error conditions that can occur while converting scattering
//! representations, building circuit graphs and enumerating paths.

use thiserror::Error;

/// Result type alias using [`LightpathError`].
pub type Result<T> = std::result::Result<T, LightpathError>;

/// Unified error type for all Lightpath operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightpathError {
    // ============ Representation Errors ============
    /// Some, but not all, port names carry a mode suffix
    #[error("Mixed-mode representation: ports {multimode:?} carry a mode suffix but {singlemode:?} do not")]
    MixedMode {
        multimode: Vec<String>,
        singlemode: Vec<String>,
    },

    /// Value does not match any of the recognized encodings
    #[error("Unknown representation kind: {message}")]
    UnknownRepresentation { message: String },

    /// Multimode representation has a different mode set than requested
    #[error("Mode mismatch: representation has modes {found:?}, expected {expected:?}")]
    ModeMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Entries cannot be broadcast to a common batch size
    #[error("Batch mismatch for entry ({port1}, {port2}): expected {expected} values, found {found}")]
    BatchMismatch {
        port1: String,
        port2: String,
        expected: usize,
        found: usize,
    },

    // ============ Circuit Errors ============
    /// Connection or port references an instance that was not supplied
    #[error("Unknown instance '{instance}' referenced by port '{port}'")]
    UnknownInstance { instance: String, port: String },

    /// Malformed qualified-port string
    #[error("Invalid port reference '{reference}': {message}")]
    InvalidPortReference { reference: String, message: String },

    // ============ Solver Errors ============
    /// Too many simple paths between a pair of external ports
    #[error("Path limit of {limit} exceeded between '{source_port}' and '{target_port}'")]
    PathLimitExceeded {
        source_port: String,
        target_port: String,
        limit: usize,
    },

    // ============ Front-end Errors ============
    /// Malformed command-line argument
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },
}

impl LightpathError {
    /// Create an unknown representation error
    pub fn unknown_representation(message: impl Into<String>) -> Self {
        Self::UnknownRepresentation {
            message: message.into(),
        }
    }

    /// Create an invalid port reference error
    pub fn invalid_port(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPortReference {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }
}
