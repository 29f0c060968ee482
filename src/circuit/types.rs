//! Core types for circuit graphs.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LightpathError, Result};
use crate::stype::SType;

/// Instance name to scattering representation.
pub type Instances = BTreeMap<String, SType>;

/// Internal wiring: qualified-port string to qualified-port string.
pub type Connections = BTreeMap<String, String>;

/// External port name to qualified-port string.
pub type Ports = BTreeMap<String, String>;

/// Delimiter between instance and port in a qualified-port string.
pub const PORT_DELIMITER: char = ',';

/// A connection point: a port on an instance, or an external port when
/// `instance` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedPort {
    pub instance: String,
    pub port: String,
}

impl QualifiedPort {
    pub fn new(instance: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            port: port.into(),
        }
    }

    /// A circuit-level port.
    pub fn external(port: impl Into<String>) -> Self {
        Self::new("", port)
    }

    /// Parse `"instance,port"`, or a bare `"port"` for an external port.
    pub fn parse(reference: &str) -> Result<Self> {
        let mut parts = reference.split(PORT_DELIMITER);
        let qualified = match (parts.next(), parts.next(), parts.next()) {
            (Some(port), None, None) => Self::external(port.trim()),
            (Some(instance), Some(port), None) => Self::new(instance.trim(), port.trim()),
            _ => {
                return Err(LightpathError::invalid_port(
                    reference,
                    format!("expected at most one '{PORT_DELIMITER}'"),
                ))
            }
        };
        if qualified.port.is_empty() {
            return Err(LightpathError::invalid_port(reference, "port name is empty"));
        }
        Ok(qualified)
    }

    /// Check if this is a circuit-level port.
    pub fn is_external(&self) -> bool {
        self.instance.is_empty()
    }
}

impl fmt::Display for QualifiedPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_external() {
            write!(f, "{}", self.port)
        } else {
            write!(f, "{}{}{}", self.instance, PORT_DELIMITER, self.port)
        }
    }
}

/// Index of a node in a [`CircuitGraph`](super::CircuitGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Kind of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Wire between two ports (`C`)
    Connection,
    /// Path through a device (`S`)
    Scattering,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Connection => write!(f, "C"),
            EdgeKind::Scattering => write!(f, "S"),
        }
    }
}

/// Graph edge with its batch of lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub length: Vec<f64>,
}

impl Edge {
    /// Zero-length wire.
    pub fn wire() -> Self {
        Self::connection(vec![0.0])
    }

    pub fn connection(length: Vec<f64>) -> Self {
        Self {
            kind: EdgeKind::Connection,
            length,
        }
    }

    pub fn scattering(length: Vec<f64>) -> Self {
        Self {
            kind: EdgeKind::Scattering,
            length,
        }
    }
}

/// All pairwise sums of two length batches, flattened with `next` as the
/// outer index: `result[e * acc.len() + a] = acc[a] + next[e]`.
pub fn outer_sum(acc: &[f64], next: &[f64]) -> Vec<f64> {
    next.iter()
        .flat_map(|e| acc.iter().map(move |a| a + e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified_port() {
        assert_eq!(QualifiedPort::parse("wg1,in").unwrap(), QualifiedPort::new("wg1", "in"));
        assert_eq!(QualifiedPort::parse("o1").unwrap(), QualifiedPort::external("o1"));
        assert!(QualifiedPort::parse("o1").unwrap().is_external());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            QualifiedPort::parse("a,b,c"),
            Err(LightpathError::InvalidPortReference { .. })
        ));
        assert!(QualifiedPort::parse("wg1,").is_err());
        assert!(QualifiedPort::parse("").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for reference in ["wg1,in", "o2"] {
            assert_eq!(QualifiedPort::parse(reference).unwrap().to_string(), reference);
        }
    }

    #[test]
    fn test_outer_sum() {
        assert_eq!(outer_sum(&[1.0], &[2.0, 3.0]), vec![3.0, 4.0]);
        assert_eq!(outer_sum(&[0.0, 10.0], &[1.0, 2.0]), vec![1.0, 11.0, 2.0, 12.0]);
        assert_eq!(outer_sum(&[1.0, 2.0], &[]).len(), 0);
    }
}
