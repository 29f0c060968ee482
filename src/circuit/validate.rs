//! Netlist parsing and validation.

use std::collections::BTreeMap;

use super::types::{Connections, Ports, QualifiedPort, PORT_DELIMITER};
use crate::error::{LightpathError, Result};

/// Wiring of a circuit with every port reference parsed.
///
/// Checks:
/// - Every qualified-port string has at most one delimiter and a port name
/// - External port names carry no instance prefix
#[derive(Debug, Clone, PartialEq)]
pub struct Netlist {
    connections: Vec<(QualifiedPort, QualifiedPort)>,
    ports: Vec<(String, QualifiedPort)>,
}

impl Netlist {
    /// Parse connection and external-port mappings.
    pub fn parse(connections: &Connections, ports: &Ports) -> Result<Self> {
        let connections = connections
            .iter()
            .map(|(a, b)| -> Result<_> { Ok((QualifiedPort::parse(a)?, QualifiedPort::parse(b)?)) })
            .collect::<Result<Vec<_>>>()?;

        let ports = ports
            .iter()
            .map(|(name, target)| -> Result<_> {
                if name.is_empty() || name.contains(PORT_DELIMITER) {
                    return Err(LightpathError::invalid_port(
                        name.as_str(),
                        format!("external port names must be non-empty and must not contain '{PORT_DELIMITER}'"),
                    ));
                }
                Ok((name.clone(), QualifiedPort::parse(target)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { connections, ports })
    }

    /// Internal wiring pairs.
    pub fn connections(&self) -> &[(QualifiedPort, QualifiedPort)] {
        &self.connections
    }

    /// External port names with the port each one exposes.
    pub fn ports(&self) -> &[(String, QualifiedPort)] {
        &self.ports
    }

    /// External port names in sorted order.
    pub fn external_names(&self) -> impl Iterator<Item = &str> {
        self.ports.iter().map(|(name, _)| name.as_str())
    }

    /// Every referenced instance with the first port that references it.
    pub fn instance_references(&self) -> impl Iterator<Item = (&str, &QualifiedPort)> {
        let mut references: BTreeMap<&str, &QualifiedPort> = BTreeMap::new();
        let wired = self.connections.iter().flat_map(|(a, b)| [a, b]);
        let exposed = self.ports.iter().map(|(_, port)| port);
        for port in wired.chain(exposed).filter(|port| !port.is_external()) {
            references.entry(port.instance.as_str()).or_insert(port);
        }
        references.into_iter()
    }
}
