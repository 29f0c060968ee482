//! Circuit graph representation and simplification.
//!
//! This module turns a flat description of instances, connections and
//! external ports into a [`CircuitGraph`] whose nodes are qualified ports.
//! Wires become `C` edges and device entries become `S` edges; the pruner
//! then collapses internal nodes that only relay a wire.

mod graph;
mod prune;
mod types;
mod validate;

pub use graph::CircuitGraph;
pub use prune::prune;
pub use types::*;
pub use validate::Netlist;

use crate::error::Result;

/// Parse the wiring and build the graph in one step.
pub fn build_graph(instances: &Instances, connections: &Connections, ports: &Ports) -> Result<CircuitGraph> {
    let netlist = Netlist::parse(connections, ports)?;
    CircuitGraph::from_netlist(instances, &netlist)
}
