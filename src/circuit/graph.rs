//! Circuit graph structure.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::types::{Edge, EdgeKind, Instances, NodeId, QualifiedPort};
use super::validate::Netlist;
use crate::error::{LightpathError, Result};

/// Undirected graph of qualified ports.
///
/// Between any two nodes there is at most one edge; inserting another one
/// replaces it. A reflection entry `(p, p)` becomes a self loop, which counts
/// toward the node's degree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CircuitGraph {
    /// Port of each node, indexed by [`NodeId`]
    nodes: Vec<QualifiedPort>,

    /// Reverse mapping from ports to node IDs
    index: HashMap<QualifiedPort, NodeId>,

    /// Neighbors of each node with the connecting edge
    adjacency: Vec<BTreeMap<NodeId, Edge>>,

    /// Nodes removed by pruning keep their slot
    removed: Vec<bool>,
}

impl CircuitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a parsed netlist.
    ///
    /// Every connection and external port becomes a zero-length wire. Every
    /// instance that is wired to something contributes one scattering edge
    /// per nonzero entry of its representation, carrying the real parts of
    /// the entry as lengths.
    pub fn from_netlist(instances: &Instances, netlist: &Netlist) -> Result<Self> {
        // Resolve every instance first so a failure leaves nothing half-built
        let mut devices = Vec::new();
        for (name, port) in netlist.instance_references() {
            let stype = instances.get(name).ok_or_else(|| LightpathError::UnknownInstance {
                instance: name.to_string(),
                port: port.to_string(),
            })?;
            devices.push((name, stype.to_sdict()));
        }

        let mut graph = Self::new();
        for (a, b) in netlist.connections() {
            graph.add_edge_between(a.clone(), b.clone(), Edge::wire());
        }
        for (name, port) in netlist.ports() {
            graph.add_edge_between(QualifiedPort::external(name.as_str()), port.clone(), Edge::wire());
        }
        for (name, sdict) in devices {
            for ((p1, p2), value) in sdict.iter() {
                let length = value.iter().map(|v| v.re).collect();
                graph.add_edge_between(
                    QualifiedPort::new(name, p1.as_str()),
                    QualifiedPort::new(name, p2.as_str()),
                    Edge::scattering(length),
                );
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built circuit graph"
        );
        Ok(graph)
    }

    /// Get the ID of a port, adding it if needed.
    pub fn add_node(&mut self, port: QualifiedPort) -> NodeId {
        if let Some(&id) = self.index.get(&port) {
            self.removed[id.0] = false;
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(port.clone(), id);
        self.nodes.push(port);
        self.adjacency.push(BTreeMap::new());
        self.removed.push(false);
        id
    }

    /// Insert (or replace) the undirected edge between two nodes.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, edge: Edge) {
        self.adjacency[b.0].insert(a, edge.clone());
        self.adjacency[a.0].insert(b, edge);
    }

    /// Insert an edge between two ports, adding the ports as needed.
    pub fn add_edge_between(&mut self, a: QualifiedPort, b: QualifiedPort, edge: Edge) {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.add_edge(a, b, edge);
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) {
        let neighbors: Vec<NodeId> = self.adjacency[id.0].keys().copied().collect();
        for neighbor in neighbors {
            self.adjacency[neighbor.0].remove(&id);
        }
        self.adjacency[id.0].clear();
        self.removed[id.0] = true;
    }

    /// Find a node ID by port.
    pub fn find_node(&self, port: &QualifiedPort) -> Option<NodeId> {
        self.index.get(port).copied().filter(|id| !self.removed[id.0])
    }

    /// Get the port of a node.
    pub fn port(&self, id: NodeId) -> &QualifiedPort {
        &self.nodes[id.0]
    }

    /// IDs of all live nodes in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId).filter(|id| !self.removed[id.0])
    }

    /// Neighbors of a node with the connecting edges.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> {
        self.adjacency[id.0].iter().map(|(&n, e)| (n, e))
    }

    /// Number of incident edges; a self loop counts once.
    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency[id.0].len()
    }

    /// Edge between two nodes, if any.
    pub fn edge(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.adjacency[a.0].get(&b)
    }

    /// Number of node slots, including removed nodes.
    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.removed.iter().filter(|&&removed| !removed).count()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        let mut loops = 0;
        let mut ends = 0;
        for (i, neighbors) in self.adjacency.iter().enumerate() {
            ends += neighbors.len();
            loops += usize::from(neighbors.contains_key(&NodeId(i)));
        }
        (ends - loops) / 2 + loops
    }

    /// Number of edges of one kind.
    pub fn count_edges(&self, kind: EdgeKind) -> usize {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, neighbors)| neighbors.iter().map(move |(n, e)| (i, n.0, e)))
            .filter(|&(i, n, e)| i <= n && e.kind == kind)
            .count()
    }
}
