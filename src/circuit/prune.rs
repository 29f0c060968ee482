//! Collapse internal pass-through nodes.
//!
//! A node is a pass-through when it belongs to an instance, has exactly two
//! neighbors and both edges are wires. It is replaced by one wire between its
//! neighbors whose length is the sum of the two. Removing a node can only
//! change the degree of its neighbors, so only they are revisited.

use tracing::debug;

use super::graph::CircuitGraph;
use super::types::{outer_sum, Edge, EdgeKind, NodeId};

impl CircuitGraph {
    /// The two wire neighbors of a pass-through node.
    fn pass_through(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        if self.port(id).is_external() || self.degree(id) != 2 {
            return None;
        }
        let mut neighbors = self.neighbors(id);
        let (a, edge_a) = neighbors.next()?;
        let (b, edge_b) = neighbors.next()?;
        let wires = edge_a.kind == EdgeKind::Connection && edge_b.kind == EdgeKind::Connection;
        (wires && a != id && b != id).then_some((a, b))
    }

    /// Collapse every pass-through node until none remain.
    ///
    /// Returns the number of nodes removed.
    pub fn prune(&mut self) -> usize {
        let mut worklist: Vec<NodeId> = self.node_ids().collect();
        worklist.reverse();
        let mut queued = vec![false; self.slot_count()];
        for id in &worklist {
            queued[id.0] = true;
        }
        let mut removed = 0;

        while let Some(id) = worklist.pop() {
            queued[id.0] = false;
            let Some((a, b)) = self.pass_through(id) else {
                continue;
            };
            let length = match (self.edge(id, a), self.edge(id, b)) {
                (Some(ea), Some(eb)) => outer_sum(&ea.length, &eb.length),
                _ => vec![0.0],
            };
            self.remove_node(id);
            self.add_edge(a, b, Edge::connection(length));
            removed += 1;

            for neighbor in [a, b] {
                if !queued[neighbor.0] {
                    queued[neighbor.0] = true;
                    worklist.push(neighbor);
                }
            }
        }

        debug!(removed, remaining = self.node_count(), "pruned pass-through nodes");
        removed
    }
}

/// Prune a graph by value.
pub fn prune(mut graph: CircuitGraph) -> CircuitGraph {
    graph.prune();
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::QualifiedPort;

    fn qp(reference: &str) -> QualifiedPort {
        QualifiedPort::parse(reference).unwrap()
    }

    /// x - a,in =S= a,out - j,p - j,q - b,in =S= b,out - y
    fn chain() -> CircuitGraph {
        let mut graph = CircuitGraph::new();
        graph.add_edge_between(qp("x"), qp("a,in"), Edge::wire());
        graph.add_edge_between(qp("a,in"), qp("a,out"), Edge::scattering(vec![1.0]));
        graph.add_edge_between(qp("a,out"), qp("j,p"), Edge::wire());
        graph.add_edge_between(qp("j,p"), qp("j,q"), Edge::wire());
        graph.add_edge_between(qp("j,q"), qp("b,in"), Edge::wire());
        graph.add_edge_between(qp("b,in"), qp("b,out"), Edge::scattering(vec![2.0]));
        graph.add_edge_between(qp("b,out"), qp("y"), Edge::wire());
        graph
    }

    #[test]
    fn test_collapses_wire_chain() {
        let mut graph = chain();
        assert_eq!(graph.prune(), 2);
        assert!(graph.find_node(&qp("j,p")).is_none());
        assert!(graph.find_node(&qp("j,q")).is_none());

        let a_out = graph.find_node(&qp("a,out")).unwrap();
        let b_in = graph.find_node(&qp("b,in")).unwrap();
        assert_eq!(graph.edge(a_out, b_in), Some(&Edge::wire()));
    }

    #[test]
    fn test_keeps_device_and_external_nodes() {
        let graph = prune(chain());
        for reference in ["x", "a,in", "a,out", "b,in", "b,out", "y"] {
            assert!(graph.find_node(&qp(reference)).is_some(), "{reference} was pruned");
        }
        assert_eq!(graph.count_edges(EdgeKind::Scattering), 2);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let once = prune(chain());
        let twice = prune(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_wire_lengths_add() {
        let mut graph = CircuitGraph::new();
        graph.add_edge_between(qp("x"), qp("j,p"), Edge::connection(vec![1.0]));
        graph.add_edge_between(qp("j,p"), qp("y"), Edge::connection(vec![0.5, 2.0]));
        assert_eq!(graph.prune(), 1);

        let x = graph.find_node(&qp("x")).unwrap();
        let y = graph.find_node(&qp("y")).unwrap();
        assert_eq!(graph.edge(x, y), Some(&Edge::connection(vec![1.5, 3.0])));
    }

    #[test]
    fn test_self_loop_blocks_collapse() {
        let mut graph = CircuitGraph::new();
        graph.add_edge_between(qp("x"), qp("j,p"), Edge::wire());
        graph.add_edge_between(qp("j,p"), qp("j,p"), Edge::wire());
        assert_eq!(graph.prune(), 0);
    }
}
