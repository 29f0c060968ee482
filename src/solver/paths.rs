//! Path enumeration and length accumulation.

use crate::circuit::{outer_sum, CircuitGraph, EdgeKind, NodeId};

/// A simple path through the graph, stored as its node sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
}

impl Path {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Consecutive node pairs, one per edge.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One step of the depth-first search: a node on the current path, the kind
/// of edge it was reached by and the next neighbor to try.
struct Frame {
    node: NodeId,
    incoming: EdgeKind,
    cursor: usize,
}

/// Simple paths from `source` to `target`, or `None` once more than `limit`
/// paths have been found.
///
/// The search keeps its own frame stack, so long series chains do not
/// deepen the call stack.
pub(crate) fn search_paths(
    graph: &CircuitGraph,
    source: NodeId,
    target: NodeId,
    limit: Option<usize>,
) -> Option<Vec<Path>> {
    let mut found = Vec::new();
    if source == target {
        return Some(found);
    }

    let mut on_path = vec![false; graph.slot_count()];
    on_path[source.0] = true;
    let mut frames = vec![Frame {
        node: source,
        incoming: EdgeKind::Connection,
        cursor: 0,
    }];

    while let Some(frame) = frames.last_mut() {
        let step = graph.neighbors(frame.node).nth(frame.cursor);
        frame.cursor += 1;
        let incoming = frame.incoming;

        let Some((next, edge)) = step else {
            if let Some(done) = frames.pop() {
                on_path[done.node.0] = false;
            }
            continue;
        };
        // Also skips self loops
        if on_path[next.0] {
            continue;
        }
        // Two device transitions in a row re-enter a device without leaving it
        if incoming == EdgeKind::Scattering && edge.kind == EdgeKind::Scattering {
            continue;
        }

        if next == target {
            let nodes = frames.iter().map(|f| f.node).chain([next]).collect();
            found.push(Path { nodes });
            if limit.is_some_and(|limit| found.len() > limit) {
                return None;
            }
        } else {
            on_path[next.0] = true;
            frames.push(Frame {
                node: next,
                incoming: edge.kind,
                cursor: 0,
            });
        }
    }
    Some(found)
}

/// All simple paths between two nodes that never take two `S` edges in a row.
///
/// A node has no path to itself.
pub fn enumerate_paths(graph: &CircuitGraph, source: NodeId, target: NodeId) -> Vec<Path> {
    search_paths(graph, source, target, None).unwrap_or_default()
}

/// Accumulated length batch of one path.
///
/// Starting from `[0.0]`, each edge's lengths are outer-summed into the
/// running batch, so the result holds one value per combination of per-edge
/// choices and its size is the product of the edge batch sizes.
pub fn path_length(graph: &CircuitGraph, path: &Path) -> Vec<f64> {
    path.edges().fold(vec![0.0], |acc, (a, b)| match graph.edge(a, b) {
        Some(edge) => outer_sum(&acc, &edge.length),
        None => acc,
    })
}

/// Length batches of several paths.
pub fn path_lengths(graph: &CircuitGraph, paths: &[Path]) -> Vec<Vec<f64>> {
    paths.iter().map(|path| path_length(graph, path)).collect()
}
