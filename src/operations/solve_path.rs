use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use slotmap::SecondaryMap;

use crate::error::{PathError, Result};
use crate::graph::{MeshGraph, NodeId};

/// Output of a shortest-path search: distances and predecessor links rooted
/// at `start`, computed at least up to the settling of `end`.
#[derive(Debug)]
pub struct ShortestPathTree {
    /// Node resolved from the start input index.
    pub start: NodeId,
    /// Node resolved from the end input index.
    pub end: NodeId,
    /// Final distance from `start` for every settled node.
    pub distances: SecondaryMap<NodeId, f64>,
    /// Predecessor of every reached node except `start`.
    pub predecessors: SecondaryMap<NodeId, NodeId>,
}

impl ShortestPathTree {
    /// Distance from `start` to `end`.
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.distances.get(self.end).copied().unwrap_or(f64::INFINITY)
    }
}

/// Frontier entry ordered for a min-heap on distance.
///
/// Equal distances fall back to the node key, which orders nodes by
/// insertion, so the pop sequence is fully deterministic for a fixed input.
struct FrontierEntry {
    distance: f64,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Single-source shortest-path search between two input vertex indices.
///
/// Runs Dijkstra over the welded graph — all edge weights are non-negative
/// Euclidean lengths — and stops as soon as the end node is settled, so a
/// localized query never pays for whole-mesh distances.
pub struct SolvePath {
    start: usize,
    end: usize,
}

impl SolvePath {
    /// Creates a new `SolvePath` operation between two input vertex indices.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Executes the search.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EndpointOutOfRange`] if an endpoint index has no
    /// node in the graph, [`PathError::UnreachableTarget`] if the endpoints
    /// lie in disconnected components, and [`PathError::InternalInvariant`]
    /// if a negative edge weight is encountered.
    pub fn execute(&self, graph: &MeshGraph) -> Result<ShortestPathTree> {
        let start = self.resolve(graph, self.start)?;
        let end = self.resolve(graph, self.end)?;

        let mut distances: SecondaryMap<NodeId, f64> = SecondaryMap::new();
        let mut predecessors: SecondaryMap<NodeId, NodeId> = SecondaryMap::new();
        let mut frontier = BinaryHeap::new();
        let mut settled = 0_usize;

        distances.insert(start, 0.0);
        frontier.push(FrontierEntry {
            distance: 0.0,
            node: start,
        });

        while let Some(FrontierEntry { distance, node }) = frontier.pop() {
            let best = distances.get(node).copied().unwrap_or(f64::INFINITY);
            if distance > best {
                // Stale entry superseded by a shorter route.
                continue;
            }
            settled += 1;

            if node == end {
                debug!("settled {settled} of {} nodes", graph.node_count());
                return Ok(ShortestPathTree {
                    start,
                    end,
                    distances,
                    predecessors,
                });
            }

            for &(neighbor, weight) in graph.neighbors(node) {
                if weight < 0.0 {
                    return Err(PathError::InternalInvariant(format!(
                        "negative edge weight {weight}"
                    ))
                    .into());
                }
                let candidate = distance + weight;
                let current = distances.get(neighbor).copied().unwrap_or(f64::INFINITY);
                if candidate < current {
                    distances.insert(neighbor, candidate);
                    predecessors.insert(neighbor, node);
                    frontier.push(FrontierEntry {
                        distance: candidate,
                        node: neighbor,
                    });
                }
            }
        }

        Err(PathError::UnreachableTarget {
            start: self.start,
            end: self.end,
        }
        .into())
    }

    fn resolve(&self, graph: &MeshGraph, index: usize) -> Result<NodeId> {
        graph.node_of_input(index).ok_or_else(|| {
            PathError::EndpointOutOfRange {
                index,
                vertex_count: graph.input_vertex_count(),
            }
            .into()
        })
    }
}
