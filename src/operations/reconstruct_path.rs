use crate::error::{PathError, Result};
use crate::graph::{MeshGraph, NodeId};
use crate::math::distance_3d::point_to_segment_dist;
use crate::math::Point3;

use super::{PathParams, ShortestPathTree};

/// Maximum offset of a dropped vertex from the segment joining its
/// neighbors, relative to the segment length.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// Turns a shortest-path tree into an ordered polyline of 3D points.
///
/// Walks predecessor links from the end node back to the start, reverses,
/// and resolves each welded node to its representative position. With
/// straightening enabled, interior vertices lying on the segment joining
/// their neighbors are dropped, collapsing runs of collinear edges into
/// single segments; the collapsed segment passes through the dropped
/// vertices, so it never leaves the surface. Beyond that the polyline is the
/// exact edge-graph shortest path, not a continuous geodesic.
pub struct ReconstructPath<'a> {
    tree: &'a ShortestPathTree,
    params: PathParams,
}

impl<'a> ReconstructPath<'a> {
    /// Creates a new `ReconstructPath` operation.
    #[must_use]
    pub fn new(tree: &'a ShortestPathTree, params: PathParams) -> Self {
        Self { tree, params }
    }

    /// Executes the reconstruction, returning points in start→end order.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InternalInvariant`] if the predecessor chain is
    /// broken or cyclic; a successful solve never produces either.
    pub fn execute(&self, graph: &MeshGraph) -> Result<Vec<Point3>> {
        let mut nodes = self.walk_predecessors(graph)?;
        if self.params.straighten {
            self.straighten(graph, &mut nodes)?;
        }

        nodes
            .into_iter()
            .map(|id| self.position(graph, id))
            .collect()
    }

    fn walk_predecessors(&self, graph: &MeshGraph) -> Result<Vec<NodeId>> {
        let mut nodes = vec![self.tree.end];
        let mut current = self.tree.end;

        while current != self.tree.start {
            let Some(&previous) = self.tree.predecessors.get(current) else {
                return Err(PathError::InternalInvariant(
                    "predecessor chain broken before reaching start".into(),
                )
                .into());
            };
            nodes.push(previous);
            current = previous;

            if nodes.len() > graph.node_count() {
                return Err(
                    PathError::InternalInvariant("predecessor chain is cyclic".into()).into(),
                );
            }
        }

        nodes.reverse();
        Ok(nodes)
    }

    /// Drops interior vertices that lie on the segment joining their
    /// neighbors. Endpoints are never touched.
    fn straighten(&self, graph: &MeshGraph, nodes: &mut Vec<NodeId>) -> Result<()> {
        let mut i = 1;
        while i + 1 < nodes.len() {
            let a = self.position(graph, nodes[i - 1])?;
            let b = self.position(graph, nodes[i])?;
            let c = self.position(graph, nodes[i + 1])?;

            let span = (c - a).norm();
            if span > 0.0 && point_to_segment_dist(&b, &a, &c) < COLLINEAR_TOLERANCE * span {
                nodes.remove(i);
                // Re-examine from the previous vertex: removing b may have
                // made it collinear with its new neighbors.
                i = i.saturating_sub(1).max(1);
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    fn position(&self, graph: &MeshGraph, id: NodeId) -> Result<Point3> {
        graph.node(id).map(|n| n.position).ok_or_else(|| {
            PathError::InternalInvariant("path node not in graph".into()).into()
        })
    }
}
