use log::debug;

use crate::error::{MeshError, Result};
use crate::graph::{MeshGraph, NodeData, NodeId};
use crate::math::spatial_hash::SpatialHash;
use crate::math::{bounding_box_diagonal, Point3};

use super::PathParams;

/// Builds a welded adjacency graph from a flattened triangle mesh.
///
/// Rendering-oriented meshes duplicate vertices along UV and normal seams,
/// so triangles on either side of a seam never share indices even though
/// they share geometry. Welding merges near-coincident vertices into one
/// node each before edges are derived from triangle connectivity, restoring
/// traversability across seams.
pub struct BuildGraph<'a> {
    positions: &'a [f32],
    indices: &'a [u32],
    params: PathParams,
}

impl<'a> BuildGraph<'a> {
    /// Creates a new `BuildGraph` operation over borrowed mesh buffers.
    #[must_use]
    pub fn new(positions: &'a [f32], indices: &'a [u32], params: PathParams) -> Self {
        Self {
            positions,
            indices,
            params,
        }
    }

    /// Executes the build, returning the welded graph.
    ///
    /// # Errors
    ///
    /// Returns a [`MeshError`] if a buffer length is not a multiple of 3, a
    /// triangle index is out of range, or a coordinate is not finite.
    pub fn execute(&self) -> Result<MeshGraph> {
        let points = self.validate()?;
        let mut graph = MeshGraph::new();

        self.weld(&points, &mut graph);
        self.connect(&mut graph)?;

        debug!(
            "built graph: {} nodes from {} vertices, {} edges",
            graph.node_count(),
            points.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Checks buffer invariants and widens positions to f64.
    ///
    /// All downstream arithmetic runs in double precision regardless of the
    /// f32 input, so edge weights do not compound rounding error over long
    /// paths.
    fn validate(&self) -> Result<Vec<Point3>> {
        if self.positions.len() % 3 != 0 {
            return Err(MeshError::VertexBufferLength {
                len: self.positions.len(),
            }
            .into());
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexBufferLength {
                len: self.indices.len(),
            }
            .into());
        }

        for (offset, &c) in self.positions.iter().enumerate() {
            if !c.is_finite() {
                return Err(MeshError::NonFiniteCoordinate { offset }.into());
            }
        }

        let vertex_count = self.positions.len() / 3;
        for &index in self.indices {
            if index as usize >= vertex_count {
                return Err(MeshError::TriangleIndexOutOfRange {
                    index,
                    vertex_count,
                }
                .into());
            }
        }

        Ok(self
            .positions
            .chunks_exact(3)
            .map(|c| Point3::new(f64::from(c[0]), f64::from(c[1]), f64::from(c[2])))
            .collect())
    }

    /// Partitions input vertices into welded nodes via the hash grid.
    ///
    /// A vertex joins the first existing node whose representative lies
    /// within ε of it; otherwise it founds a new node. ε is relative to the
    /// bounding-box diagonal, and only representatives enter the grid, so
    /// each vertex is checked against a handful of candidates.
    fn weld(&self, points: &[Point3], graph: &mut MeshGraph) {
        let diagonal = bounding_box_diagonal(points);
        let epsilon = if diagonal > 0.0 {
            diagonal * self.params.weld_tolerance
        } else {
            // Zero-extent mesh: every vertex coincides, any cell size works.
            1.0
        };

        let mut grid = SpatialHash::new(epsilon);
        let mut slot_to_node: Vec<NodeId> = Vec::new();

        for &point in points {
            let node = match grid.find_within(&point, epsilon) {
                Some(slot) => slot_to_node[slot],
                None => {
                    let node = graph.add_node(NodeData::new(point));
                    grid.insert(point);
                    slot_to_node.push(node);
                    node
                }
            };
            graph.map_input_vertex(node);
        }
    }

    /// Derives undirected edges from triangle connectivity.
    ///
    /// Triangles whose corners collapse to fewer than 3 distinct nodes after
    /// welding are skipped.
    fn connect(&self, graph: &mut MeshGraph) -> Result<()> {
        for chunk in self.indices.chunks_exact(3) {
            let mut corners = [NodeId::default(); 3];
            for (corner, &index) in corners.iter_mut().zip(chunk) {
                *corner = graph.node_of_input(index as usize).ok_or_else(|| {
                    MeshError::TriangleIndexOutOfRange {
                        index,
                        vertex_count: graph.input_vertex_count(),
                    }
                })?;
            }

            let [a, b, c] = corners;
            if a == b || b == c || a == c {
                continue;
            }

            for (from, to) in [(a, b), (b, c), (c, a)] {
                let weight = self.edge_weight(graph, from, to)?;
                graph.add_edge(from, to, weight);
            }
        }
        Ok(())
    }

    fn edge_weight(&self, graph: &MeshGraph, from: NodeId, to: NodeId) -> Result<f64> {
        let missing = || {
            crate::error::PathError::InternalInvariant("edge endpoint not in graph".into())
        };
        let p = graph.node(from).ok_or_else(missing)?.position;
        let q = graph.node(to).ok_or_else(missing)?.position;
        Ok((p - q).norm())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MeshPathError;

    /// Two triangles sharing the edge 1—2.
    fn quad() -> (Vec<f32>, Vec<u32>) {
        let positions = vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0,
        ];
        let indices = vec![0, 1, 2, 1, 3, 2];
        (positions, indices)
    }

    #[test]
    fn quad_yields_four_nodes_five_edges() {
        let (positions, indices) = quad();
        let graph = BuildGraph::new(&positions, &indices, PathParams::default())
            .execute()
            .unwrap();
        assert_eq!(graph.node_count(), 4);
        // 0-1, 1-2, 2-0, 1-3, 3-2; the shared edge 1-2 is stored once.
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn edge_weights_are_euclidean() {
        let (positions, indices) = quad();
        let graph = BuildGraph::new(&positions, &indices, PathParams::default())
            .execute()
            .unwrap();
        let a = graph.node_of_input(0).unwrap();
        let b = graph.node_of_input(1).unwrap();
        let w = graph
            .neighbors(a)
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, w)| w)
            .unwrap();
        assert!((w - 1.0).abs() < 1e-12, "w={w}");
    }

    #[test]
    fn duplicated_vertices_weld_into_one_node() {
        // Same quad, but the shared edge vertices are duplicated, as a seam
        // exporter would emit them. 6 input vertices, 4 distinct positions.
        let positions = vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0, // duplicate of vertex 1
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, // duplicate of vertex 2
        ];
        let indices = vec![0, 1, 2, 3, 4, 5];
        let graph = BuildGraph::new(&positions, &indices, PathParams::default())
            .execute()
            .unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.node_of_input(1), graph.node_of_input(3));
        assert_eq!(graph.node_of_input(2), graph.node_of_input(5));
    }

    #[test]
    fn welding_tolerance_is_scale_invariant() {
        // Two vertices 1e-9 apart on a unit-scale mesh weld; scaling the
        // whole mesh by 1e6 must not change that.
        for scale in [1.0_f32, 1e6] {
            let positions = vec![
                0.0,
                0.0,
                0.0,
                scale,
                0.0,
                0.0,
                0.0,
                scale,
                0.0,
                scale * (1.0 + 1e-9),
                0.0,
                0.0,
            ];
            let indices = vec![0, 1, 2, 0, 3, 2];
            let graph = BuildGraph::new(&positions, &indices, PathParams::default())
                .execute()
                .unwrap();
            assert_eq!(graph.node_count(), 3, "scale={scale}");
        }
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        // The second triangle collapses to 2 distinct nodes after welding.
        let positions = vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0, // coincides with vertex 1
        ];
        let indices = vec![0, 1, 2, 0, 1, 3];
        let graph = BuildGraph::new(&positions, &indices, PathParams::default())
            .execute()
            .unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn vertex_buffer_length_must_be_multiple_of_three() {
        let err = BuildGraph::new(&[0.0, 1.0], &[], PathParams::default())
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            MeshPathError::Mesh(MeshError::VertexBufferLength { len: 2 })
        ));
    }

    #[test]
    fn index_buffer_length_must_be_multiple_of_three() {
        let positions = vec![0.0; 9];
        let err = BuildGraph::new(&positions, &[0, 1], PathParams::default())
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            MeshPathError::Mesh(MeshError::IndexBufferLength { len: 2 })
        ));
    }

    #[test]
    fn triangle_index_out_of_range_is_rejected() {
        let positions = vec![0.0; 9];
        let err = BuildGraph::new(&positions, &[0, 1, 7], PathParams::default())
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            MeshPathError::Mesh(MeshError::TriangleIndexOutOfRange {
                index: 7,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let positions = vec![0.0, 0.0, 0.0, f32::NAN, 0.0, 0.0, 0.0, 1.0, 0.0];
        let err = BuildGraph::new(&positions, &[0, 1, 2], PathParams::default())
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            MeshPathError::Mesh(MeshError::NonFiniteCoordinate { offset: 3 })
        ));
    }

    #[test]
    fn zero_extent_mesh_welds_to_single_node() {
        let positions = vec![2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0];
        let graph = BuildGraph::new(&positions, &[0, 1, 2], PathParams::default())
            .execute()
            .unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
