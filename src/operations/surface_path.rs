use log::debug;

use crate::error::{PathError, Result};

use super::{BuildGraph, PathParams, ReconstructPath, SolvePath};

/// Computes a geodesic path between two vertices of a triangulated mesh.
///
/// The full query pipeline: endpoint validation, welding the mesh into a
/// graph, the shortest-path search, and polyline reconstruction. Each
/// invocation owns its graph and intermediate state; nothing is cached or
/// shared across calls, so concurrent queries over different buffers cannot
/// interfere.
pub struct SurfacePath<'a> {
    start: usize,
    end: usize,
    positions: &'a [f32],
    indices: &'a [u32],
    params: PathParams,
}

impl<'a> SurfacePath<'a> {
    /// Creates a new `SurfacePath` query.
    ///
    /// `positions` holds 3 floats per vertex, `indices` 3 vertex indices per
    /// triangle; `start` and `end` are indices into the vertex buffer.
    #[must_use]
    pub fn new(
        start: usize,
        end: usize,
        positions: &'a [f32],
        indices: &'a [u32],
        params: PathParams,
    ) -> Self {
        Self {
            start,
            end,
            positions,
            indices,
            params,
        }
    }

    /// Executes the query, returning the path as flattened (x, y, z)
    /// triples from the welded position of `start` to that of `end`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EndpointOutOfRange`] for an invalid endpoint
    /// index, a [`MeshError`](crate::error::MeshError) for malformed
    /// buffers, and [`PathError::UnreachableTarget`] when the endpoints lie
    /// in disconnected components. A failure never yields a partial path.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Vec<f32>> {
        // Endpoints are checked against the raw vertex count before any
        // graph work begins.
        let vertex_count = self.positions.len() / 3;
        for index in [self.start, self.end] {
            if index >= vertex_count {
                return Err(PathError::EndpointOutOfRange {
                    index,
                    vertex_count,
                }
                .into());
            }
        }

        let graph = BuildGraph::new(self.positions, self.indices, self.params).execute()?;
        let tree = SolvePath::new(self.start, self.end).execute(&graph)?;
        let points = ReconstructPath::new(&tree, self.params).execute(&graph)?;

        debug!(
            "path {} -> {}: {} points, length {}",
            self.start,
            self.end,
            points.len(),
            tree.total_distance()
        );

        let mut flattened = Vec::with_capacity(points.len() * 3);
        for p in points {
            flattened.push(p.x as f32);
            flattened.push(p.y as f32);
            flattened.push(p.z as f32);
        }
        Ok(flattened)
    }
}

/// Computes a geodesic path with default [`PathParams`].
///
/// Convenience wrapper over [`SurfacePath`] matching the buffer layout of
/// GPU-facing mesh assets: flattened f32 positions and u32 triangle indices.
///
/// # Errors
///
/// See [`SurfacePath::execute`].
pub fn get_path(start: usize, end: usize, positions: &[f32], indices: &[u32]) -> Result<Vec<f32>> {
    SurfacePath::new(start, end, positions, indices, PathParams::default()).execute()
}
