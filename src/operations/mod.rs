mod build_graph;
mod reconstruct_path;
mod solve_path;
mod surface_path;

pub use build_graph::BuildGraph;
pub use reconstruct_path::ReconstructPath;
pub use solve_path::{ShortestPathTree, SolvePath};
pub use surface_path::{get_path, SurfacePath};

/// Parameters controlling a geodesic path query.
#[derive(Debug, Clone, Copy)]
pub struct PathParams {
    /// Welding tolerance as a fraction of the mesh bounding-box diagonal.
    ///
    /// Vertices closer than this (Euclidean) are merged into one graph node,
    /// bridging seam duplicates left by exporters. Relative to the mesh
    /// extent, so welding is scale invariant.
    pub weld_tolerance: f64,
    /// Whether to drop path vertices that lie on the segment joining their
    /// neighbors, collapsing collinear runs into single segments.
    pub straighten: bool,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            weld_tolerance: 1e-6,
            straighten: true,
        }
    }
}
