pub mod error;
pub mod graph;
pub mod math;
pub mod operations;

pub use error::{MeshPathError, Result};
pub use operations::{get_path, PathParams, SurfacePath};
