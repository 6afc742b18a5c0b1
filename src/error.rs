use thiserror::Error;

/// Top-level error type for the meshpath crate.
#[derive(Debug, Error)]
pub enum MeshPathError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Errors raised while validating or welding the input mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("vertex buffer length {len} is not a multiple of 3")]
    VertexBufferLength { len: usize },

    #[error("index buffer length {len} is not a multiple of 3")]
    IndexBufferLength { len: usize },

    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    TriangleIndexOutOfRange { index: u32, vertex_count: usize },

    #[error("non-finite coordinate in vertex buffer at offset {offset}")]
    NonFiniteCoordinate { offset: usize },
}

/// Errors raised while solving or reconstructing a path query.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("endpoint index {index} out of range for {vertex_count} vertices")]
    EndpointOutOfRange { index: usize, vertex_count: usize },

    #[error("no path exists between vertices {start} and {end}")]
    UnreachableTarget { start: usize, end: usize },

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Convenience type alias for results using [`MeshPathError`].
pub type Result<T> = std::result::Result<T, MeshPathError>;
