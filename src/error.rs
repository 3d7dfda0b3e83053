use thiserror::Error;

use crate::topology::{GlobalId, ObjectId};

/// Top-level error type for the selection engine.
#[derive(Debug, Error)]
pub enum MeshpickError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors related to the geometric (B-rep) model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to discretized meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("{collection} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    #[error("non-reciprocal adjacency: {0}")]
    BrokenAdjacency(String),

    #[error("element with {nodes} nodes does not match shape {shape}")]
    NodeCountMismatch { shape: &'static str, nodes: usize },

    #[error("degenerate mesh input: {0}")]
    Degenerate(String),
}

/// Errors raised while constructing a command.
///
/// None of these are user-facing: the selector logs them and treats the
/// request as a no-op.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no active object or mesh")]
    NoTarget,

    #[error("stale index {index} (collection has {len} items)")]
    StaleIndex { index: usize, len: usize },

    #[error("unknown entity: {0}")]
    UnknownEntity(GlobalId),

    #[error("entity kind {0} cannot be addressed by this command")]
    LevelMismatch(&'static str),
}

/// Convenience type alias for results using [`MeshpickError`].
pub type Result<T> = std::result::Result<T, MeshpickError>;
