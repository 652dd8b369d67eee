//! Scene graph error types

use crate::scene::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Unknown scene node {0:?}")]
    UnknownNode(NodeId),

    #[error("Cannot parent {child:?} under {parent:?}: would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}

/// Result type for scene graph operations
pub type SceneResult<T> = Result<T, SceneError>;
