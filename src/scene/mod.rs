//! Scene graph primitives and the content offset frame

pub mod error;
pub mod graph;
pub mod offset;

pub use error::{SceneError, SceneResult};
pub use graph::{NodeId, SceneGraph};
pub use offset::ContentOffsetFrame;
