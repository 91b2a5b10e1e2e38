//! Scene tree: node variants, the arena graph and traversal entry points.
//!
//! A [`SceneGraph`] owns every node. Nodes are addressed by [`NodeId`] and
//! visited through [`NodeRef`], which also exposes the lazily cached global
//! transform and aggregated bounds.

mod graph;
pub mod kinds;
mod node;
mod render_context;

#[cfg(test)]
mod tests;

pub use graph::{NodeId, NodeRef, SceneError, SceneGraph, SceneResult, TypedNodeId};
pub use kinds::{
    BoneNode, CameraNode, ClipSpace, DrawableFlags, DrawableNode, LightKind, LightNode,
    ListenerNode, SceneRootNode, SkeletalAnimatedNode, SoundNode,
};
pub use node::{Node, NodeKind, NodeVariant};
pub use render_context::{MeshHandle, RenderContext};
