//! # Scene Engine
//!
//! Scene graph traversal and frustum culling core for a deferred renderer.
//!
//! ## Features
//!
//! - **Geometry**: planes, lines, bounding boxes, clip ranges and frustums
//! - **Scene Tree**: arena-backed nodes with cached global transforms and bounds
//! - **Visitors**: conditional traversal, frustum culling, near/far fitting, collectors
//! - **Ordering**: explicit sort indices for cameras and drawables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let settings = SceneSettings::default();
//!     let mut scene = SceneGraph::new();
//!
//!     let camera = scene.add_child(scene.root(), "camera", CameraNode::from_settings(&settings.camera))?;
//!     scene.set_local_transform(camera, Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)))?;
//!
//!     let bounds = BoundingBox3::from_center_half_extent(Vec3::zeros(), Vec3::repeat(1.0));
//!     scene.add_child(scene.root(), "cube", DrawableNode::new(bounds))?;
//!
//!     let frustum = scene.camera_frustum(camera)?;
//!     let visible = scene.traverse(scene.root(), DrawableNodeVisitor::new(frustum))?;
//!     assert_eq!(visible.drawable_nodes.len(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod scene;
pub mod sorting;
pub mod visitor;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CameraSettings, Config, ConfigError, CullingSettings, SceneSettings},
        foundation::math::{Mat4, Quat, Transform, Vec3},
        geometry::{BoundingBox3, Frustum, OpenFrustum, Plane, PlaneVolume, Range},
        scene::{
            CameraNode, ClipSpace, DrawableNode, LightKind, LightNode, NodeId, NodeKind, NodeRef,
            SceneError, SceneGraph, TypedNodeId,
        },
        sorting::{Comparator, SortedObject},
        visitor::{
            CollectorVisitor, Condition, ConditionalNodeVisitor, DrawableNodeVisitor,
            FrustumCullingNodeVisitor, NodeCollector, NodeVisitor, VisitorOutput,
            ZNearFarNodeVisitor,
        },
    };
}
