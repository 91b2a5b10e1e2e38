//! Depth extent of visible drawables, for fitting camera clip planes.

use crate::geometry::{OpenFrustum, Range};
use crate::scene::{DrawableNode, NodeRef, TypedNodeId};
use crate::visitor::{FrustumCullingVisitor, NodeVisitor, VisitorOutput};

/// Depth extent found by a [`ZNearFarNodeVisitor`]
#[derive(Debug, Clone)]
pub struct ZNearFarResult {
    /// Distances from the near plane, empty if nothing contributed
    pub z_near_far: Range,
    /// Drawables that contributed to the extent, in pre-order
    pub drawable_nodes: Vec<TypedNodeId<DrawableNode>>,
}

/// Culls against an open frustum and measures how far in front of the near
/// plane the surviving drawables reach.
///
/// Distances are measured from the root-space near plane, not from the eye.
/// Drawables entirely behind the near plane are skipped but their subtrees
/// are still visited. The near end is clamped at zero.
#[derive(Debug)]
pub struct ZNearFarNodeVisitor {
    culling: FrustumCullingVisitor<OpenFrustum>,
    z_near_far: Range,
    drawable_nodes: Vec<TypedNodeId<DrawableNode>>,
}

impl ZNearFarNodeVisitor {
    /// Visitor for a root-space open frustum
    pub fn new(frustum: OpenFrustum) -> Self {
        Self {
            culling: FrustumCullingVisitor::new(frustum),
            z_near_far: Range::empty(),
            drawable_nodes: Vec::new(),
        }
    }

    /// Extent so far, empty before any drawable contributed
    pub fn z_near_far(&self) -> Range {
        self.z_near_far
    }

    /// Drawables that contributed so far
    pub fn drawable_nodes(&self) -> &[TypedNodeId<DrawableNode>] {
        &self.drawable_nodes
    }

    /// Frustum in the local space of the last visited node
    pub fn transformed_frustum(&self) -> Option<&OpenFrustum> {
        self.culling.transformed_frustum()
    }

    /// Replace the root-space frustum
    pub fn set_frustum(&mut self, frustum: OpenFrustum) {
        self.culling.set_frustum(frustum);
    }

    /// Start over with an empty extent
    pub fn reset(&mut self) {
        self.z_near_far = Range::empty();
        self.drawable_nodes.clear();
        self.culling.reset();
    }

    fn accumulate(&mut self, node: &NodeRef<'_>, drawable: &DrawableNode) {
        let Some(local) = self.culling.transformed_frustum() else {
            return;
        };
        let local_near = local.near();
        let distances = drawable.bounding_box.pair_distances_to_plane(local_near);
        if distances.is_empty() || distances.far <= 0.0 {
            return;
        }

        let (nearest, farthest) = drawable.bounding_box.support_points(&local_near.normal());
        let global = node.global_transform();
        let root_near = self.culling.frustum().near();
        let near = root_near.distance_to(&global.transform_point(&nearest));
        let far = root_near.distance_to(&global.transform_point(&farthest));

        self.z_near_far.far = self.z_near_far.far.max(far);
        self.z_near_far.near = self.z_near_far.near.min(near.max(0.0));
        self.drawable_nodes.push(TypedNodeId::new(node.id()));
    }
}

impl NodeVisitor for ZNearFarNodeVisitor {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        if !self.culling.visit(node) {
            return false;
        }
        if let Some(drawable) = node.as_drawable() {
            self.accumulate(node, drawable);
        }
        true
    }
}

impl VisitorOutput for ZNearFarNodeVisitor {
    type Output = ZNearFarResult;

    fn into_output(self) -> ZNearFarResult {
        ZNearFarResult {
            z_near_far: self.z_near_far,
            drawable_nodes: self.drawable_nodes,
        }
    }
}
