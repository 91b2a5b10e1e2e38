//! Frustum culling condition and the visitors built on it.
//!
//! The frustum is given in root space. For every node its planes are pulled
//! back into the node's local space through the global transform, so the
//! node's bounding box can be tested without transforming the box.

use crate::geometry::{Frustum, PlaneVolume};
use crate::scene::{DrawableNode, NodeId, NodeRef, TypedNodeId};
use crate::visitor::{Condition, ConditionalNodeVisitor, NodeVisitor, VisitorOutput};

/// Passes nodes whose bounds touch the frustum.
///
/// Keeps the frustum transformed into the local space of the node it checked
/// last, for visitors that run further tests on the same node.
#[derive(Debug, Clone)]
pub struct FrustumCullingCondition<F: PlaneVolume = Frustum> {
    frustum: F,
    transformed_frustum: Option<F>,
}

impl<F: PlaneVolume> FrustumCullingCondition<F> {
    /// Condition testing against a root-space `frustum`
    pub fn new(frustum: F) -> Self {
        Self {
            frustum,
            transformed_frustum: None,
        }
    }

    /// Root-space frustum
    pub fn frustum(&self) -> &F {
        &self.frustum
    }

    /// Replace the root-space frustum
    pub fn set_frustum(&mut self, frustum: F) {
        self.frustum = frustum;
        self.transformed_frustum = None;
    }

    /// Frustum in the local space of the last checked node
    pub fn transformed_frustum(&self) -> Option<&F> {
        self.transformed_frustum.as_ref()
    }

    /// Forget the last transformed frustum
    pub fn reset(&mut self) {
        self.transformed_frustum = None;
    }
}

impl<F: PlaneVolume> Condition for FrustumCullingCondition<F> {
    fn check(&mut self, node: &NodeRef<'_>) -> bool {
        let local = self.frustum.to_local(&node.global_transform());
        let inside = local.contain(&node.bounding_box());
        self.transformed_frustum = Some(local);
        inside
    }
}

/// Conditional visitor pruning every subtree outside a frustum
#[derive(Debug)]
pub struct FrustumCullingVisitor<F: PlaneVolume = Frustum> {
    inner: ConditionalNodeVisitor<FrustumCullingCondition<F>>,
}

impl<F: PlaneVolume> FrustumCullingVisitor<F> {
    /// Visitor culling against a root-space `frustum`
    pub fn new(frustum: F) -> Self {
        Self {
            inner: ConditionalNodeVisitor::new(FrustumCullingCondition::new(frustum)),
        }
    }

    /// The culling condition
    pub fn condition(&self) -> &FrustumCullingCondition<F> {
        self.inner
            .condition()
            .expect("frustum culling visitor always owns its condition")
    }

    fn condition_mut(&mut self) -> &mut FrustumCullingCondition<F> {
        self.inner
            .condition_mut()
            .expect("frustum culling visitor always owns its condition")
    }

    /// Root-space frustum
    pub fn frustum(&self) -> &F {
        self.condition().frustum()
    }

    /// Replace the root-space frustum, e.g. for the next frame
    pub fn set_frustum(&mut self, frustum: F) {
        self.condition_mut().set_frustum(frustum);
    }

    /// Frustum in the local space of the last visited node
    pub fn transformed_frustum(&self) -> Option<&F> {
        self.condition().transformed_frustum()
    }

    /// Forget per-traversal state
    pub fn reset(&mut self) {
        self.condition_mut().reset();
    }
}

impl<F: PlaneVolume> NodeVisitor for FrustumCullingVisitor<F> {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        self.inner.visit(node)
    }
}

/// Nodes that passed frustum culling
#[derive(Debug, Clone)]
pub struct CullingResult<F = Frustum> {
    /// Passing nodes in pre-order
    pub nodes: Vec<NodeId>,
    /// Frustum in the local space of the last visited node
    pub transformed_frustum: Option<F>,
}

/// Frustum culling that records every node it lets through
#[derive(Debug)]
pub struct FrustumCullingNodeVisitor<F: PlaneVolume = Frustum> {
    culling: FrustumCullingVisitor<F>,
    nodes: Vec<NodeId>,
}

impl<F: PlaneVolume> FrustumCullingNodeVisitor<F> {
    /// Visitor culling against a root-space `frustum`
    pub fn new(frustum: F) -> Self {
        Self {
            culling: FrustumCullingVisitor::new(frustum),
            nodes: Vec::new(),
        }
    }

    /// Passing nodes in pre-order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Frustum in the local space of the last visited node
    pub fn transformed_frustum(&self) -> Option<&F> {
        self.culling.transformed_frustum()
    }

    /// Underlying culling visitor
    pub fn culling(&self) -> &FrustumCullingVisitor<F> {
        &self.culling
    }

    /// Replace the root-space frustum
    pub fn set_frustum(&mut self, frustum: F) {
        self.culling.set_frustum(frustum);
    }

    /// Drop collected nodes so the visitor can run again
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.culling.reset();
    }
}

impl<F: PlaneVolume> NodeVisitor for FrustumCullingNodeVisitor<F> {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        let inside = self.culling.visit(node);
        if inside {
            self.nodes.push(node.id());
        }
        inside
    }
}

impl<F: PlaneVolume> VisitorOutput for FrustumCullingNodeVisitor<F> {
    type Output = CullingResult<F>;

    fn into_output(self) -> CullingResult<F> {
        let transformed_frustum = self.culling.transformed_frustum().cloned();
        CullingResult {
            nodes: self.nodes,
            transformed_frustum,
        }
    }
}

/// Drawables that passed frustum culling
#[derive(Debug, Clone)]
pub struct DrawableCullingResult<F = Frustum> {
    /// Visible drawables in pre-order
    pub drawable_nodes: Vec<TypedNodeId<DrawableNode>>,
    /// Frustum in the local space of the last visited node
    pub transformed_frustum: Option<F>,
}

/// Frustum culling that records visible drawables.
///
/// A subtree is entered when its aggregated bounds touch the frustum; a
/// drawable is recorded only when its own bounds do.
#[derive(Debug)]
pub struct DrawableNodeVisitor<F: PlaneVolume = Frustum> {
    culling: FrustumCullingVisitor<F>,
    drawable_nodes: Vec<TypedNodeId<DrawableNode>>,
}

impl<F: PlaneVolume> DrawableNodeVisitor<F> {
    /// Visitor culling against a root-space `frustum`
    pub fn new(frustum: F) -> Self {
        Self {
            culling: FrustumCullingVisitor::new(frustum),
            drawable_nodes: Vec::new(),
        }
    }

    /// Visible drawables in pre-order
    pub fn drawable_nodes(&self) -> &[TypedNodeId<DrawableNode>] {
        &self.drawable_nodes
    }

    /// Frustum in the local space of the last visited node
    pub fn transformed_frustum(&self) -> Option<&F> {
        self.culling.transformed_frustum()
    }

    /// Replace the root-space frustum
    pub fn set_frustum(&mut self, frustum: F) {
        self.culling.set_frustum(frustum);
    }

    /// Drop collected drawables so the visitor can run again
    pub fn clear(&mut self) {
        self.drawable_nodes.clear();
        self.culling.reset();
    }
}

impl<F: PlaneVolume> NodeVisitor for DrawableNodeVisitor<F> {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        if !self.culling.visit(node) {
            return false;
        }
        if let (Some(drawable), Some(local)) = (node.as_drawable(), self.culling.transformed_frustum()) {
            if local.contain(&drawable.bounding_box) {
                self.drawable_nodes.push(TypedNodeId::new(node.id()));
            }
        }
        true
    }
}

impl<F: PlaneVolume> VisitorOutput for DrawableNodeVisitor<F> {
    type Output = DrawableCullingResult<F>;

    fn into_output(self) -> DrawableCullingResult<F> {
        let transformed_frustum = self.culling.transformed_frustum().cloned();
        DrawableCullingResult {
            drawable_nodes: self.drawable_nodes,
            transformed_frustum,
        }
    }
}
