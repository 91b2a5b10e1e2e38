//! Arena-backed scene tree with cached global transforms and bounds.

use std::ops::Deref;

use thiserror::Error;

use crate::foundation::collections::{SlotMap, TypedHandle};
use crate::foundation::logging::{debug, error, trace, warn};
use crate::foundation::math::Transform;
use crate::geometry::{BoundingBox3, Frustum, OpenFrustum};
use crate::scene::kinds::{CameraNode, DrawableNode, SceneRootNode};
use crate::scene::node::{Node, NodeKind, NodeVariant};
use crate::scene::RenderContext;
use crate::sorting::Comparator;
use crate::visitor::{CollectorVisitor, NodeVisitor, VisitorOutput};

slotmap::new_key_type! {
    /// Handle of a node in a [`SceneGraph`]
    pub struct NodeId;
}

/// Node handle tagged with the variant it is expected to be
pub type TypedNodeId<T> = TypedHandle<NodeId, T>;

/// Errors from structural edits and typed lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The id does not resolve (never inserted or already removed)
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Attaching would make a node its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },

    /// The scene root cannot be attached, detached or removed
    #[error("The scene root cannot be re-parented or removed")]
    RootImmutable,

    /// The node is not of the requested variant
    #[error("Node {id:?} is a {found}, expected {expected}")]
    UnexpectedKind {
        /// Node looked up
        id: NodeId,
        /// Requested variant
        expected: &'static str,
        /// Actual variant
        found: &'static str,
    },
}

/// Result alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Borrowed view of a node together with the graph it lives in.
///
/// Visitors receive this so they can query derived state (global transform,
/// aggregated bounds) without access to the arena.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    graph: &'a SceneGraph,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    /// Handle of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Graph this node belongs to
    pub fn graph(&self) -> &'a SceneGraph {
        self.graph
    }

    /// Underlying node
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Root-space transform
    pub fn global_transform(&self) -> Transform {
        self.graph.cached_global_transform(self.node)
    }

    /// Local-space bounds of the node and its whole subtree
    pub fn bounding_box(&self) -> BoundingBox3 {
        self.graph.cached_bounding_box(self.id, self.node)
    }

    /// Local-space bounds of the node alone
    pub fn local_bounding_box(&self) -> BoundingBox3 {
        self.node.intrinsic_bounding_box()
    }

    /// Parent view, `None` for the root and detached nodes
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|id| self.graph.get(id))
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.node.name)
            .field("kind", &self.node.kind.type_name())
            .finish()
    }
}

/// Tree of scene nodes.
///
/// Nodes live in a slot map; ids of removed nodes stop resolving instead of
/// dangling. Global transforms are invalidated downward and recomputed on
/// demand; aggregated bounds are invalidated upward and recomputed on demand.
/// The caches use interior mutability, so the graph is `Send` but not `Sync`.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Graph holding only the scene root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root".to_string(), SceneRootNode.into()));
        Self { nodes, root }
    }

    /// The scene root
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes including the root and detached nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether `id` resolves
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Insert a detached node
    pub fn insert(&mut self, name: impl Into<String>, kind: impl Into<NodeKind>) -> NodeId {
        self.nodes.insert(Node::new(name.into(), kind.into()))
    }

    /// Insert a node as the last child of `parent`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: impl Into<NodeKind>,
    ) -> SceneResult<NodeId> {
        self.node(parent)?;
        let child = self.insert(name, kind);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Make `child` the last child of `parent`, detaching it from its current
    /// parent first.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        if child == self.root {
            warn!("Rejected attaching the scene root under {parent:?}");
            return Err(SceneError::RootImmutable);
        }
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_or_self(child, parent) {
            warn!("Rejected attaching {child:?} under its descendant {parent:?}");
            return Err(SceneError::CycleDetected { parent, child });
        }

        self.unlink(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        self.invalidate_global_transforms(child);
        self.invalidate_bounds(parent);
        Ok(())
    }

    /// Detach `id` from its parent; the subtree stays in the graph
    pub fn detach(&mut self, id: NodeId) -> SceneResult<()> {
        if id == self.root {
            warn!("Rejected detaching the scene root");
            return Err(SceneError::RootImmutable);
        }
        self.node(id)?;
        self.unlink(id);
        self.invalidate_global_transforms(id);
        Ok(())
    }

    /// Remove `id` and its whole subtree, returning how many nodes were removed
    pub fn remove(&mut self, id: NodeId) -> SceneResult<usize> {
        if id == self.root {
            warn!("Rejected removing the scene root");
            return Err(SceneError::RootImmutable);
        }
        self.node(id)?;
        self.unlink(id);

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        debug!("Removed {removed} node(s) starting at {id:?}");
        Ok(removed)
    }

    /// View of a node, `None` if the id does not resolve
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(id).map(|node| NodeRef { graph: self, id, node })
    }

    /// View of a node, erroring if the id does not resolve
    pub fn node_ref(&self, id: NodeId) -> SceneResult<NodeRef<'_>> {
        self.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Payload of `id` viewed as `T`
    pub fn get_as<T: NodeVariant>(&self, id: NodeId) -> SceneResult<&T> {
        let node = self.node(id)?;
        T::from_kind(&node.kind).ok_or_else(|| SceneError::UnexpectedKind {
            id,
            expected: T::NAME,
            found: node.kind.type_name(),
        })
    }

    /// Mutable payload of `id` viewed as `T`
    pub fn get_as_mut<T: NodeVariant>(&mut self, id: NodeId) -> SceneResult<&mut T> {
        let found = self.node(id)?.kind.type_name();
        self.kind_mut(id).and_then(|kind| {
            T::from_kind_mut(kind).ok_or(SceneError::UnexpectedKind {
                id,
                expected: T::NAME,
                found,
            })
        })
    }

    /// Resolve a typed handle; `None` once removed or if the variant changed
    pub fn get_typed<T: NodeVariant>(&self, handle: TypedNodeId<T>) -> Option<&T> {
        self.nodes
            .get(handle.key())
            .and_then(|node| T::from_kind(&node.kind))
    }

    /// Mutable payload; bounds of the node and its ancestors are recomputed
    /// on next use
    pub fn kind_mut(&mut self, id: NodeId) -> SceneResult<&mut NodeKind> {
        self.node(id)?;
        self.invalidate_bounds(id);
        self.nodes
            .get_mut(id)
            .map(|node| &mut node.kind)
            .ok_or(SceneError::NodeNotFound(id))
    }

    /// Rename a node
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> SceneResult<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(SceneError::NodeNotFound(id))?;
        node.name = name.into();
        Ok(())
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children of `id` in insertion order
    pub fn children(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// First node named `name` in pre-order from the root
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.name == name {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Transform relative to the parent
    pub fn local_transform(&self, id: NodeId) -> SceneResult<Transform> {
        Ok(self.node(id)?.local_transform)
    }

    /// Replace the transform relative to the parent
    pub fn set_local_transform(&mut self, id: NodeId, transform: Transform) -> SceneResult<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(SceneError::NodeNotFound(id))?;
        node.local_transform = transform;
        let parent = node.parent;

        self.invalidate_global_transforms(id);
        if let Some(parent) = parent {
            self.invalidate_bounds(parent);
        }
        Ok(())
    }

    /// Root-space transform of `id`
    pub fn global_transform(&self, id: NodeId) -> SceneResult<Transform> {
        Ok(self.cached_global_transform(self.node(id)?))
    }

    /// Local-space bounds of `id` and its subtree
    pub fn bounding_box(&self, id: NodeId) -> SceneResult<BoundingBox3> {
        Ok(self.cached_bounding_box(id, self.node(id)?))
    }

    /// Local-space bounds of `id` alone
    pub fn local_bounding_box(&self, id: NodeId) -> SceneResult<BoundingBox3> {
        Ok(self.node(id)?.intrinsic_bounding_box())
    }

    /// Root-space box around `id` and its subtree
    pub fn world_bounding_box(&self, id: NodeId) -> SceneResult<BoundingBox3> {
        let node = self.node(id)?;
        Ok(self.cached_global_transform(node) * self.cached_bounding_box(id, node))
    }

    /// Visit `id` alone, returning the visitor's decision
    pub fn visit_node<V>(&self, id: NodeId, visitor: &mut V) -> SceneResult<bool>
    where
        V: NodeVisitor + ?Sized,
    {
        let node = self.node_ref(id)?;
        Ok(visitor.visit(&node))
    }

    /// Visit `id` and, if the visitor accepts it, its children in order.
    ///
    /// Returns the decision taken on `id` itself.
    pub fn accept<V>(&self, id: NodeId, visitor: &mut V) -> SceneResult<bool>
    where
        V: NodeVisitor + ?Sized,
    {
        self.walk(id, visitor)
    }

    /// Visit the subtree of `id` in pre-order, skipping the subtree of every
    /// node the visitor rejects.
    pub fn accept_down<V>(&self, id: NodeId, visitor: &mut V) -> SceneResult<()>
    where
        V: NodeVisitor + ?Sized,
    {
        self.walk(id, visitor).map(|_| ())
    }

    fn walk<V>(&self, id: NodeId, visitor: &mut V) -> SceneResult<bool>
    where
        V: NodeVisitor + ?Sized,
    {
        self.node(id)?;

        let mut accepted = false;
        let mut visited = 0usize;
        let mut pruned = 0usize;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            visited += 1;
            let descend = visitor.visit(&NodeRef { graph: self, id: current, node });
            if current == id {
                accepted = descend;
            }
            if descend {
                stack.extend(node.children.iter().rev().copied());
            } else {
                pruned += 1;
                trace!("Pruned subtree at '{}' ({current:?})", node.name);
            }
        }

        debug!("Traversal from {id:?}: {visited} visited, {pruned} pruned");
        Ok(accepted)
    }

    /// Run `visitor` over the subtree of `id` and return its result
    pub fn traverse<V: VisitorOutput>(&self, id: NodeId, mut visitor: V) -> SceneResult<V::Output> {
        self.accept_down(id, &mut visitor)?;
        Ok(visitor.into_output())
    }

    /// Root-space view frustum of a camera node
    pub fn camera_frustum(&self, camera: NodeId) -> SceneResult<Frustum> {
        let clip_space = self.get_as::<CameraNode>(camera)?.clip_space;
        Ok(self.global_transform(camera)? * clip_space.frustum())
    }

    /// Root-space view frustum of a camera node without the far plane
    pub fn camera_open_frustum(&self, camera: NodeId) -> SceneResult<OpenFrustum> {
        let clip_space = self.get_as::<CameraNode>(camera)?.clip_space;
        Ok(self.global_transform(camera)? * clip_space.open_frustum())
    }

    /// Active cameras under the root, in submission order.
    ///
    /// Cameras with equal (or no) sort index keep their pre-order position.
    pub fn sorted_cameras(&self) -> Vec<TypedNodeId<CameraNode>> {
        let mut collector = CollectorVisitor::<CameraNode>::new();
        if self.accept_down(self.root, &mut collector).is_err() {
            return Vec::new();
        }

        let mut cameras: Vec<_> = collector
            .into_output()
            .into_iter()
            .filter_map(|handle| self.get_typed(handle).map(|camera| (handle, camera)))
            .filter(|(_, camera)| camera.active)
            .collect();
        cameras.sort_by(|(_, a), (_, b)| Comparator::compare(*a, *b));
        cameras.into_iter().map(|(handle, _)| handle).collect()
    }

    /// Pull a drawable's bounds from its mesh.
    ///
    /// Returns whether the bounds changed. Without a render context this
    /// logs an error and does nothing.
    pub fn refresh_drawable_bounds(
        &mut self,
        id: NodeId,
        context: Option<&dyn RenderContext>,
    ) -> SceneResult<bool> {
        let drawable = self.get_as::<DrawableNode>(id)?;
        let Some(context) = context else {
            error!("No render context available to refresh bounds of {id:?}");
            return Ok(false);
        };
        let Some(mesh) = drawable.mesh else {
            return Ok(false);
        };
        let Some(bounds) = context.mesh_bounds(mesh) else {
            warn!("Mesh {mesh:?} of {id:?} has no bounds");
            return Ok(false);
        };
        if drawable.bounding_box == bounds {
            return Ok(false);
        }

        self.get_as_mut::<DrawableNode>(id)?.bounding_box = bounds;
        Ok(true)
    }

    fn node(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(node_id).and_then(|node| node.parent);
        }
        false
    }

    /// Cut the parent link of `id` on both sides
    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&child| child != id);
        }
        self.invalidate_bounds(parent);
    }

    /// Clear cached global transforms of `id` and its descendants.
    ///
    /// A cached descendant implies a cached ancestor, so descent stops at
    /// nodes that are already stale.
    fn invalidate_global_transforms(&self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.global_transform.take().is_some() || current == id {
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Clear cached bounds of `id` and its ancestors.
    ///
    /// A cached ancestor implies cached descendants, so the walk stops at the
    /// first node that is already stale.
    fn invalidate_bounds(&self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(node_id) else {
                return;
            };
            if node.bounding_box.take().is_none() && node_id != id {
                return;
            }
            current = node.parent;
        }
    }

    fn cached_global_transform(&self, node: &Node) -> Transform {
        if let Some(transform) = node.global_transform.get() {
            return transform;
        }

        // Walk up to the nearest cached ancestor, then fold back down
        let mut chain = vec![node];
        let mut global = Transform::identity();
        let mut parent = node.parent;
        while let Some(parent_node) = parent.and_then(|id| self.nodes.get(id)) {
            if let Some(transform) = parent_node.global_transform.get() {
                global = transform;
                break;
            }
            chain.push(parent_node);
            parent = parent_node.parent;
        }

        for link in chain.iter().rev() {
            global = global * link.local_transform;
            link.global_transform.set(Some(global));
        }
        global
    }

    fn cached_bounding_box(&self, id: NodeId, node: &Node) -> BoundingBox3 {
        if let Some(bounds) = node.bounding_box.get() {
            return bounds;
        }

        // Post-order: children first, then fold them into the parent
        let mut stack = vec![(id, false)];
        while let Some((current, children_done)) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.bounding_box.get().is_some() {
                continue;
            }
            if children_done {
                let mut bounds = node.intrinsic_bounding_box();
                for child in node.children.iter().filter_map(|&c| self.nodes.get(c)) {
                    if let Some(child_bounds) = child.bounding_box.get() {
                        bounds += child.local_transform * child_bounds;
                    }
                }
                node.bounding_box.set(Some(bounds));
            } else {
                stack.push((current, true));
                stack.extend(node.children.iter().map(|&child| (child, false)));
            }
        }

        node.bounding_box.get().unwrap_or_else(BoundingBox3::empty)
    }
}
