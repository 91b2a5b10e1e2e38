//! Visitors gathering every node of a given variant.

use std::marker::PhantomData;

use crate::scene::{NodeId, NodeKind, NodeRef, NodeVariant, TypedNodeId};
use crate::visitor::{NodeVisitor, VisitorOutput};

/// Collects typed handles to every node whose payload is a `T`.
///
/// Never prunes.
pub struct CollectorVisitor<T: NodeVariant> {
    nodes: Vec<TypedNodeId<T>>,
}

impl<T: NodeVariant> CollectorVisitor<T> {
    /// Empty collector
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Collected handles in pre-order
    pub fn nodes(&self) -> &[TypedNodeId<T>] {
        &self.nodes
    }

    /// Forget collected handles
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<T: NodeVariant> Default for CollectorVisitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NodeVariant> NodeVisitor for CollectorVisitor<T> {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        if node.variant::<T>().is_some() {
            self.nodes.push(TypedNodeId::new(node.id()));
        }
        true
    }
}

impl<T: NodeVariant> VisitorOutput for CollectorVisitor<T> {
    type Output = Vec<TypedNodeId<T>>;

    fn into_output(self) -> Vec<TypedNodeId<T>> {
        self.nodes
    }
}

impl<T: NodeVariant> std::fmt::Debug for CollectorVisitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorVisitor")
            .field("variant", &T::NAME)
            .field("nodes", &self.nodes)
            .finish()
    }
}

/// Collects ids of nodes whose payload is a `T`, optionally only those with
/// a given name.
///
/// With the default `T = NodeKind` every node matches the variant test.
pub struct NodeCollector<T: NodeVariant = NodeKind> {
    name: Option<String>,
    nodes: Vec<NodeId>,
    _variant: PhantomData<fn() -> T>,
}

impl<T: NodeVariant> NodeCollector<T> {
    /// Collector matching on variant only
    pub fn new() -> Self {
        Self {
            name: None,
            nodes: Vec::new(),
            _variant: PhantomData,
        }
    }

    /// Collector matching on variant and exact name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Name filter, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Collected ids in pre-order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Forget collected ids
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<T: NodeVariant> Default for NodeCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NodeVariant> NodeVisitor for NodeCollector<T> {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        let name_matches = self.name.as_deref().map_or(true, |name| node.name() == name);
        if name_matches && node.variant::<T>().is_some() {
            self.nodes.push(node.id());
        }
        true
    }
}

impl<T: NodeVariant> VisitorOutput for NodeCollector<T> {
    type Output = Vec<NodeId>;

    fn into_output(self) -> Vec<NodeId> {
        self.nodes
    }
}

impl<T: NodeVariant> std::fmt::Debug for NodeCollector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCollector")
            .field("variant", &T::NAME)
            .field("name", &self.name)
            .field("nodes", &self.nodes)
            .finish()
    }
}
