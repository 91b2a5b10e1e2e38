//! Visitor whose decision is delegated to a swappable [`Condition`].

use crate::scene::NodeRef;
use crate::visitor::{Condition, NodeVisitor};

/// Visitor that passes a node when its condition does, or always when it has
/// no condition.
///
/// The condition type defaults to a boxed trait object so conditions of
/// different types can be swapped at runtime; a concrete `C` avoids the box.
pub struct ConditionalNodeVisitor<C = Box<dyn Condition>> {
    condition: Option<C>,
}

impl<C> Default for ConditionalNodeVisitor<C> {
    fn default() -> Self {
        Self { condition: None }
    }
}

impl<C> ConditionalNodeVisitor<C> {
    /// Visitor driven by `condition`
    pub fn new(condition: C) -> Self {
        Self {
            condition: Some(condition),
        }
    }

    /// Visitor without a condition; visits everything
    pub fn unconditional() -> Self {
        Self::default()
    }

    /// Replace the condition, returning the previous one
    pub fn set_condition(&mut self, condition: C) -> Option<C> {
        self.condition.replace(condition)
    }

    /// Current condition
    pub fn condition(&self) -> Option<&C> {
        self.condition.as_ref()
    }

    /// Current condition, mutably
    pub fn condition_mut(&mut self) -> Option<&mut C> {
        self.condition.as_mut()
    }

    /// Remove the condition so every node passes
    pub fn take_condition(&mut self) -> Option<C> {
        self.condition.take()
    }
}

impl<C: Condition> NodeVisitor for ConditionalNodeVisitor<C> {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        self.condition
            .as_mut()
            .map_or(true, |condition| condition.check(node))
    }
}

impl<C> std::fmt::Debug for ConditionalNodeVisitor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionalNodeVisitor")
            .field("has_condition", &self.condition.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{NodeId, NodeKind, SceneGraph};
    use crate::visitor::condition_fn;

    /// root -> a -> b, root -> c
    fn small_tree() -> (SceneGraph, [NodeId; 3]) {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), "a", NodeKind::Group).expect("root");
        let b = graph.add_child(a, "b", NodeKind::Group).expect("a");
        let c = graph.add_child(graph.root(), "c", NodeKind::Group).expect("root");
        (graph, [a, b, c])
    }

    struct Recorder<C> {
        inner: ConditionalNodeVisitor<C>,
        visited: Vec<String>,
    }

    impl<C: Condition> NodeVisitor for Recorder<C> {
        fn visit(&mut self, node: &NodeRef<'_>) -> bool {
            self.visited.push(node.name().to_string());
            self.inner.visit(node)
        }
    }

    #[test]
    fn test_rejected_node_prunes_subtree() {
        let (graph, _) = small_tree();
        let mut recorder = Recorder {
            inner: ConditionalNodeVisitor::new(condition_fn(|n: &NodeRef<'_>| n.name() != "a")),
            visited: Vec::new(),
        };
        graph.accept_down(graph.root(), &mut recorder).expect("root");

        assert_eq!(recorder.visited, ["root", "a", "c"]);
        assert!(!recorder.visited.iter().any(|name| name == "b"));
    }

    #[test]
    fn test_without_condition_visits_everything() {
        let (graph, [a, ..]) = small_tree();
        let mut recorder = Recorder {
            inner: ConditionalNodeVisitor::<Box<dyn Condition>>::unconditional(),
            visited: Vec::new(),
        };
        graph.accept_down(graph.root(), &mut recorder).expect("root");
        assert_eq!(recorder.visited, ["root", "a", "b", "c"]);

        let mut visitor = ConditionalNodeVisitor::<Box<dyn Condition>>::default();
        assert!(graph.accept(a, &mut visitor).expect("a"));
    }

    #[test]
    fn test_condition_is_swappable() {
        let (graph, [a, ..]) = small_tree();
        let mut visitor = ConditionalNodeVisitor::<Box<dyn Condition>>::new(Box::new(
            condition_fn(|_: &NodeRef<'_>| false),
        ));
        assert!(!graph.accept(a, &mut visitor).expect("a"));

        let previous = visitor.set_condition(Box::new(condition_fn(|_: &NodeRef<'_>| true)));
        assert!(previous.is_some());
        assert!(graph.accept(a, &mut visitor).expect("a"));

        assert!(visitor.take_condition().is_some());
        assert!(visitor.condition().is_none());
        assert!(graph.accept(a, &mut visitor).expect("a"));
    }
}
