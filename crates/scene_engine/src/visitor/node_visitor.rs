//! Visitor and predicate traits.

use crate::scene::NodeRef;

/// Callback run on each node of a traversal.
///
/// Returning `false` stops descent below the node; siblings are still
/// visited.
pub trait NodeVisitor {
    /// Visit `node` and decide whether to descend into its children
    fn visit(&mut self, node: &NodeRef<'_>) -> bool;
}

impl<V: NodeVisitor + ?Sized> NodeVisitor for &mut V {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        (**self).visit(node)
    }
}

impl<V: NodeVisitor + ?Sized> NodeVisitor for Box<V> {
    fn visit(&mut self, node: &NodeRef<'_>) -> bool {
        (**self).visit(node)
    }
}

/// Visitor that yields a typed result once a traversal is done
pub trait VisitorOutput: NodeVisitor {
    /// Result type
    type Output;

    /// Consume the visitor and hand back what it accumulated
    fn into_output(self) -> Self::Output;
}

/// Stateful pass/fail predicate over nodes.
///
/// Conditions may keep state between calls (the frustum-culling condition
/// keeps the frustum it last tested against).
pub trait Condition {
    /// Whether `node` passes
    fn check(&mut self, node: &NodeRef<'_>) -> bool;
}

impl<C: Condition + ?Sized> Condition for Box<C> {
    fn check(&mut self, node: &NodeRef<'_>) -> bool {
        (**self).check(node)
    }
}

/// Both conditions must pass; the second is skipped when the first fails
impl<A: Condition, B: Condition> Condition for (A, B) {
    fn check(&mut self, node: &NodeRef<'_>) -> bool {
        self.0.check(node) && self.1.check(node)
    }
}

/// Adapts a closure into a [`Condition`]
#[derive(Debug, Clone)]
pub struct ConditionFn<F>(pub F);

impl<F> Condition for ConditionFn<F>
where
    F: FnMut(&NodeRef<'_>) -> bool,
{
    fn check(&mut self, node: &NodeRef<'_>) -> bool {
        (self.0)(node)
    }
}

/// Build a [`Condition`] from a closure
pub fn condition_fn<F>(f: F) -> ConditionFn<F>
where
    F: FnMut(&NodeRef<'_>) -> bool,
{
    ConditionFn(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{NodeKind, SceneGraph};

    struct Counter(usize);

    impl NodeVisitor for Counter {
        fn visit(&mut self, _node: &NodeRef<'_>) -> bool {
            self.0 += 1;
            true
        }
    }

    struct Gate {
        visits: usize,
        pass: bool,
    }

    impl NodeVisitor for Gate {
        fn visit(&mut self, _node: &NodeRef<'_>) -> bool {
            self.visits += 1;
            self.pass
        }
    }

    #[test]
    fn test_forwarding_impls() {
        let graph = SceneGraph::new();
        let mut counter = Counter(0);

        let mut by_ref = &mut counter;
        graph.accept(graph.root(), &mut by_ref).expect("root exists");

        let mut boxed: Box<dyn NodeVisitor> = Box::new(Counter(0));
        assert!(graph.accept(graph.root(), &mut boxed).expect("root exists"));
        assert_eq!(counter.0, 1);
    }

    #[test]
    fn test_accept_descends_and_visit_node_does_not() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), "a", NodeKind::Group).expect("root exists");
        graph.add_child(a, "b", NodeKind::Group).expect("a exists");

        let mut counter = Counter(0);
        assert!(graph.accept(graph.root(), &mut counter).expect("root exists"));
        assert_eq!(counter.0, 3);

        let mut counter = Counter(0);
        assert!(graph.visit_node(graph.root(), &mut counter).expect("root exists"));
        assert_eq!(counter.0, 1);

        let mut gate = Gate { visits: 0, pass: false };
        assert!(!graph.accept(graph.root(), &mut gate).expect("root exists"));
        assert_eq!(gate.visits, 1);
    }

    #[test]
    fn test_conjunction_short_circuits() {
        let mut graph = SceneGraph::new();
        let child = graph.add_child(graph.root(), "child", NodeKind::Group).expect("root exists");
        let node = graph.node_ref(child).expect("child exists");

        let mut second_calls = 0;
        {
            let mut both = (
                condition_fn(|n: &NodeRef<'_>| n.name() == "other"),
                condition_fn(|_: &NodeRef<'_>| {
                    second_calls += 1;
                    true
                }),
            );
            assert!(!both.check(&node));
        }
        assert_eq!(second_calls, 0);

        let mut both = (
            condition_fn(|n: &NodeRef<'_>| n.name() == "child"),
            condition_fn(|n: &NodeRef<'_>| n.parent().is_some()),
        );
        assert!(both.check(&node));
    }
}
