//! Node visitors run over a [`crate::scene::SceneGraph`].
//!
//! A visitor is called once per node in pre-order and decides whether the
//! traversal descends into the node's children. Predicate logic lives in
//! [`Condition`]s, which [`ConditionalNodeVisitor`] plugs in; the culling,
//! near/far and collector visitors build on that.

mod collector;
mod conditional;
mod frustum_culling;
mod node_visitor;
mod z_near_far;

pub use collector::{CollectorVisitor, NodeCollector};
pub use conditional::ConditionalNodeVisitor;
pub use frustum_culling::{
    CullingResult, DrawableCullingResult, DrawableNodeVisitor, FrustumCullingCondition,
    FrustumCullingNodeVisitor, FrustumCullingVisitor,
};
pub use node_visitor::{condition_fn, Condition, ConditionFn, NodeVisitor, VisitorOutput};
pub use z_near_far::{ZNearFarNodeVisitor, ZNearFarResult};
