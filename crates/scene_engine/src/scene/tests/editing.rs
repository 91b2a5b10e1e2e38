use approx::assert_relative_eq;

use crate::foundation::logging;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::geometry::BoundingBox3;
use crate::scene::{
    CameraNode, ClipSpace, DrawableNode, MeshHandle, NodeId, NodeKind, RenderContext, SceneError,
    SceneGraph,
};
use crate::sorting::UNSORTED;
use crate::visitor::{NodeCollector, NodeVisitor};

fn cube(half: f32) -> DrawableNode {
    DrawableNode::new(BoundingBox3::from_center_half_extent(Vec3::zeros(), Vec3::repeat(half)))
}

fn translated(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_translation(Vec3::new(x, y, z))
}

#[test]
fn test_attach_detach_and_reparent() {
    logging::init_for_tests();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.add_child(root, "a", NodeKind::Group).expect("root");
    let b = graph.add_child(root, "b", NodeKind::Group).expect("root");
    let c = graph.add_child(a, "c", NodeKind::Group).expect("a");

    assert_eq!(graph.children(root).expect("root"), [a, b]);
    assert_eq!(graph.parent(c).expect("c"), Some(a));

    graph.attach(b, c).expect("valid move");
    assert!(graph.children(a).expect("a").is_empty());
    assert_eq!(graph.children(b).expect("b"), [c]);
    assert_eq!(graph.parent(c).expect("c"), Some(b));

    graph.detach(b).expect("not the root");
    assert_eq!(graph.children(root).expect("root"), [a]);
    assert_eq!(graph.parent(b).expect("b"), None);
    // Detached subtrees stay in the graph but are unreachable from the root
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.find_by_name("c"), None);

    graph.attach(a, b).expect("valid move");
    assert_eq!(graph.find_by_name("c"), Some(c));
}

#[test]
fn test_rejected_edits() {
    logging::init_for_tests();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.add_child(root, "a", NodeKind::Group).expect("root");
    let b = graph.add_child(a, "b", NodeKind::Group).expect("a");

    assert_eq!(
        graph.attach(b, a),
        Err(SceneError::CycleDetected { parent: b, child: a })
    );
    assert_eq!(
        graph.attach(a, a),
        Err(SceneError::CycleDetected { parent: a, child: a })
    );
    assert_eq!(graph.attach(a, root), Err(SceneError::RootImmutable));
    assert_eq!(graph.detach(root), Err(SceneError::RootImmutable));
    assert_eq!(graph.remove(root), Err(SceneError::RootImmutable));

    // The tree is unchanged by rejected edits
    assert_eq!(graph.parent(b).expect("b"), Some(a));
    assert_eq!(graph.children(root).expect("root"), [a]);
}

#[test]
fn test_remove_subtree() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.add_child(root, "a", NodeKind::Group).expect("root");
    let b = graph.add_child(a, "b", NodeKind::Group).expect("a");
    graph.add_child(b, "c", NodeKind::Group).expect("b");
    let d = graph.add_child(root, "d", NodeKind::Group).expect("root");

    assert_eq!(graph.remove(a).expect("a"), 3);
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.children(root).expect("root"), [d]);
    assert!(graph.get(b).is_none());
    assert_eq!(graph.remove(a), Err(SceneError::NodeNotFound(a)));
    assert!(matches!(graph.attach(root, b), Err(SceneError::NodeNotFound(_))));
}

#[test]
fn test_typed_lookup() {
    let mut graph = SceneGraph::new();
    let camera = graph
        .add_child(graph.root(), "camera", CameraNode::new(ClipSpace::perspective(1.0, 1.0, 0.1, 10.0)))
        .expect("root");

    assert!(graph.get_as::<CameraNode>(camera).is_ok());
    assert_eq!(
        graph.get_as::<DrawableNode>(camera).map(|_| ()),
        Err(SceneError::UnexpectedKind {
            id: camera,
            expected: "Drawable",
            found: "Camera",
        })
    );

    graph.get_as_mut::<CameraNode>(camera).expect("camera").sort_index = 3;
    assert_eq!(graph.get_as::<CameraNode>(camera).expect("camera").sort_index, 3);
}

#[test]
fn test_global_transform_follows_edits() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.add_child(root, "a", NodeKind::Group).expect("root");
    let b = graph.add_child(a, "b", NodeKind::Group).expect("a");
    let c = graph.add_child(b, "c", NodeKind::Group).expect("b");
    graph.set_local_transform(a, translated(1.0, 0.0, 0.0)).expect("a");
    graph.set_local_transform(b, Transform::from_scale(Vec3::repeat(2.0))).expect("b");
    graph.set_local_transform(c, translated(0.0, 1.0, 0.0)).expect("c");

    let global = graph.global_transform(c).expect("c");
    assert_relative_eq!(global.translation, Vec3::new(1.0, 2.0, 0.0), epsilon = 1.0e-6);
    assert_relative_eq!(global.scale, Vec3::repeat(2.0), epsilon = 1.0e-6);

    // Editing an ancestor invalidates the cached descendant
    graph.set_local_transform(a, translated(0.0, 0.0, -5.0)).expect("a");
    let global = graph.global_transform(c).expect("c");
    assert_relative_eq!(global.translation, Vec3::new(0.0, 2.0, -5.0), epsilon = 1.0e-6);

    // Moving to a different parent does too
    graph.attach(root, c).expect("valid move");
    let global = graph.global_transform(c).expect("c");
    assert_relative_eq!(global.translation, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-6);
    assert_relative_eq!(global.scale, Vec3::repeat(1.0), epsilon = 1.0e-6);
}

#[test]
fn test_aggregated_bounds_follow_edits() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let group = graph.add_child(root, "group", NodeKind::Group).expect("root");
    let mesh = graph.add_child(group, "mesh", cube(1.0)).expect("group");
    graph.set_local_transform(mesh, translated(4.0, 0.0, 0.0)).expect("mesh");

    let bounds = graph.bounding_box(group).expect("group");
    assert_relative_eq!(*bounds.min(), Vec3::new(3.0, -1.0, -1.0));
    assert_relative_eq!(*bounds.max(), Vec3::new(5.0, 1.0, 1.0));
    assert_eq!(graph.bounding_box(mesh).expect("mesh"), graph.local_bounding_box(mesh).expect("mesh"));

    // Growing the drawable reaches every ancestor
    graph.get_as_mut::<DrawableNode>(mesh).expect("mesh").bounding_box =
        BoundingBox3::from_center_half_extent(Vec3::zeros(), Vec3::repeat(2.0));
    let bounds = graph.bounding_box(root).expect("root");
    assert_relative_eq!(*bounds.max(), Vec3::new(6.0, 2.0, 2.0));

    // Rotating the group moves the box in the root's space only
    graph
        .set_local_transform(group, Transform::from_rotation(Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2)))
        .expect("group");
    let root_bounds = graph.bounding_box(root).expect("root");
    assert_relative_eq!(root_bounds.center(), Vec3::new(0.0, 4.0, 0.0), epsilon = 1.0e-5);
    assert_relative_eq!(graph.bounding_box(group).expect("group").center(), Vec3::new(4.0, 0.0, 0.0));

    let world = graph.world_bounding_box(mesh).expect("mesh");
    assert_relative_eq!(world.center(), Vec3::new(0.0, 4.0, 0.0), epsilon = 1.0e-5);

    graph.remove(mesh).expect("mesh");
    assert!(graph.bounding_box(root).expect("root").is_empty());
}

#[test]
fn test_deep_tree_does_not_exhaust_the_stack() {
    let mut graph = SceneGraph::new();
    let mut parent = graph.root();
    for i in 0..20_000 {
        parent = graph.add_child(parent, format!("n{i}"), NodeKind::Group).expect("parent");
        graph.set_local_transform(parent, translated(0.0, 0.0, -1.0)).expect("node");
    }
    graph.kind_mut(parent).map(|kind| *kind = cube(1.0).into()).expect("leaf");

    let leaf_global = graph.global_transform(parent).expect("leaf");
    assert_relative_eq!(leaf_global.translation.z, -20_000.0);
    assert!(!graph.bounding_box(graph.root()).expect("root").is_empty());

    struct Count(usize);
    impl NodeVisitor for Count {
        fn visit(&mut self, _node: &crate::scene::NodeRef<'_>) -> bool {
            self.0 += 1;
            true
        }
    }
    let mut count = Count(0);
    graph.accept_down(graph.root(), &mut count).expect("root");
    assert_eq!(count.0, 20_001);
}

#[test]
fn test_sorted_cameras() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let clip = ClipSpace::perspective(1.0, 1.0, 0.1, 10.0);
    let mut add = |name: &str, sort_index: u32, active: bool| -> NodeId {
        let mut camera = CameraNode::new(clip).with_sort_index(sort_index);
        camera.active = active;
        graph.add_child(root, name, camera).expect("root")
    };
    let shadow = add("shadow", 3, true);
    let first_free = add("first_free", UNSORTED, true);
    let main = add("main", 1, true);
    let inactive = add("inactive", 0, false);
    let second_free = add("second_free", UNSORTED, true);
    let overlay = add("overlay", 0, true);

    let order: Vec<_> = graph.sorted_cameras().iter().map(|h| h.key()).collect();
    assert_eq!(order, [overlay, main, shadow, first_free, second_free]);
    assert!(!order.contains(&inactive));
}

#[test]
fn test_find_by_name_and_collector() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.add_child(root, "shared", NodeKind::Group).expect("root");
    let b = graph.add_child(a, "shared", NodeKind::Group).expect("a");
    graph.set_name(b, "renamed").expect("b");

    assert_eq!(graph.find_by_name("shared"), Some(a));
    assert_eq!(graph.find_by_name("renamed"), Some(b));
    assert_eq!(graph.find_by_name("missing"), None);

    let named = graph.traverse(root, NodeCollector::<NodeKind>::with_name("renamed")).expect("root");
    assert_eq!(named, [b]);
}

struct MeshTable;

impl RenderContext for MeshTable {
    fn mesh_bounds(&self, mesh: MeshHandle) -> Option<BoundingBox3> {
        (mesh.0 == 7).then(|| BoundingBox3::new(Vec3::repeat(-3.0), Vec3::repeat(3.0)))
    }
}

#[test]
fn test_refresh_drawable_bounds() {
    logging::init_for_tests();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let known = graph.add_child(root, "known", DrawableNode::with_mesh(MeshHandle(7))).expect("root");
    let unknown = graph.add_child(root, "unknown", DrawableNode::with_mesh(MeshHandle(8))).expect("root");
    let group = graph.add_child(root, "group", NodeKind::Group).expect("root");
    assert!(graph.bounding_box(root).expect("root").is_empty());

    // Without a context nothing changes
    assert_eq!(graph.refresh_drawable_bounds(known, None), Ok(false));
    assert!(graph.local_bounding_box(known).expect("known").is_empty());

    assert_eq!(graph.refresh_drawable_bounds(known, Some(&MeshTable)), Ok(true));
    assert_eq!(graph.refresh_drawable_bounds(known, Some(&MeshTable)), Ok(false));
    assert_eq!(graph.refresh_drawable_bounds(unknown, Some(&MeshTable)), Ok(false));
    assert!(matches!(
        graph.refresh_drawable_bounds(group, Some(&MeshTable)),
        Err(SceneError::UnexpectedKind { .. })
    ));

    let bounds = graph.bounding_box(root).expect("root");
    assert_relative_eq!(*bounds.max(), Vec3::repeat(3.0));
}
