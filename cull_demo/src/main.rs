//! Culling demo application
//!
//! Builds a grid of drawables with a few lights, places two cameras and runs
//! every visitor once per camera, logging what each one found.
//!
//! Usage: `cull_demo [settings.toml|settings.ron]`

use rand::prelude::*;
use scene_engine::foundation::logging;
use scene_engine::foundation::math::utils;
use scene_engine::prelude::*;
use scene_engine::scene::{DrawableFlags, LightKind, SoundNode};
use thiserror::Error;

/// Grid cells along each horizontal axis
const GRID_SIZE: i32 = 12;

/// Distance between grid cells
const GRID_SPACING: f32 = 6.0;

#[derive(Debug, Error)]
enum DemoError {
    #[error("Failed to load settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

fn load_settings() -> Result<SceneSettings, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading settings from {path}");
            Ok(SceneSettings::load_from_file(&path)?)
        }
        None => {
            log::info!("No settings file given, using defaults");
            Ok(SceneSettings::default())
        }
    }
}

/// Grid of randomly sized boxes, each row under its own group node
fn build_scene(settings: &SceneSettings, rng: &mut StdRng) -> Result<(SceneGraph, Vec<NodeId>), DemoError> {
    let mut scene = SceneGraph::new();
    let root = scene.root();

    for row in 0..GRID_SIZE {
        let group = scene.add_child(root, format!("row{row}"), NodeKind::Group)?;
        let z = -(row as f32) * GRID_SPACING;
        scene.set_local_transform(group, Transform::from_translation(Vec3::new(0.0, 0.0, z)))?;

        for column in 0..GRID_SIZE {
            let half = Vec3::new(
                rng.gen_range(0.3..1.5),
                rng.gen_range(0.3..2.5),
                rng.gen_range(0.3..1.5),
            );
            let mut drawable = DrawableNode::new(BoundingBox3::from_center_half_extent(Vec3::zeros(), half));
            if rng.gen_bool(0.2) {
                drawable.flags |= DrawableFlags::TRANSPARENT;
            }

            let x = (column - GRID_SIZE / 2) as f32 * GRID_SPACING;
            let yaw = Quat::from_axis_angle(&Vec3::y_axis(), rng.gen_range(0.0..std::f32::consts::TAU));
            let mesh = scene.add_child(group, format!("box_{row}_{column}"), drawable)?;
            scene.set_local_transform(mesh, Transform::new(yaw, Vec3::repeat(1.0), Vec3::new(x, 0.0, 0.0)))?;
        }
    }

    let lamp = scene.add_child(root, "lamp", LightNode::new(LightKind::Point { radius: 8.0 }))?;
    scene.set_local_transform(lamp, Transform::from_translation(Vec3::new(0.0, 6.0, -20.0)))?;
    scene.add_child(root, "sun", LightNode::new(LightKind::Directional))?;
    scene.add_child(lamp, "hum", SoundNode::new("lamp_hum"))?;

    let mut cameras = Vec::new();
    let main = scene.add_child(root, "main_camera", CameraNode::from_settings(&settings.camera).with_sort_index(0))?;
    let eye = Transform::look_at(Vec3::new(0.0, 4.0, 10.0), Vec3::new(0.0, 0.0, -30.0), Vec3::y())
        .unwrap_or_default();
    scene.set_local_transform(main, eye)?;
    cameras.push(main);

    let side = scene.add_child(root, "side_camera", CameraNode::from_settings(&settings.camera).with_sort_index(1))?;
    let eye = Transform::look_at(Vec3::new(60.0, 10.0, -30.0), Vec3::new(0.0, 0.0, -30.0), Vec3::y())
        .unwrap_or_default();
    scene.set_local_transform(side, eye)?;
    cameras.push(side);

    Ok((scene, cameras))
}

fn run_camera(scene: &mut SceneGraph, camera: NodeId, settings: &SceneSettings) -> Result<(), DemoError> {
    let name = scene.node_ref(camera)?.name().to_string();
    let root = scene.root();

    let frustum = scene.camera_frustum(camera)?;
    let culled = scene.traverse(root, FrustumCullingNodeVisitor::new(frustum))?;
    let drawables = scene.traverse(root, DrawableNodeVisitor::new(frustum))?;
    let transparent = drawables
        .drawable_nodes
        .iter()
        .filter_map(|&handle| scene.get_typed(handle))
        .filter(|drawable| drawable.is_transparent())
        .count();
    log::info!(
        "[{name}] {} node(s) pass culling, {} drawable(s) visible ({transparent} transparent)",
        culled.nodes.len(),
        drawables.drawable_nodes.len(),
    );

    let open = scene.camera_open_frustum(camera)?;
    let extent = scene.traverse(root, ZNearFarNodeVisitor::new(open))?;
    if extent.z_near_far.is_empty() {
        log::warn!("[{name}] nothing in front of the camera, keeping clip planes");
        return Ok(());
    }

    let camera_node = scene.get_as_mut::<CameraNode>(camera)?;
    if let ClipSpace::Perspective { fov_y, .. } = camera_node.clip_space {
        log::debug!("[{name}] vertical fov {:.1} degrees", utils::rad_to_deg(fov_y));
    }
    let before = camera_node.clip_space.clip_range();
    if camera_node.fit_clip_range(extent.z_near_far, &settings.culling) {
        let after = camera_node.clip_space.clip_range();
        log::info!(
            "[{name}] clip range [{:.2}, {:.2}] fitted to [{:.2}, {:.2}] from {} drawable(s)",
            before.near,
            before.far,
            after.near,
            after.far,
            extent.drawable_nodes.len(),
        );
    }
    Ok(())
}

fn run() -> Result<(), DemoError> {
    let settings = load_settings()?;
    let mut rng = StdRng::seed_from_u64(7);
    let (mut scene, cameras) = build_scene(&settings, &mut rng)?;
    log::info!("Scene built with {} nodes and {} cameras", scene.len(), cameras.len());

    let lights = scene.traverse(scene.root(), CollectorVisitor::<LightNode>::new())?;
    let rows = scene.traverse(scene.root(), NodeCollector::<NodeKind>::with_name("row0"))?;
    log::info!("{} light(s), {} node(s) named row0", lights.len(), rows.len());

    for handle in scene.sorted_cameras() {
        run_camera(&mut scene, handle.key(), &settings)?;
    }
    Ok(())
}

fn main() {
    logging::init();
    log::info!("Starting culling demo");

    if let Err(e) = run() {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
    log::info!("Culling demo finished");
}
