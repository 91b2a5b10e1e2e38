//! Payloads of the node variants.
//!
//! Each variant is plain data; the tree structure and transforms live in
//! [`crate::scene::Node`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::{CameraSettings, CullingSettings};
use crate::foundation::math::{utils, Mat4, Transform, Vec3};
use crate::geometry::{BoundingBox3, Frustum, OpenFrustum, Range};
use crate::scene::MeshHandle;
use crate::sorting::{SortedObject, UNSORTED};

/// Marker payload of the scene root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneRootNode;

/// Camera projection in eye space (looking down -Z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClipSpace {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        /// Width / height
        aspect: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
    /// Orthographic projection centered on the view axis
    Orthographic {
        /// Half of the view volume width
        half_width: f32,
        /// Half of the view volume height
        half_height: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
}

impl ClipSpace {
    /// Perspective projection from a vertical field of view in radians
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Perspective { fov_y, aspect, near, far }
    }

    /// Orthographic projection
    pub fn orthographic(half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Self::Orthographic { half_width, half_height, near, far }
    }

    /// Perspective projection from camera settings
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::perspective(
            utils::deg_to_rad(settings.fov_y_degrees),
            settings.aspect,
            settings.near,
            settings.far,
        )
    }

    /// OpenGL-convention projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective { fov_y, aspect, near, far } => {
                Mat4::new_perspective(aspect, fov_y, near, far)
            }
            Self::Orthographic { half_width, half_height, near, far } => {
                Mat4::new_orthographic(-half_width, half_width, -half_height, half_height, near, far)
            }
        }
    }

    /// `[near, far]` clip distances
    pub fn clip_range(&self) -> Range {
        match *self {
            Self::Perspective { near, far, .. } | Self::Orthographic { near, far, .. } => {
                Range::new(near, far)
            }
        }
    }

    /// Same projection with different clip distances
    pub fn with_clip_range(mut self, range: Range) -> Self {
        match &mut self {
            Self::Perspective { near, far, .. } | Self::Orthographic { near, far, .. } => {
                *near = range.near;
                *far = range.far;
            }
        }
        self
    }

    /// Frustum in eye space
    pub fn frustum(&self) -> Frustum {
        Frustum::from_matrix(&self.projection_matrix())
    }

    /// Frustum in eye space without its far plane
    pub fn open_frustum(&self) -> OpenFrustum {
        self.frustum().open()
    }
}

/// Camera node payload
#[derive(Debug, Clone, PartialEq)]
pub struct CameraNode {
    /// Projection
    pub clip_space: ClipSpace,
    /// Render submission order, [`UNSORTED`] by default
    pub sort_index: u32,
    /// Inactive cameras are skipped when ordering cameras for a frame
    pub active: bool,
}

impl CameraNode {
    /// Active, unsorted camera
    pub fn new(clip_space: ClipSpace) -> Self {
        Self {
            clip_space,
            sort_index: UNSORTED,
            active: true,
        }
    }

    /// Camera using the configured default projection
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(ClipSpace::from_settings(settings))
    }

    /// Builder-style sort index
    pub fn with_sort_index(mut self, sort_index: u32) -> Self {
        self.sort_index = sort_index;
        self
    }

    /// Fit the clip planes to a content range measured from the current near
    /// plane (the range a near/far pass reports), padded and clamped to the
    /// configured limits.
    ///
    /// Returns `false` and leaves the projection untouched when the fitted
    /// range is empty or collapses under the limits.
    pub fn fit_clip_range(&mut self, content: Range, limits: &CullingSettings) -> bool {
        if content.is_empty() {
            return false;
        }
        let current_near = self.clip_space.clip_range().near;
        let eye_range = Range::new(content.near + current_near, content.far + current_near)
            .padded(limits.near_far_padding);
        let fitted = eye_range * limits.limits();
        if fitted.is_empty() || fitted.length() <= 0.0 {
            return false;
        }
        self.clip_space = self.clip_space.with_clip_range(fitted);
        true
    }
}

impl SortedObject for CameraNode {
    fn sort_index(&self) -> u32 {
        self.sort_index
    }
}

bitflags! {
    /// Per-drawable render state bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DrawableFlags: u32 {
        /// Submitted for rendering
        const VISIBLE = 1;
        /// Rendered into shadow maps
        const CAST_SHADOW = 1 << 1;
        /// Rendered in the transparent (OIT) pass
        const TRANSPARENT = 1 << 2;
    }
}

impl Default for DrawableFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::CAST_SHADOW
    }
}

/// Drawable node payload: geometry with a local-space bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableNode {
    /// Bounds in the node's local space
    pub bounding_box: BoundingBox3,
    /// Mesh resource the renderer draws, if any
    pub mesh: Option<MeshHandle>,
    /// Render state bits
    pub flags: DrawableFlags,
    /// Submission order, [`UNSORTED`] by default
    pub sort_index: u32,
}

impl DrawableNode {
    /// Drawable with explicit bounds and default flags
    pub fn new(bounding_box: BoundingBox3) -> Self {
        Self {
            bounding_box,
            mesh: None,
            flags: DrawableFlags::default(),
            sort_index: UNSORTED,
        }
    }

    /// Drawable whose bounds come from a mesh (empty until refreshed)
    pub fn with_mesh(mesh: MeshHandle) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::new(BoundingBox3::empty())
        }
    }

    /// Whether this drawable goes through the transparent pass
    pub fn is_transparent(&self) -> bool {
        self.flags.contains(DrawableFlags::TRANSPARENT)
    }
}

impl SortedObject for DrawableNode {
    fn sort_index(&self) -> u32 {
        self.sort_index
    }
}

/// Light source variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Omnidirectional light with a finite radius of influence
    Point {
        /// Influence radius
        radius: f32,
    },
    /// Cone light along the node's -Z axis
    Spot {
        /// Influence radius
        radius: f32,
        /// Full-intensity cone half angle in radians
        inner_angle: f32,
        /// Falloff cone half angle in radians
        outer_angle: f32,
    },
    /// Parallel light along the node's -Z axis
    Directional,
    /// Image-based environment lighting
    Ibl,
}

/// Light node payload
#[derive(Debug, Clone, PartialEq)]
pub struct LightNode {
    /// Variant and shape
    pub kind: LightKind,
    /// Linear RGB color
    pub color: Vec3,
    /// Intensity multiplier
    pub intensity: f32,
    /// Whether this light renders a shadow map
    pub cast_shadows: bool,
}

impl LightNode {
    /// White light of unit intensity
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            cast_shadows: false,
        }
    }

    /// Local-space bounds of the light's influence.
    ///
    /// Point and spot lights cover a cube of their radius; directional and
    /// IBL lights have no finite extent and report the empty box.
    pub fn bounding_box(&self) -> BoundingBox3 {
        match self.kind {
            LightKind::Point { radius } | LightKind::Spot { radius, .. } => {
                BoundingBox3::from_center_half_extent(Vec3::zeros(), Vec3::repeat(radius))
            }
            LightKind::Directional | LightKind::Ibl => BoundingBox3::empty(),
        }
    }
}

/// Sound emitter payload
#[derive(Debug, Clone, PartialEq)]
pub struct SoundNode {
    /// Name of the sound asset the audio engine plays
    pub sound: String,
    /// Linear gain
    pub gain: f32,
    /// Playback rate multiplier
    pub pitch: f32,
    /// Restart when finished
    pub looping: bool,
}

impl SoundNode {
    /// Emitter with unit gain and pitch
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            gain: 1.0,
            pitch: 1.0,
            looping: false,
        }
    }
}

/// Audio listener payload
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerNode {
    /// Master gain
    pub gain: f32,
}

impl Default for ListenerNode {
    fn default() -> Self {
        Self { gain: 1.0 }
    }
}

/// Skeleton joint payload
#[derive(Debug, Clone, PartialEq)]
pub struct BoneNode {
    /// Index of the joint in the skin's joint list
    pub bone_index: u32,
    /// Mesh space to bone space at bind time
    pub inverse_bind: Transform,
}

impl BoneNode {
    /// Bone with an identity bind pose
    pub fn new(bone_index: u32) -> Self {
        Self {
            bone_index,
            inverse_bind: Transform::identity(),
        }
    }
}

/// Root of an animated skeleton; drives the bone nodes below it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletalAnimatedNode {
    /// Animation clip currently playing
    pub animation: Option<String>,
    /// Playback position in seconds
    pub time: f32,
    /// Playback rate multiplier
    pub speed: f32,
}

impl SkeletalAnimatedNode {
    /// Start playing `animation` from the beginning at normal speed
    pub fn play(&mut self, animation: impl Into<String>) {
        self.animation = Some(animation.into());
        self.time = 0.0;
        self.speed = 1.0;
    }

    /// Advance playback by `delta_time` seconds; no-op when nothing plays
    pub fn advance(&mut self, delta_time: f32) {
        if self.animation.is_some() {
            self.time += delta_time * self.speed;
        }
    }
}
