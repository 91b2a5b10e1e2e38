//! Scene nodes and the closed set of node variants.

use std::cell::Cell;

use crate::foundation::math::Transform;
use crate::geometry::BoundingBox3;
use crate::scene::kinds::{
    BoneNode, CameraNode, DrawableNode, LightNode, ListenerNode, SceneRootNode,
    SkeletalAnimatedNode, SoundNode,
};
use crate::scene::NodeId;

/// Variant payload of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeKind {
    /// The single root of a [`crate::scene::SceneGraph`]
    SceneRoot(SceneRootNode),
    /// Plain transform node grouping its children
    #[default]
    Group,
    /// Camera
    Camera(CameraNode),
    /// Renderable geometry
    Drawable(DrawableNode),
    /// Light source
    Light(LightNode),
    /// Sound emitter
    Sound(SoundNode),
    /// Audio listener
    Listener(ListenerNode),
    /// Skeleton joint
    Bone(BoneNode),
    /// Animated skeleton root
    SkeletalAnimated(SkeletalAnimatedNode),
}

impl NodeKind {
    /// Human-readable variant name, used in logs and errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SceneRoot(_) => "SceneRoot",
            Self::Group => "Group",
            Self::Camera(_) => "Camera",
            Self::Drawable(_) => "Drawable",
            Self::Light(_) => "Light",
            Self::Sound(_) => "Sound",
            Self::Listener(_) => "Listener",
            Self::Bone(_) => "Bone",
            Self::SkeletalAnimated(_) => "SkeletalAnimated",
        }
    }

    /// Bounds of the node itself in local space, ignoring children
    pub fn local_bounding_box(&self) -> BoundingBox3 {
        match self {
            Self::Drawable(drawable) => drawable.bounding_box,
            Self::Light(light) => light.bounding_box(),
            _ => BoundingBox3::empty(),
        }
    }

    /// Camera payload, if this is a camera
    pub fn as_camera(&self) -> Option<&CameraNode> {
        CameraNode::from_kind(self)
    }

    /// Mutable camera payload
    pub fn as_camera_mut(&mut self) -> Option<&mut CameraNode> {
        CameraNode::from_kind_mut(self)
    }

    /// Drawable payload, if this is a drawable
    pub fn as_drawable(&self) -> Option<&DrawableNode> {
        DrawableNode::from_kind(self)
    }

    /// Mutable drawable payload
    pub fn as_drawable_mut(&mut self) -> Option<&mut DrawableNode> {
        DrawableNode::from_kind_mut(self)
    }

    /// Light payload, if this is a light
    pub fn as_light(&self) -> Option<&LightNode> {
        LightNode::from_kind(self)
    }

    /// Mutable light payload
    pub fn as_light_mut(&mut self) -> Option<&mut LightNode> {
        LightNode::from_kind_mut(self)
    }

    /// Sound payload, if this is a sound emitter
    pub fn as_sound(&self) -> Option<&SoundNode> {
        SoundNode::from_kind(self)
    }

    /// Listener payload, if this is a listener
    pub fn as_listener(&self) -> Option<&ListenerNode> {
        ListenerNode::from_kind(self)
    }

    /// Bone payload, if this is a bone
    pub fn as_bone(&self) -> Option<&BoneNode> {
        BoneNode::from_kind(self)
    }

    /// Skeleton payload, if this is an animated skeleton root
    pub fn as_skeletal_animated(&self) -> Option<&SkeletalAnimatedNode> {
        SkeletalAnimatedNode::from_kind(self)
    }

    /// Mutable skeleton payload
    pub fn as_skeletal_animated_mut(&mut self) -> Option<&mut SkeletalAnimatedNode> {
        SkeletalAnimatedNode::from_kind_mut(self)
    }

    /// Whether this is the scene root
    pub fn is_scene_root(&self) -> bool {
        matches!(self, Self::SceneRoot(_))
    }
}

/// Type that can be viewed out of a [`NodeKind`].
///
/// Implemented by every payload type and by `NodeKind` itself, which matches
/// any node. Collectors and typed lookups are generic over it.
pub trait NodeVariant: 'static {
    /// Name used in errors and logs
    const NAME: &'static str;

    /// Borrow the payload if `kind` is this variant
    fn from_kind(kind: &NodeKind) -> Option<&Self>;

    /// Mutably borrow the payload if `kind` is this variant
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
}

impl NodeVariant for NodeKind {
    const NAME: &'static str = "Node";

    fn from_kind(kind: &NodeKind) -> Option<&Self> {
        Some(kind)
    }

    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
        Some(kind)
    }
}

macro_rules! node_variant {
    ($payload:ty, $variant:ident) => {
        impl NodeVariant for $payload {
            const NAME: &'static str = stringify!($variant);

            fn from_kind(kind: &NodeKind) -> Option<&Self> {
                match kind {
                    NodeKind::$variant(payload) => Some(payload),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                match kind {
                    NodeKind::$variant(payload) => Some(payload),
                    _ => None,
                }
            }
        }

        impl From<$payload> for NodeKind {
            fn from(payload: $payload) -> Self {
                NodeKind::$variant(payload)
            }
        }
    };
}

node_variant!(SceneRootNode, SceneRoot);
node_variant!(CameraNode, Camera);
node_variant!(DrawableNode, Drawable);
node_variant!(LightNode, Light);
node_variant!(SoundNode, Sound);
node_variant!(ListenerNode, Listener);
node_variant!(BoneNode, Bone);
node_variant!(SkeletalAnimatedNode, SkeletalAnimated);

/// A node stored in a [`crate::scene::SceneGraph`].
///
/// Structure (parent, children) is edited through the graph so that the
/// cached global transform and aggregated bounds stay consistent.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) local_transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Root-space transform, `None` when stale
    pub(crate) global_transform: Cell<Option<Transform>>,
    /// Intrinsic box united with the children's boxes, `None` when stale
    pub(crate) bounding_box: Cell<Option<BoundingBox3>>,
}

impl Node {
    pub(crate) fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            local_transform: Transform::identity(),
            parent: None,
            children: Vec::new(),
            global_transform: Cell::new(None),
            bounding_box: Cell::new(None),
        }
    }

    /// Node name, not necessarily unique
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant payload
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    /// Parent node, `None` for the root and detached nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Bounds of this node alone in local space
    pub fn intrinsic_bounding_box(&self) -> BoundingBox3 {
        self.kind.local_bounding_box()
    }

    /// Camera payload
    pub fn as_camera(&self) -> Option<&CameraNode> {
        self.kind.as_camera()
    }

    /// Drawable payload
    pub fn as_drawable(&self) -> Option<&DrawableNode> {
        self.kind.as_drawable()
    }

    /// Light payload
    pub fn as_light(&self) -> Option<&LightNode> {
        self.kind.as_light()
    }

    /// Sound payload
    pub fn as_sound(&self) -> Option<&SoundNode> {
        self.kind.as_sound()
    }

    /// Listener payload
    pub fn as_listener(&self) -> Option<&ListenerNode> {
        self.kind.as_listener()
    }

    /// Bone payload
    pub fn as_bone(&self) -> Option<&BoneNode> {
        self.kind.as_bone()
    }

    /// Skeleton payload
    pub fn as_skeletal_animated(&self) -> Option<&SkeletalAnimatedNode> {
        self.kind.as_skeletal_animated()
    }

    /// Payload viewed as `T`
    pub fn variant<T: NodeVariant>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }
}
