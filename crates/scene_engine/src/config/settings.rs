//! Scene settings: default camera projection and clip-fitting limits.

use serde::{Deserialize, Serialize};

use super::Config;
use crate::geometry::Range;

/// Default perspective camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Width / height of the viewport
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Limits applied when clip planes are fitted to visible content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingSettings {
    /// Smallest near clip distance a fitted camera may use
    pub min_near: f32,
    /// Largest far clip distance a fitted camera may use
    pub max_far: f32,
    /// Slack added on both ends of a fitted range
    pub near_far_padding: f32,
}

impl Default for CullingSettings {
    fn default() -> Self {
        Self {
            min_near: 0.05,
            max_far: 5000.0,
            near_far_padding: 0.5,
        }
    }
}

impl CullingSettings {
    /// Allowed `[min_near, max_far]` span
    pub fn limits(&self) -> Range {
        Range::new(self.min_near, self.max_far)
    }
}

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Camera defaults
    pub camera: CameraSettings,
    /// Clip fitting limits
    pub culling: CullingSettings,
}

impl Config for SceneSettings {}
