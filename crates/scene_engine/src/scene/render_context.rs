//! Renderer-side services the scene queries.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox3;

/// Handle of a mesh owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// Access to renderer resources needed by scene updates.
///
/// Passed explicitly to the operations that need it; the scene holds no
/// reference to a renderer.
pub trait RenderContext {
    /// Local-space bounds of a loaded mesh, `None` if the mesh is unknown
    fn mesh_bounds(&self, mesh: MeshHandle) -> Option<BoundingBox3>;
}
