//! The 3D scene collaborator: meshes, point clouds, lights, fog.

use std::sync::Arc;

use cairn_noise::Texture;
use glam::{Mat4, Quat, Vec3};

use crate::Color;

/// Opaque handle to a mesh owned by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Opaque handle to a point-cloud particle object owned by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointsHandle(pub u64);

/// Which scene light an intensity or color change targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    Ambient,
    Directional,
}

/// Translation, rotation, and per-axis scale of a scene object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Decompose an affine pose matrix.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Compose into a matrix.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Borrowed geometry handed to [`SceneGraph::add_mesh`].
#[derive(Clone, Copy, Debug)]
pub struct MeshData<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: &'a [[f32; 3]],
    pub indices: &'a [u32],
}

impl MeshData<'_> {
    /// Position buffer as raw bytes.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.positions)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices)
    }
}

/// Physically based surface description for a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    pub base_color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub normal_map: Option<Arc<Texture>>,
    pub normal_scale: f32,
}

/// A single live edit to a mesh's material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialProperty {
    BaseColor(Color),
    Roughness(f32),
    Metalness(f32),
}

/// Distance fog bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogParams {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// A point-cloud particle object.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
    pub sprite: Option<Arc<Texture>>,
}

/// The operations the core needs from a 3D scene graph.
///
/// Removing a mesh or point cloud also releases its geometry and material;
/// handles are dead after removal.
pub trait SceneGraph {
    fn add_mesh(&mut self, mesh: MeshData<'_>, material: &MaterialDesc) -> MeshHandle;
    fn remove_mesh(&mut self, handle: MeshHandle);
    fn set_transform(&mut self, handle: MeshHandle, transform: &Transform);
    fn set_visible(&mut self, handle: MeshHandle, visible: bool);
    fn set_material_property(&mut self, handle: MeshHandle, property: MaterialProperty);

    fn set_light_intensity(&mut self, light: LightKind, intensity: f32);
    fn set_light_color(&mut self, light: LightKind, color: Color);
    /// Sky (top) and ground (bottom) colors of the backdrop gradient.
    fn set_background(&mut self, sky: Color, ground: Color);
    /// `None` disables fog.
    fn set_fog(&mut self, fog: Option<FogParams>);

    fn add_points(&mut self, cloud: &PointCloud) -> PointsHandle;
    fn update_points(&mut self, handle: PointsHandle, positions: &[Vec3]);
    fn remove_points(&mut self, handle: PointsHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_matrix_roundtrip() {
        let t = Transform {
            translation: Vec3::new(1.0, -2.0, 0.5),
            rotation: Quat::from_rotation_y(0.7),
            scale: Vec3::splat(0.15),
        };
        let back = Transform::from_matrix(&t.to_matrix());
        assert!(back.translation.abs_diff_eq(t.translation, 1e-5));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-5));
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-5));
    }

    #[test]
    fn test_mesh_data_bytes() {
        let positions = [[0.0f32, 1.0, 2.0]];
        let normals = [[0.0f32, 1.0, 0.0]];
        let indices = [0u32, 0, 0];
        let data = MeshData {
            positions: &positions,
            normals: &normals,
            indices: &indices,
        };
        assert_eq!(data.position_bytes().len(), 12);
        assert_eq!(data.index_bytes().len(), 12);
    }
}
