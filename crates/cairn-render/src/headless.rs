//! Recording implementations of the collaborator traits.
//!
//! Used by the headless runner and by tests that need to count live objects,
//! inspect light levels, or check what the overlay painted.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::{
    Canvas2d, Color, FogParams, LightKind, MaterialDesc, MaterialProperty, MeshData, MeshHandle,
    PointCloud, PointsHandle, SceneGraph, Transform,
};

// ---------------------------------------------------------------------------
// RecordingScene
// ---------------------------------------------------------------------------

/// A mesh as held by [`RecordingScene`].
#[derive(Clone, Debug)]
pub struct RecordedMesh {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub material: MaterialDesc,
    pub transform: Transform,
    pub visible: bool,
}

/// A point cloud as held by [`RecordingScene`].
#[derive(Clone, Debug)]
pub struct RecordedPoints {
    pub cloud: PointCloud,
    pub updates: u64,
}

/// In-memory scene graph that tracks every object and setting.
#[derive(Debug, Default)]
pub struct RecordingScene {
    next_id: u64,
    meshes: HashMap<MeshHandle, RecordedMesh>,
    points: HashMap<PointsHandle, RecordedPoints>,
    lights: HashMap<LightKind, (f32, Color)>,
    background: Option<(Color, Color)>,
    fog: Option<FogParams>,
    meshes_added: u64,
    meshes_removed: u64,
    points_added: u64,
    points_removed: u64,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&RecordedMesh> {
        self.meshes.get(&handle)
    }

    pub fn live_mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn points(&self, handle: PointsHandle) -> Option<&RecordedPoints> {
        self.points.get(&handle)
    }

    pub fn live_points_count(&self) -> usize {
        self.points.len()
    }

    /// Intensity of `light`, or `None` if never set.
    pub fn light_intensity(&self, light: LightKind) -> Option<f32> {
        self.lights.get(&light).map(|(i, _)| *i)
    }

    pub fn light_color(&self, light: LightKind) -> Option<Color> {
        self.lights.get(&light).map(|(_, c)| *c)
    }

    pub fn background(&self) -> Option<(Color, Color)> {
        self.background
    }

    pub fn fog(&self) -> Option<FogParams> {
        self.fog
    }

    /// Total `(added, removed)` meshes over the scene's lifetime.
    pub fn mesh_churn(&self) -> (u64, u64) {
        (self.meshes_added, self.meshes_removed)
    }

    /// Total `(added, removed)` point clouds over the scene's lifetime.
    pub fn points_churn(&self) -> (u64, u64) {
        (self.points_added, self.points_removed)
    }
}

impl SceneGraph for RecordingScene {
    fn add_mesh(&mut self, mesh: MeshData<'_>, material: &MaterialDesc) -> MeshHandle {
        let handle = MeshHandle(self.next_id());
        self.meshes.insert(
            handle,
            RecordedMesh {
                vertex_count: mesh.positions.len(),
                triangle_count: mesh.indices.len() / 3,
                material: material.clone(),
                transform: Transform::default(),
                visible: true,
            },
        );
        self.meshes_added += 1;
        handle
    }

    fn remove_mesh(&mut self, handle: MeshHandle) {
        if self.meshes.remove(&handle).is_some() {
            self.meshes_removed += 1;
        }
    }

    fn set_transform(&mut self, handle: MeshHandle, transform: &Transform) {
        if let Some(mesh) = self.meshes.get_mut(&handle) {
            mesh.transform = *transform;
        }
    }

    fn set_visible(&mut self, handle: MeshHandle, visible: bool) {
        if let Some(mesh) = self.meshes.get_mut(&handle) {
            mesh.visible = visible;
        }
    }

    fn set_material_property(&mut self, handle: MeshHandle, property: MaterialProperty) {
        if let Some(mesh) = self.meshes.get_mut(&handle) {
            match property {
                MaterialProperty::BaseColor(c) => mesh.material.base_color = c,
                MaterialProperty::Roughness(r) => mesh.material.roughness = r,
                MaterialProperty::Metalness(m) => mesh.material.metalness = m,
            }
        }
    }

    fn set_light_intensity(&mut self, light: LightKind, intensity: f32) {
        self.lights.entry(light).or_insert((0.0, Color::WHITE)).0 = intensity;
    }

    fn set_light_color(&mut self, light: LightKind, color: Color) {
        self.lights.entry(light).or_insert((0.0, Color::WHITE)).1 = color;
    }

    fn set_background(&mut self, sky: Color, ground: Color) {
        self.background = Some((sky, ground));
    }

    fn set_fog(&mut self, fog: Option<FogParams>) {
        self.fog = fog;
    }

    fn add_points(&mut self, cloud: &PointCloud) -> PointsHandle {
        let handle = PointsHandle(self.next_id());
        self.points.insert(
            handle,
            RecordedPoints {
                cloud: cloud.clone(),
                updates: 0,
            },
        );
        self.points_added += 1;
        handle
    }

    fn update_points(&mut self, handle: PointsHandle, positions: &[Vec3]) {
        if let Some(points) = self.points.get_mut(&handle) {
            points.cloud.positions.clear();
            points.cloud.positions.extend_from_slice(positions);
            points.updates += 1;
        }
    }

    fn remove_points(&mut self, handle: PointsHandle) {
        if self.points.remove(&handle).is_some() {
            self.points_removed += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingCanvas
// ---------------------------------------------------------------------------

/// A single primitive painted on a [`RecordingCanvas`], with the global alpha
/// in effect when it was drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Line { from: Vec2, to: Vec2, color: Color, width: f32, alpha: f32 },
    Polyline { points: Vec<Vec2>, color: Color, width: f32, alpha: f32 },
    StrokeCircle { center: Vec2, radius: f32, color: Color, alpha: f32 },
    FillCircle { center: Vec2, radius: f32, color: Color, alpha: f32 },
    Ellipse { center: Vec2, radii: Vec2, color: Color, alpha: f32 },
    Rect { origin: Vec2, size: Vec2, color: Color, alpha: f32 },
    RadialGradient { center: Vec2, radius: f32, color: Color, alpha: f32 },
}

/// 2D surface that records draw operations since the last clear.
#[derive(Debug)]
pub struct RecordingCanvas {
    size: Vec2,
    alpha: f32,
    alpha_stack: Vec<f32>,
    ops: Vec<DrawOp>,
    clears: u64,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            alpha: 1.0,
            alpha_stack: Vec::new(),
            ops: Vec::new(),
            clears: 0,
        }
    }

    /// Change the surface size, as a window resize would.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Operations drawn since the last [`Canvas2d::clear`].
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    /// Depth of unmatched `save` calls.
    pub fn save_depth(&self) -> usize {
        self.alpha_stack.len()
    }
}

impl Canvas2d for RecordingCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn save(&mut self) {
        self.alpha_stack.push(self.alpha);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.alpha_stack.pop() {
            self.alpha = alpha;
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        let alpha = self.alpha;
        self.ops.push(DrawOp::Line { from, to, color, width, alpha });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Color, width: f32) {
        let alpha = self.alpha;
        self.ops.push(DrawOp::Polyline { points: points.to_vec(), color, width, alpha });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, _width: f32) {
        let alpha = self.alpha;
        self.ops.push(DrawOp::StrokeCircle { center, radius, color, alpha });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let alpha = self.alpha;
        self.ops.push(DrawOp::FillCircle { center, radius, color, alpha });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        let alpha = self.alpha;
        self.ops.push(DrawOp::Ellipse { center, radii, color, alpha });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let alpha = self.alpha;
        self.ops.push(DrawOp::Rect { origin, size, color, alpha });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Color, inner_alpha: f32) {
        let alpha = self.alpha * inner_alpha;
        self.ops.push(DrawOp::RadialGradient { center, radius, color, alpha });
    }
}
