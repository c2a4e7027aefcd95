//! The single live rock in a scene.

use cairn_physics::rest_offset_for;
use cairn_render::{MaterialDesc, MeshHandle, SceneGraph, Transform};
use cairn_rock::{Bounds, RockGenerator, RockMesh, RockProfile, rock_material};
use glam::Vec3;
use rand::Rng;

/// Height of the ground plane the rock rests on.
pub const GROUND_Y: f32 = -1.24;

/// A built rock mesh, the scene object showing it, and where it rests.
///
/// At most one exists per scene: [`rebuild`](Self::rebuild) removes the old
/// scene object before the new one is added.
#[derive(Debug)]
pub struct RockInstance {
    handle: MeshHandle,
    mesh: RockMesh,
    material: MaterialDesc,
    profile: RockProfile,
    bounds: Bounds,
}

impl RockInstance {
    /// Generate a mesh for `profile` and add it to `scene`.
    pub fn build(
        scene: &mut dyn SceneGraph,
        generator: &RockGenerator,
        profile: RockProfile,
        rng: &mut impl Rng,
    ) -> Self {
        let mesh = generator.generate_with_rng(&profile.params, rng);
        let material = rock_material(profile.preset);
        let handle = scene.add_mesh(mesh.as_mesh_data(), &material);
        let bounds = mesh.bounds();
        tracing::debug!(name = %profile.name, preset = profile.preset.key(), "Rock built");
        Self {
            handle,
            mesh,
            material,
            profile,
            bounds,
        }
    }

    /// Re-displace the existing mesh for `profile` and swap the scene object.
    ///
    /// The previous scene object (geometry and material) is released first.
    pub fn rebuild(
        &mut self,
        scene: &mut dyn SceneGraph,
        generator: &RockGenerator,
        profile: RockProfile,
        rng: &mut impl Rng,
    ) {
        scene.remove_mesh(self.handle);
        if generator.segments() == self.mesh.segments().0 {
            generator.displace(&mut self.mesh, &profile.params, rng);
        } else {
            self.mesh = generator.generate_with_rng(&profile.params, rng);
        }
        self.material = rock_material(profile.preset);
        self.handle = scene.add_mesh(self.mesh.as_mesh_data(), &self.material);
        self.bounds = self.mesh.bounds();
        tracing::debug!(name = %profile.name, preset = profile.preset.key(), "Rock rebuilt");
        self.profile = profile;
    }

    /// Release the scene object.
    pub fn dispose(self, scene: &mut dyn SceneGraph) {
        scene.remove_mesh(self.handle);
    }

    pub fn handle(&self) -> MeshHandle {
        self.handle
    }

    pub fn mesh(&self) -> &RockMesh {
        &self.mesh
    }

    pub fn material(&self) -> &MaterialDesc {
        &self.material
    }

    pub fn profile(&self) -> &RockProfile {
        &self.profile
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Vertical offset at which the rock, drawn at `scale`, touches the
    /// ground.
    pub fn rest_offset(&self, scale: f32) -> f32 {
        rest_offset_for(self.bounds.min.y, scale, GROUND_Y)
    }

    /// Place the rock at `offset` above the origin with uniform `scale`.
    pub fn place(&self, scene: &mut dyn SceneGraph, offset: f32, scale: f32) {
        let transform = Transform {
            translation: Vec3::new(0.0, offset, 0.0),
            scale: Vec3::splat(scale),
            ..Transform::default()
        };
        scene.set_transform(self.handle, &transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_render::RecordingScene;
    use cairn_rock::{MaterialPreset, RockShapeParameters};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generator() -> RockGenerator {
        RockGenerator::new(24)
    }

    #[test]
    fn test_build_adds_one_mesh() {
        let mut scene = RecordingScene::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rock = RockInstance::build(&mut scene, &generator(), RockProfile::default(), &mut rng);
        assert_eq!(scene.live_mesh_count(), 1);
        let recorded = scene.mesh(rock.handle()).unwrap();
        assert_eq!(recorded.vertex_count, rock.mesh().vertex_count());
        assert!(recorded.material.normal_map.is_some());
    }

    #[test]
    fn test_rebuild_releases_previous() {
        let mut scene = RecordingScene::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let gen_ = generator();
        let mut rock = RockInstance::build(&mut scene, &gen_, RockProfile::default(), &mut rng);
        let first = rock.handle();
        for preset in MaterialPreset::ALL {
            let profile = RockProfile::new(RockShapeParameters::default(), preset);
            rock.rebuild(&mut scene, &gen_, profile, &mut rng);
            assert_eq!(scene.live_mesh_count(), 1);
        }
        assert!(scene.mesh(first).is_none());
        assert_eq!(scene.mesh_churn(), (9, 8));
        assert_eq!(rock.profile().preset, MaterialPreset::Obsidian);
    }

    #[test]
    fn test_rest_offset_touches_ground() {
        let mut scene = RecordingScene::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rock = RockInstance::build(&mut scene, &generator(), RockProfile::default(), &mut rng);
        for scale in [1.0, 0.5] {
            let offset = rock.rest_offset(scale);
            let bottom = offset + rock.bounds().min.y * scale;
            assert!((bottom - GROUND_Y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_place_sets_transform() {
        let mut scene = RecordingScene::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rock = RockInstance::build(&mut scene, &generator(), RockProfile::default(), &mut rng);
        rock.place(&mut scene, 0.25, 0.8);
        let t = scene.mesh(rock.handle()).unwrap().transform;
        assert_eq!(t.translation.y, 0.25);
        assert_eq!(t.scale, Vec3::splat(0.8));
    }

    #[test]
    fn test_dispose() {
        let mut scene = RecordingScene::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let rock = RockInstance::build(&mut scene, &generator(), RockProfile::default(), &mut rng);
        rock.dispose(&mut scene);
        assert_eq!(scene.live_mesh_count(), 0);
    }
}
