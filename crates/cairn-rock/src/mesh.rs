//! Latitude/longitude sphere mesh whose positions are rewritten in place.

use cairn_render::MeshData;
use glam::Vec3;

/// Axis-aligned bounds of a mesh in model space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Sphere-topology mesh with a fixed vertex and triangle count.
///
/// `directions` keeps the original unit-sphere vertex directions so the
/// positions can be recomputed from scratch on every rebuild without drift.
#[derive(Clone, Debug)]
pub struct RockMesh {
    width_segments: u32,
    height_segments: u32,
    directions: Vec<Vec3>,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl RockMesh {
    /// Build a unit sphere with the given segment counts.
    ///
    /// Vertices are laid out row by row from the +Y pole to the -Y pole with a
    /// duplicated seam column, `(w + 1) * (h + 1)` in total. The first and last
    /// rows emit one triangle per quad so no degenerate triangles reach the GPU.
    ///
    /// # Panics
    ///
    /// Panics if `width_segments < 3` or `height_segments < 2`.
    pub fn unit_sphere(width_segments: u32, height_segments: u32) -> Self {
        assert!(
            width_segments >= 3 && height_segments >= 2,
            "sphere needs at least 3x2 segments, got {width_segments}x{height_segments}"
        );
        let w = width_segments;
        let h = height_segments;
        let row = (w + 1) as usize;
        let mut directions = Vec::with_capacity(row * (h + 1) as usize);

        for iy in 0..=h {
            let v = iy as f32 / h as f32;
            let theta = v * std::f32::consts::PI;
            for ix in 0..=w {
                let u = ix as f32 / w as f32;
                let phi = u * std::f32::consts::TAU;
                directions.push(Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                ));
            }
        }

        let mut indices = Vec::with_capacity((w * (h - 1) * 6) as usize);
        let at = |ix: u32, iy: u32| iy * (w + 1) + ix;
        for iy in 0..h {
            for ix in 0..w {
                let a = at(ix + 1, iy);
                let b = at(ix, iy);
                let c = at(ix, iy + 1);
                let d = at(ix + 1, iy + 1);
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != h - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        let positions: Vec<[f32; 3]> = directions.iter().map(|d| d.to_array()).collect();
        let normals = positions.clone();
        Self {
            width_segments: w,
            height_segments: h,
            directions,
            positions,
            normals,
            indices,
        }
    }

    pub fn segments(&self) -> (u32, u32) {
        (self.width_segments, self.height_segments)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unit-sphere direction of every vertex.
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Overwrite vertex positions in place. Normals are stale until
    /// [`recompute_normals`](Self::recompute_normals) runs.
    pub(crate) fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.positions
    }

    /// Recompute smooth vertex normals from the current positions.
    ///
    /// Each triangle's unnormalized face normal (so larger faces weigh more) is
    /// added to its three vertices, then every sum is normalized. Vertices no
    /// triangle references (the pole seam duplicates) keep their sphere
    /// direction.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [ia, ib, ic] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let a = Vec3::from(self.positions[ia]);
            let b = Vec3::from(self.positions[ib]);
            let c = Vec3::from(self.positions[ic]);
            let face = (c - b).cross(a - b);
            acc[ia] += face;
            acc[ib] += face;
            acc[ic] += face;
        }
        for ((normal, sum), dir) in self.normals.iter_mut().zip(acc).zip(&self.directions) {
            *normal = sum.try_normalize().unwrap_or(*dir).to_array();
        }
    }

    /// Bounding box of the current positions.
    pub fn bounds(&self) -> Bounds {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &self.positions {
            let p = Vec3::from(*p);
            min = min.min(p);
            max = max.max(p);
        }
        Bounds { min, max }
    }

    /// Borrow the buffers for upload to a scene.
    pub fn as_mesh_data(&self) -> MeshData<'_> {
        MeshData {
            positions: &self.positions,
            normals: &self.normals,
            indices: &self.indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_triangle_counts() {
        let mesh = RockMesh::unit_sphere(128, 128);
        assert_eq!(mesh.vertex_count(), 129 * 129);
        // Two triangles per quad except one per quad in the pole rows.
        assert_eq!(mesh.triangle_count(), 128 * 127 * 2);
        assert_eq!(mesh.segments(), (128, 128));
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = RockMesh::unit_sphere(16, 12);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices().iter().all(|&i| i < n));
    }

    #[test]
    fn test_unit_sphere_positions_are_unit() {
        let mesh = RockMesh::unit_sphere(24, 16);
        for p in mesh.positions() {
            let len = Vec3::from(*p).length();
            assert!((len - 1.0).abs() < 1e-5, "vertex off unit sphere: {len}");
        }
    }

    #[test]
    fn test_recomputed_normals_point_outward() {
        let mut mesh = RockMesh::unit_sphere(32, 24);
        mesh.recompute_normals();
        for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
            let p = Vec3::from(*p);
            let n = Vec3::from(*n);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(p.dot(n) > 0.9, "normal not outward at {p:?}: {n:?}");
        }
    }

    #[test]
    fn test_unreferenced_pole_vertices_keep_direction() {
        let mut mesh = RockMesh::unit_sphere(8, 6);
        let n = mesh.vertex_count() as u32;
        let referenced: std::collections::HashSet<u32> = mesh.indices().iter().copied().collect();
        let orphans: Vec<u32> = (0..n).filter(|i| !referenced.contains(i)).collect();
        assert!(!orphans.is_empty());

        mesh.recompute_normals();
        for i in orphans {
            let normal = Vec3::from(mesh.normals()[i as usize]);
            let dir = mesh.directions()[i as usize];
            assert!((normal - dir).length() < 1e-6, "vertex {i}: {normal:?} vs {dir:?}");
        }
    }

    #[test]
    fn test_bounds_of_unit_sphere() {
        let mesh = RockMesh::unit_sphere(32, 32);
        let b = mesh.bounds();
        assert!((b.min.y + 1.0).abs() < 1e-5);
        assert!((b.max.y - 1.0).abs() < 1e-5);
        assert!(b.size().x > 1.99);
    }

    #[test]
    #[should_panic(expected = "at least 3x2")]
    fn test_too_few_segments_panics() {
        let _ = RockMesh::unit_sphere(2, 2);
    }
}
