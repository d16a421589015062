use std::f32::consts::{PI, TAU};

use nalgebra::{Point2, Point3, Vector3};

use super::geometry::normal_from_center;

/// Angular spacing of the (phi, theta) sampling grid, in radians.
pub const DEFAULT_ANGULAR_STEP: f32 = 0.1;

/// Finest step we accept from configuration. About a million vertices.
pub const MIN_ANGULAR_STEP: f32 = 0.01;

/// A triangle soup approximating a sphere around the local origin.
///
/// Every triangle owns its three vertices; nothing is shared or indexed. The
/// positions and texture coordinates never change after generation, but the
/// normals are recomputed whenever the body moves. `revision` counts those
/// recomputations so a GPU-side copy can tell when it is stale.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    radius: f32,
    positions: Vec<Point3<f32>>,
    tex_coords: Vec<Point2<f32>>,
    normals: Vec<Vector3<f32>>,
    revision: u64,
}

/// Point on the sphere of the given radius. phi is the polar angle measured
/// from +z, theta the azimuth measured from +x towards +y.
pub fn vertex_at(radius: f32, phi: f32, theta: f32) -> Point3<f32> {
    Point3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

/// Equirectangular mapping: u runs along the azimuth, v from pole to pole.
pub fn tex_coord_at(phi: f32, theta: f32) -> Point2<f32> {
    Point2::new(theta / TAU, phi / PI)
}

impl SphereMesh {
    pub fn generate(radius: f32, step: f32) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "Sphere radius must be finite and non-negative, was {}",
            radius
        );
        debug_assert!(
            step.is_finite() && step > 0.0,
            "Angular step must be finite and positive, was {}",
            step
        );

        let rows = (PI / step).ceil() as usize;
        let cols = (TAU / step).ceil() as usize;

        let mut positions = Vec::with_capacity(6 * rows * cols);
        let mut tex_coords = Vec::with_capacity(6 * rows * cols);

        for i in 0..rows {
            let phi0 = i as f32 * step;
            // The last row and column get squashed so that we end exactly on
            // the pole and the seam.
            let phi1 = ((i + 1) as f32 * step).min(PI);
            for j in 0..cols {
                let theta0 = j as f32 * step;
                let theta1 = ((j + 1) as f32 * step).min(TAU);

                // Two triangles per cell, split along the (phi1, theta0) --
                // (phi0, theta1) diagonal.
                let corners = [
                    (phi0, theta0),
                    (phi1, theta0),
                    (phi0, theta1),
                    (phi1, theta0),
                    (phi1, theta1),
                    (phi0, theta1),
                ];
                for (phi, theta) in corners {
                    positions.push(vertex_at(radius, phi, theta));
                    tex_coords.push(tex_coord_at(phi, theta));
                }
            }
        }

        let mut mesh = SphereMesh {
            radius,
            positions,
            tex_coords,
            normals: vec![],
            revision: 0,
        };
        mesh.normals = mesh.normals_around(&Point3::origin());
        mesh
    }

    /// Points every normal from `center` through its vertex, and bumps the
    /// revision.
    pub fn recompute_normals(&mut self, center: &Point3<f32>) {
        self.normals = self.normals_around(center);
        self.revision += 1;
    }

    fn normals_around(&self, center: &Point3<f32>) -> Vec<Vector3<f32>> {
        self.positions
            .iter()
            .map(|v| normal_from_center(v, center))
            .collect()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn tex_coords(&self) -> &[Point2<f32>] {
        &self.tex_coords
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of vertices, which is three times the number of triangles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_lie_on_sphere() {
        for &radius in &[0.5, 1.0, 27.3] {
            let mesh = SphereMesh::generate(radius, DEFAULT_ANGULAR_STEP);
            for v in mesh.positions() {
                approx::assert_abs_diff_eq!(v.coords.norm(), radius, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_tex_coords_in_unit_square() {
        // 0.1 doesn't divide pi or 2pi, so the last row and column are the
        // interesting ones
        let mesh = SphereMesh::generate(2.0, DEFAULT_ANGULAR_STEP);
        for uv in mesh.tex_coords() {
            assert!((0.0..=1.0).contains(&uv.x), "u out of range: {}", uv.x);
            assert!((0.0..=1.0).contains(&uv.y), "v out of range: {}", uv.y);
        }

        let max_u = mesh.tex_coords().iter().map(|uv| uv.x).fold(0.0, f32::max);
        let max_v = mesh.tex_coords().iter().map(|uv| uv.y).fold(0.0, f32::max);
        approx::assert_relative_eq!(max_u, 1.0);
        approx::assert_relative_eq!(max_v, 1.0);
    }

    #[test]
    fn test_grid_layout() {
        let mesh = SphereMesh::generate(1.0, DEFAULT_ANGULAR_STEP);
        // 32 rows of phi, 63 columns of theta, 6 vertices per cell
        assert_eq!(mesh.len(), 32 * 63 * 6);
        assert_eq!(mesh.tex_coords().len(), mesh.len());
        assert_eq!(mesh.normals().len(), mesh.len());

        // First cell starts at the north pole, on the seam
        let step = DEFAULT_ANGULAR_STEP;
        let expected = [
            (0.0, 0.0),
            (step, 0.0),
            (0.0, step),
            (step, 0.0),
            (step, step),
            (0.0, step),
        ];
        for (k, (phi, theta)) in expected.iter().enumerate() {
            approx::assert_relative_eq!(mesh.positions()[k], vertex_at(1.0, *phi, *theta));
            approx::assert_relative_eq!(mesh.tex_coords()[k], tex_coord_at(*phi, *theta));
        }
        approx::assert_relative_eq!(mesh.positions()[0], Point3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.tex_coords()[0], Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_exact_step_has_no_squashed_cells() {
        let step = PI / 4.0;
        let mesh = SphereMesh::generate(1.0, step);
        assert_eq!(mesh.len(), 4 * 8 * 6);
        approx::assert_relative_eq!(
            *mesh.positions().last().unwrap(),
            vertex_at(1.0, 3.0 * step, 2.0 * PI)
        );
    }

    #[test]
    fn test_recompute_normals() {
        let mut mesh = SphereMesh::generate(1.0, 0.5);
        assert_eq!(mesh.revision(), 0);

        // Centered at the origin, normals and positions coincide on a unit sphere
        for (v, n) in mesh.positions().iter().zip(mesh.normals()) {
            approx::assert_relative_eq!(v.coords, *n, epsilon = 1e-5);
        }

        let center = Point3::new(10.0, 0.0, 0.0);
        mesh.recompute_normals(&center);
        assert_eq!(mesh.revision(), 1);
        for (v, n) in mesh.positions().iter().zip(mesh.normals()) {
            approx::assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-5);
            approx::assert_relative_eq!(*n, (v - center).normalize(), epsilon = 1e-5);
        }
    }
}
