use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

/// Homogeneous rotation by `angle` radians around `axis`. The axis does not
/// need to be normalized, but a (near) zero axis has no direction, so we
/// return the identity there instead of a matrix full of NaNs.
pub fn rotate(angle: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
    match Unit::try_new(*axis, f32::EPSILON) {
        Some(axis) => Rotation3::from_axis_angle(&axis, angle).to_homogeneous(),
        None => Matrix4::identity(),
    }
}

pub fn translate(offset: &Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_translation(offset)
}

/// Sends a direction (w = 0) through a homogeneous transform.
pub fn transform_direction(m: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    m.transform_vector(v)
}

/// Unit vector pointing from `center` to `vertex`. Zero if they coincide.
pub fn normal_from_center(vertex: &Point3<f32>, center: &Point3<f32>) -> Vector3<f32> {
    (vertex - center)
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros)
}
