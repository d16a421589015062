use std::f32::consts::{FRAC_PI_2, PI};

use nalgebra::{Matrix4, Point3, Vector3};
use tracing::debug;

use crate::math::geometry::{rotate, transform_direction, translate};
use crate::math::sphere::SphereMesh;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the immutable info about a body, in physical units.
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub texture: String,
    // km
    pub radius: f32,
    // rad/s
    pub axial_rate: f32,
    pub orbital_rate: f32,
    // rad, both relative to the parent's reference plane
    pub inclination: f32,
    pub axial_tilt: f32,
    // km
    pub distance_from_parent: f32,
}

impl BodyInfo {
    pub fn new(name: &str, texture: &str, radius: f32) -> Self {
        BodyInfo {
            name: name.to_owned(),
            texture: texture.to_owned(),
            radius,
            axial_rate: 0.0,
            orbital_rate: 0.0,
            inclination: 0.0,
            axial_tilt: FRAC_PI_2,
            distance_from_parent: 0.0,
        }
    }

    pub fn with_axial_rate(mut self, axial_rate: f32) -> Self {
        self.axial_rate = axial_rate;
        self
    }

    pub fn with_axial_tilt(mut self, axial_tilt: f32) -> Self {
        self.axial_tilt = axial_tilt;
        self
    }

    pub fn with_orbit(mut self, orbital_rate: f32, inclination: f32, distance: f32) -> Self {
        self.orbital_rate = orbital_rate;
        self.inclination = inclination;
        self.distance_from_parent = distance;
        self
    }
}

/// What sort of thing a body is. Everything shares the same kinematics;
/// the kind only decides whether the body takes part in the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// A spinning, possibly orbiting, sphere.
    Sphere,
    /// A huge inward-facing sphere behind everything else. Never animated.
    Backdrop,
}

impl BodyKind {
    pub fn is_animated(self) -> bool {
        match self {
            BodyKind::Sphere => true,
            BodyKind::Backdrop => false,
        }
    }
}

/// The mutable part of a body: angles, where it is, and the matrices the
/// renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    pub axial_angle: f32,
    pub orbital_angle: f32,
    pub position: Point3<f32>,
    // Only changes on reset; spinning around it doesn't move it.
    pub rotation_axis: Vector3<f32>,
    pub axial_rotation: Matrix4<f32>,
    pub neg_axial_rotation: Matrix4<f32>,
    pub translation: Matrix4<f32>,
}

/// Angle that both the axial and the orbital angle restart from.
pub const START_ANGLE: f32 = PI / 2.0;

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    pub kind: BodyKind,
    parent: Option<BodyID>,
    // Display units
    radius: f32,
    distance_from_parent: f32,
    kinematics: Kinematics,
    mesh: SphereMesh,
}

impl Body {
    /// Builds a body in its starting pose. `parent` is the parent's id and
    /// current position; the caller guarantees the parent was built first.
    pub fn new(
        id: BodyID,
        info: BodyInfo,
        kind: BodyKind,
        parent: Option<(BodyID, Point3<f32>)>,
        display_scale: f32,
        mesh_step: f32,
    ) -> Self {
        debug_assert!(
            info.radius.is_finite() && info.radius >= 0.0,
            "Bad radius for {}: {}",
            info.name,
            info.radius
        );
        debug_assert!(
            [
                info.axial_rate,
                info.orbital_rate,
                info.inclination,
                info.axial_tilt,
                info.distance_from_parent,
            ]
            .iter()
            .all(|x| x.is_finite()),
            "Non-finite configuration for {}",
            info.name
        );

        let radius = info.radius * display_scale;
        let distance_from_parent = info.distance_from_parent * display_scale;

        let mut body = Body {
            id,
            kind,
            parent: parent.map(|(id, _)| id),
            radius,
            distance_from_parent,
            kinematics: Kinematics {
                axial_angle: START_ANGLE,
                orbital_angle: START_ANGLE,
                position: Point3::origin(),
                rotation_axis: Vector3::y(),
                axial_rotation: Matrix4::identity(),
                neg_axial_rotation: Matrix4::identity(),
                translation: Matrix4::identity(),
            },
            mesh: SphereMesh::generate(radius, mesh_step),
            info,
        };

        body.reset_orientation();
        body.update_location(parent.map(|(_, p)| p));
        body.update_translation_matrix();
        body.mesh.recompute_normals(&body.kinematics.position);

        debug!(
            name = %body.info.name,
            id = body.id.0,
            radius = body.radius,
            vertices = body.mesh.len(),
            "Created body"
        );
        body
    }

    /// Puts the body back in its starting pose. Position and translation are
    /// left alone; the next advance re-derives them.
    pub fn reset_orientation(&mut self) {
        let k = &mut self.kinematics;
        k.orbital_angle = START_ANGLE;
        k.axial_angle = START_ANGLE;

        let initial_angle = self.info.inclination + k.axial_angle + self.info.axial_tilt;
        k.axial_rotation = rotate(initial_angle, &Vector3::x());
        // Not the inverse of the above! Steady state negates the angle, the
        // starting pose doesn't.
        k.neg_axial_rotation = Matrix4::identity();
        k.rotation_axis = transform_direction(&k.axial_rotation, &Vector3::y());
    }

    /// Moves the body forward by `elapsed` seconds at `speed` times normal
    /// speed. `parent_position` must already be this frame's position of the
    /// parent, and must be present exactly when the body has a parent.
    pub fn advance(&mut self, parent_position: Option<Point3<f32>>, elapsed: f32, speed: f32) {
        debug_assert_eq!(
            parent_position.is_some(),
            self.parent.is_some(),
            "Parent position doesn't match parent of {}",
            self.info.name
        );
        let dt = speed * elapsed;

        // Spin
        let k = &mut self.kinematics;
        k.axial_angle += self.info.axial_rate * dt;
        k.axial_rotation = rotate(k.axial_angle, &k.rotation_axis);
        k.neg_axial_rotation = rotate(-k.axial_angle, &k.rotation_axis);

        // Revolve
        k.orbital_angle += self.info.orbital_rate * dt;
        self.update_location(parent_position);
        self.update_translation_matrix();
        self.mesh.recompute_normals(&self.kinematics.position);
    }

    fn update_location(&mut self, parent_position: Option<Point3<f32>>) {
        self.kinematics.position = match parent_position {
            None => Point3::origin(),
            Some(parent_position) => parent_position + self.offset_from_parent(),
        };
    }

    /// Where the body sits relative to its parent at the current orbital
    /// angle. The inclination only tips the orbit by lifting it along y.
    pub fn offset_from_parent(&self) -> Vector3<f32> {
        let theta = self.kinematics.orbital_angle;
        self.distance_from_parent
            * Vector3::new(
                theta.sin(),
                theta.sin() * self.info.inclination.sin(),
                theta.cos(),
            )
    }

    fn update_translation_matrix(&mut self) {
        let k = &mut self.kinematics;
        k.translation = match self.parent {
            None => Matrix4::identity(),
            Some(_) => translate(&k.position.coords),
        };
    }

    pub fn parent(&self) -> Option<BodyID> {
        self.parent
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn distance_from_parent(&self) -> f32 {
        self.distance_from_parent
    }

    pub fn position(&self) -> Point3<f32> {
        self.kinematics.position
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }
}
