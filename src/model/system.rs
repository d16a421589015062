use nalgebra::Point3;
use tracing::info;

use crate::config::TextureConfig;
use crate::consts;
use crate::model::body::{Body, BodyID, BodyInfo, BodyKind};
use crate::model::driver::{DrawCall, RenderBackend};

/// Flat registry of bodies. A body's parent is always an earlier entry, so
/// walking the bodies in order visits every parent before its children.
#[derive(Debug, Clone)]
pub struct SolarSystem {
    bodies: Vec<Body>,
    display_scale: f32,
    mesh_step: f32,
}

impl SolarSystem {
    pub fn new(display_scale: f32, mesh_step: f32) -> Self {
        SolarSystem {
            bodies: vec![],
            display_scale,
            mesh_step,
        }
    }

    /// Sun, earth, moon and the starfield, in that order.
    pub fn sun_earth_moon(textures: &TextureConfig, mesh_step: f32) -> Self {
        let mut system = SolarSystem::new(consts::DISPLAY_SCALE, mesh_step);

        let sun = system.add_fixed_body(
            BodyInfo::new("Sun", &textures.sun, consts::SUN_RADIUS)
                .with_axial_rate(consts::SUN_ROTATION_RATE),
        );
        let earth = system.add_body(
            BodyInfo::new("Earth", &textures.earth, consts::EARTH_RADIUS)
                .with_axial_rate(consts::EARTH_ROTATION_RATE)
                .with_axial_tilt(consts::EARTH_AXIAL_TILT.to_radians())
                .with_orbit(
                    consts::EARTH_ORBIT_RATE,
                    consts::EARTH_ORBITAL_INCLINATION.to_radians(),
                    consts::EARTH_TO_SUN,
                ),
            sun,
        );
        system.add_body(
            BodyInfo::new("Moon", &textures.moon, consts::MOON_RADIUS)
                .with_axial_rate(consts::MOON_ROTATION_RATE)
                .with_axial_tilt(consts::MOON_AXIAL_TILT.to_radians())
                .with_orbit(
                    consts::MOON_ORBIT_RATE,
                    consts::MOON_ORBITAL_INCLINATION.to_radians(),
                    consts::MOON_TO_EARTH,
                ),
            earth,
        );
        system.add_backdrop(BodyInfo::new(
            "Stars",
            &textures.stars,
            consts::BACKDROP_RADIUS,
        ));

        info!(bodies = system.len(), "Built sun-earth-moon system");
        system
    }

    pub fn add_fixed_body(&mut self, info: BodyInfo) -> BodyID {
        self.insert_new_body(info, BodyKind::Sphere, None)
    }

    /// Panics if `parent_id` isn't in this system.
    pub fn add_body(&mut self, info: BodyInfo, parent_id: BodyID) -> BodyID {
        let parent_position = self.bodies[parent_id.0].position();
        self.insert_new_body(info, BodyKind::Sphere, Some((parent_id, parent_position)))
    }

    pub fn add_backdrop(&mut self, info: BodyInfo) -> BodyID {
        self.insert_new_body(info, BodyKind::Backdrop, None)
    }

    fn insert_new_body(
        &mut self,
        info: BodyInfo,
        kind: BodyKind,
        parent: Option<(BodyID, Point3<f32>)>,
    ) -> BodyID {
        let id = BodyID(self.bodies.len());
        let body = Body::new(id, info, kind, parent, self.display_scale, self.mesh_step);
        self.bodies.push(body);
        id
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn find_body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.info.name == name)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn reset_all(&mut self) {
        for body in self.bodies.iter_mut().filter(|b| b.kind.is_animated()) {
            body.reset_orientation();
        }
    }

    /// Advances every animated body by the same `elapsed`, parents first.
    pub fn advance_all(&mut self, elapsed: f32, speed: f32) {
        for idx in 0..self.bodies.len() {
            if !self.bodies[idx].kind.is_animated() {
                continue;
            }
            let parent_position = self.bodies[idx]
                .parent()
                .map(|parent_id| self.bodies[parent_id.0].position());
            self.bodies[idx].advance(parent_position, elapsed, speed);
        }
    }

    pub fn draw_all<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for body in self.bodies.iter() {
            backend.draw(DrawCall::for_body(body));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn textures() -> TextureConfig {
        TextureConfig::default()
    }

    #[test]
    fn test_preset_layout() {
        let system = SolarSystem::sun_earth_moon(&textures(), 0.5);
        let names: Vec<_> = system.bodies().map(|b| b.info.name.as_str()).collect();
        assert_eq!(names, ["Sun", "Earth", "Moon", "Stars"]);

        let sun = system.find_body("Sun").unwrap();
        let earth = system.find_body("Earth").unwrap();
        let moon = system.find_body("Moon").unwrap();
        let stars = system.find_body("Stars").unwrap();

        assert_eq!(sun.parent(), None);
        assert_eq!(earth.parent(), Some(sun.id));
        assert_eq!(moon.parent(), Some(earth.id));
        assert_eq!(stars.parent(), None);
        assert_eq!(stars.kind, BodyKind::Backdrop);

        // The sun is unit diameter, and the stars surround everything
        assert_relative_eq!(sun.radius(), 0.5, max_relative = 1e-6);
        assert_relative_eq!(stars.radius(), 50.0, max_relative = 1e-5);
        assert_eq!(earth.info.texture, TextureConfig::default().earth);
    }

    #[test]
    fn test_children_start_next_to_parents() {
        let system = SolarSystem::sun_earth_moon(&textures(), 0.5);
        for body in system.bodies() {
            if let Some(parent_id) = body.parent() {
                let parent = system.get_body(parent_id);
                let distance = (body.position() - parent.position()).norm();
                let inclination = body.info.inclination;
                // At the starting angle, the offset is d * (1, sin(i), 0)
                assert_relative_eq!(
                    distance,
                    body.distance_from_parent() * (1.0 + inclination.sin().powi(2)).sqrt(),
                    max_relative = 1e-4
                );
            }
        }
    }

    #[test]
    fn test_backdrop_never_moves() {
        let mut system = SolarSystem::sun_earth_moon(&textures(), 0.5);
        let stars = system.find_body("Stars").unwrap().id;
        let before = system.get_body(stars).kinematics().clone();

        for _ in 0..4 {
            system.advance_all(0.5, 2.0);
        }
        system.reset_all();
        assert_eq!(*system.get_body(stars).kinematics(), before);
    }

    #[test]
    fn test_grandchild_follows_chain() {
        let mut system = SolarSystem::new(1.0, 0.5);
        let a = system.add_fixed_body(BodyInfo::new("a", "a", 1.0));
        let b = system.add_body(BodyInfo::new("b", "b", 0.5).with_orbit(1.0, 0.0, 10.0), a);
        let c = system.add_body(BodyInfo::new("c", "c", 0.1).with_orbit(3.0, 0.2, 2.0), b);

        system.advance_all(0.6, 1.0);

        let b_pos = system.get_body(b).position();
        let c_body = system.get_body(c);
        assert_relative_eq!(
            c_body.position(),
            b_pos + c_body.offset_from_parent(),
            epsilon = 1e-5
        );
        assert_eq!(system.get_body(a).position(), Point3::origin());
    }

    #[test]
    #[should_panic]
    fn test_unknown_parent_panics() {
        let mut system = SolarSystem::new(1.0, 0.5);
        system.add_body(BodyInfo::new("orphan", "x", 1.0), BodyID(3));
    }
}
