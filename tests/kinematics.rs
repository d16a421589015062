use std::f32::consts::FRAC_PI_2;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::{Matrix4, Point3, Vector3};
use solar_orrery::config::TextureConfig;
use solar_orrery::model::{
    BodyID, BodyInfo, DrawCall, Driver, RenderBackend, SimulationState, SolarSystem,
};

/// Keeps a copy of everything it's asked to draw.
#[derive(Default)]
struct RecordingBackend {
    frames: Vec<Vec<(BodyID, String, Matrix4<f32>, Matrix4<f32>, Matrix4<f32>)>>,
}

impl RecordingBackend {
    fn start_frame(&mut self) {
        self.frames.push(vec![]);
    }
}

impl RenderBackend for RecordingBackend {
    fn draw(&mut self, call: DrawCall<'_>) {
        if self.frames.is_empty() {
            self.start_frame();
        }
        self.frames.last_mut().unwrap().push((
            call.body,
            call.texture.to_owned(),
            *call.translation,
            *call.rotation,
            *call.neg_rotation,
        ));
    }
}

fn two_body_system(orbit_rate: f32, inclination: f32) -> (SolarSystem, BodyID, BodyID) {
    let mut system = SolarSystem::new(1.0, 0.5);
    let parent = system.add_fixed_body(BodyInfo::new("parent", "parent.png", 1.0));
    let child = system.add_body(
        BodyInfo::new("child", "child.png", 0.5)
            .with_axial_rate(0.7)
            .with_orbit(orbit_rate, inclination, 10.0),
        parent,
    );
    (system, parent, child)
}

#[test]
fn test_end_to_end_one_second() {
    let (system, parent, child) = two_body_system(1.0, 0.0);
    let mut driver = Driver::new(system, SimulationState::new(0.0));
    let mut backend = RecordingBackend::default();

    driver.frame(1.0, &mut backend);

    let theta = FRAC_PI_2 + 1.0;
    assert_eq!(driver.system().get_body(parent).position(), Point3::origin());
    assert_abs_diff_eq!(
        driver.system().get_body(child).position(),
        Point3::new(10.0 * theta.sin(), 0.0, 10.0 * theta.cos()),
        epsilon = 1e-4
    );
}

#[test]
fn test_orbit_formula_for_any_elapsed() {
    for &inclination in &[0.0, 0.3, FRAC_PI_2] {
        let (mut system, parent, child) = two_body_system(0.9, inclination);
        for &elapsed in &[0.0, 0.01, 0.5, 2.0, 13.0] {
            system.advance_all(elapsed, 1.0);

            let body = system.get_body(child);
            let theta = body.kinematics().orbital_angle;
            let expected = system.get_body(parent).position()
                + 10.0 * Vector3::new(theta.sin(), theta.sin() * inclination.sin(), theta.cos());
            assert_relative_eq!(body.position(), expected, epsilon = 1e-4);

            if inclination == 0.0 {
                assert_eq!(body.position().y, 0.0);
            }
        }
    }
}

#[test]
fn test_angles_accumulate_linearly() {
    let (mut system, _, child) = two_body_system(1.3, 0.2);
    let before = system.get_body(child).kinematics().clone();

    system.advance_all(0.75, 1.0);
    system.advance_all(0.5, 1.0);

    let after = system.get_body(child).kinematics();
    assert_relative_eq!(
        after.axial_angle,
        before.axial_angle + 0.7 * 1.25,
        epsilon = 1e-5
    );
    assert_relative_eq!(
        after.orbital_angle,
        before.orbital_angle + 1.3 * 1.25,
        epsilon = 1e-5
    );
}

#[test]
fn test_speed_scales_angles() {
    let (mut system, _, child) = two_body_system(1.0, 0.0);
    let before = system.get_body(child).kinematics().orbital_angle;
    system.advance_all(0.5, 3.0);
    assert_relative_eq!(
        system.get_body(child).kinematics().orbital_angle,
        before + 1.5,
        epsilon = 1e-5
    );

    // Zero speed freezes the angles, but the pose is still recomputed
    let frozen = system.get_body(child).kinematics().clone();
    system.advance_all(4.0, 0.0);
    assert_eq!(system.get_body(child).kinematics().axial_angle, frozen.axial_angle);
    assert_eq!(system.get_body(child).kinematics().orbital_angle, frozen.orbital_angle);
}

#[test]
fn test_pause_freezes_everything() {
    let (system, _, _) = two_body_system(1.0, 0.4);
    let mut driver = Driver::new(system, SimulationState::new(0.0));
    let mut backend = RecordingBackend::default();

    driver.frame(0.5, &mut backend);
    driver.state_mut().toggle_playing();
    let snapshot: Vec<_> = driver
        .system()
        .bodies()
        .map(|b| b.kinematics().clone())
        .collect();

    for &now in &[0.6, 3.0, 100.0, 100.0, 2500.0] {
        let report = driver.frame(now, &mut backend);
        assert!(!report.advanced);
    }
    let after: Vec<_> = driver
        .system()
        .bodies()
        .map(|b| b.kinematics().clone())
        .collect();
    assert_eq!(snapshot, after);

    // Unpausing doesn't make up for lost time
    driver.state_mut().toggle_playing();
    let report = driver.frame(2500.25, &mut backend);
    assert!(report.advanced);
    assert_relative_eq!(report.elapsed, 0.25, epsilon = 1e-3);
}

#[test]
fn test_every_body_sees_same_elapsed() {
    let mut system = SolarSystem::sun_earth_moon(&TextureConfig::default(), 0.5);
    let before: Vec<_> = system
        .bodies()
        .map(|b| b.kinematics().axial_angle)
        .collect();

    system.advance_all(0.2, 1.0);

    for (body, angle) in system.bodies().zip(before) {
        let rate = if body.kind.is_animated() {
            body.info.axial_rate
        } else {
            0.0
        };
        assert_relative_eq!(
            body.kinematics().axial_angle,
            angle + rate * 0.2,
            max_relative = 1e-5
        );
    }
}

#[test]
fn test_reset_is_idempotent() {
    let mut once = SolarSystem::sun_earth_moon(&TextureConfig::default(), 0.5);
    once.advance_all(1.3, 1.0);
    let mut twice = once.clone();

    once.reset_all();
    twice.reset_all();
    twice.reset_all();

    for (a, b) in once.bodies().zip(twice.bodies()) {
        assert_eq!(a.kinematics(), b.kinematics());
    }
}

#[test]
fn test_reset_through_driver() {
    let (system, _, child) = two_body_system(1.0, 0.0);
    let start = system.get_body(child).kinematics().clone();
    let mut driver = Driver::new(system, SimulationState::new(0.0));
    let mut backend = RecordingBackend::default();

    backend.start_frame();
    driver.frame(1.0, &mut backend);
    backend.start_frame();
    driver.frame(2.0, &mut backend);

    driver.state_mut().request_reset();
    backend.start_frame();
    let report = driver.frame(2.0, &mut backend);
    assert!(report.reset);
    assert!(!driver.state().is_reset_pending());

    // The frame after a reset draws the starting orientation...
    let (_, texture, _, rotation, neg_rotation) = &backend.frames[2][1];
    assert_eq!(texture, "child.png");
    assert_eq!(*rotation, start.axial_rotation);
    assert_eq!(*neg_rotation, Matrix4::identity());

    // ...and, with no time passing, the angles are back where they began
    let k = driver.system().get_body(child).kinematics();
    assert_eq!(k.axial_angle, start.axial_angle);
    assert_eq!(k.orbital_angle, start.orbital_angle);
    assert_abs_diff_eq!(k.position, start.position, epsilon = 1e-5);
}

#[test]
fn test_draw_order_and_lag() {
    let mut driver = Driver::new(
        SolarSystem::sun_earth_moon(&TextureConfig::default(), 0.5),
        SimulationState::new(0.0),
    );
    let mut backend = RecordingBackend::default();

    backend.start_frame();
    driver.frame(0.1, &mut backend);
    let textures: Vec<_> = backend.frames[0].iter().map(|c| c.1.clone()).collect();
    let defaults = TextureConfig::default();
    assert_eq!(
        textures,
        [defaults.sun, defaults.earth, defaults.moon, defaults.stars]
    );

    // What frame 2 draws is what frame 1 computed
    let earth = driver.system().find_body("Earth").unwrap();
    let translation = earth.kinematics().translation;
    backend.start_frame();
    driver.frame(0.2, &mut backend);
    assert_eq!(backend.frames[1][1].2, translation);
}
