use std::f32::consts::FRAC_PI_4;
use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};
use nalgebra::{Point2, Point3};

use self::camera::OrbitCamera;
use self::renderer::PlanetRenderer;
use crate::model::{Driver, SimulationState};

mod camera;
pub mod controller;
mod renderer;

pub struct Simulation {
    driver: Driver,
    camera: OrbitCamera,
    renderer: PlanetRenderer,
    // Zero of the simulation clock
    start: Instant,
}

impl Simulation {
    /// `start` is the instant the driver's clock reads as zero.
    pub fn new(driver: Driver, start: Instant) -> Self {
        Self {
            driver,
            camera: OrbitCamera::new(FRAC_PI_4, FRAC_PI_4, 3.0),
            renderer: PlanetRenderer::new(),
            start,
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            controller::process_event(&event.value, self.driver.state_mut());
        }
    }

    fn draw_overlay(&self, window: &mut Window) {
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &overlay_text(self.driver.state()),
            &Point2::new(10.0, 10.0),
            60.0,
            &default_font,
            &text_color,
        );
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        let now = self.start.elapsed().as_secs_f64();
        self.driver.frame(now, &mut self.renderer);
        self.draw_overlay(window);
    }
}

fn overlay_text(state: &SimulationState) -> String {
    let status = if state.is_playing() {
        "Animation is playing."
    } else {
        "Animation is paused."
    };
    format!("{}\nSpeed: {:.1}x", status, state.speed())
}
