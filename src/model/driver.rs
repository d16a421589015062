use nalgebra::Matrix4;
use tracing::info;

use crate::math::sphere::SphereMesh;
use crate::model::body::{Body, BodyID};
use crate::model::clock::SimulationState;
use crate::model::system::SolarSystem;

/// Everything a backend needs to put one body on screen.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub body: BodyID,
    pub texture: &'a str,
    pub mesh: &'a SphereMesh,
    pub translation: &'a Matrix4<f32>,
    pub rotation: &'a Matrix4<f32>,
    pub neg_rotation: &'a Matrix4<f32>,
    // Light sources and the backdrop are drawn at full brightness
    pub emissive: bool,
}

impl<'a> DrawCall<'a> {
    pub fn for_body(body: &'a Body) -> Self {
        let k = body.kinematics();
        DrawCall {
            body: body.id,
            texture: &body.info.texture,
            mesh: body.mesh(),
            translation: &k.translation,
            rotation: &k.axial_rotation,
            neg_rotation: &k.neg_axial_rotation,
            emissive: body.parent().is_none(),
        }
    }
}

/// Something that can draw bodies. Implementations are expected to copy
/// whatever they need out of the call; the referenced state changes as soon
/// as the frame advances.
pub trait RenderBackend {
    fn draw(&mut self, call: DrawCall<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub reset: bool,
    pub advanced: bool,
    pub elapsed: f32,
}

/// Owns the bodies and the simulation state, and runs one frame at a time.
pub struct Driver {
    system: SolarSystem,
    state: SimulationState,
}

impl Driver {
    pub fn new(system: SolarSystem, state: SimulationState) -> Self {
        Driver { system, state }
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Runs one frame at time `now`: apply a pending reset, draw everything
    /// as it currently stands, then (if playing) move everything forward for
    /// the next frame. What gets drawn is always the state computed on the
    /// previous frame.
    pub fn frame<B: RenderBackend + ?Sized>(&mut self, now: f64, backend: &mut B) -> FrameReport {
        let reset = self.state.take_reset();
        if reset {
            info!("Resetting orientation of all bodies");
            self.system.reset_all();
        }

        self.system.draw_all(backend);

        // Read the clock once, so every body sees the same elapsed time
        let elapsed = self.state.tick(now);
        let advanced = self.state.is_playing();
        if advanced {
            self.system.advance_all(elapsed, self.state.speed());
        }

        FrameReport {
            reset,
            advanced,
            elapsed,
        }
    }
}
