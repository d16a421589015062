use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

// A look-at camera orbiting the origin, where the sun sits. Dragging with
// the right mouse button swings it around, scrolling moves it in and out.
// Unlike ArcBall, y is always up, since that's the axis the orbits are laid
// out around.
pub struct OrbitCamera {
    // -- position --
    theta: f32,  // polar angle from +y
    phi: f32,    // azimuth, from +z towards +x
    radius: f32, // distance from origin
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    angle_step: f32,
    scroll_ratio: f32,
    theta_limit: f32,
    radius_limits: (f32, f32),
}

impl OrbitCamera {
    pub fn new(theta: f32, phi: f32, radius: f32) -> Self {
        let theta_limit = 0.001;
        let radius_limits = (0.6, 45.0);
        OrbitCamera {
            theta: nalgebra::clamp(theta, theta_limit, PI - theta_limit),
            phi: phi % (2.0 * PI),
            radius: nalgebra::clamp(radius, radius_limits.0, radius_limits.1),
            width: 800,
            height: 800,
            fovy: PI / 4.0,
            znear: 0.01,
            zfar: 1000.0,
            last_cursor_pos: Vector2::zeros(),
            angle_step: 0.005,
            scroll_ratio: 1.1,
            theta_limit,
            // Stay inside the starfield
            radius_limits,
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(
            self.width as f32 / self.height as f32,
            self.fovy,
            self.znear,
            self.zfar,
        )
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.theta = nalgebra::clamp(
            self.theta + dtheta,
            self.theta_limit,
            PI - self.theta_limit,
        );
        self.phi = (self.phi + dphi) % (2.0 * PI);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = nalgebra::clamp(
            self.radius * factor,
            self.radius_limits.0,
            self.radius_limits.1,
        );
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);

                if canvas.get_mouse_button(MouseButton::Button2) == Action::Press {
                    let dpos = curr_pos - self.last_cursor_pos;
                    self.rotate(-dpos.y * self.angle_step, -dpos.x * self.angle_step);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.width = w.max(1);
                self.height = h.max(1);
            }
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        Point3::new(
            self.radius * self.theta.sin() * self.phi.sin(),
            self.radius * self.theta.cos(),
            self.radius * self.theta.sin() * self.phi.cos(),
        )
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
