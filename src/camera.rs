//! Free-fly camera, projection and input controller.
//!
//! The [`Camera`] stores a position plus yaw/pitch angles, the [`Projection`]
//! switches between perspective and orthographic views and the
//! [`CameraController`] turns keyboard, mouse and wheel input into camera
//! movement once per frame.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch limit so the view never flips over the poles.
const MAX_PITCH_DEG: f32 = 89.0;
const MIN_FOVY_DEG: f32 = 1.0;
const MAX_FOVY_DEG: f32 = 45.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along.
    pub fn front(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.front().cross(Vector3::unit_y()).normalize()
    }

    pub fn up(&self) -> Vector3<f32> {
        self.right().cross(self.front()).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front(), Vector3::unit_y())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
    /// Half of the visible height in orthographic mode.
    ortho_half_height: f32,
    mode: ProjectionMode,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
            ortho_half_height: 5.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn fovy(&self) -> Rad<f32> {
        self.fovy
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
        log::info!("projection switched to {:?}", self.mode);
    }

    /// Narrow (positive `delta`) or widen the field of view by `delta` degrees.
    pub fn zoom(&mut self, delta: f32) {
        let degrees = cgmath::Deg::from(self.fovy).0 - delta;
        self.fovy = cgmath::Deg(degrees.clamp(MIN_FOVY_DEG, MAX_FOVY_DEG)).into();
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let projection = match self.mode {
            ProjectionMode::Perspective => perspective(self.fovy, self.aspect, self.znear, self.zfar),
            ProjectionMode::Orthographic => {
                let half_width = self.ortho_half_height * self.aspect;
                cgmath::ortho(
                    -half_width,
                    half_width,
                    -self.ortho_half_height,
                    self.ortho_half_height,
                    self.znear,
                    self.zfar,
                )
            }
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }
}

/// Accumulates input between frames and applies it in [`CameraController::update`].
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// `speed` is in units per second, `sensitivity` in degrees per pixel of mouse motion.
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Returns whether the key moves the camera.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => {
                self.amount_forward = amount;
                true
            }
            KeyCode::KeyS | KeyCode::ArrowDown => {
                self.amount_backward = amount;
                true
            }
            KeyCode::KeyA | KeyCode::ArrowLeft => {
                self.amount_left = amount;
                true
            }
            KeyCode::KeyD | KeyCode::ArrowRight => {
                self.amount_right = amount;
                true
            }
            KeyCode::KeyQ => {
                self.amount_up = amount;
                true
            }
            KeyCode::KeyE => {
                self.amount_down = amount;
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        self.rotate_horizontal += mouse_dx as f32;
        self.rotate_vertical += mouse_dy as f32;
    }

    pub fn handle_scroll(&mut self, delta: &MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, scroll) => *scroll,
            // roughly one line per 20 pixels
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
        };
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.handle_key(*key, *state),
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_scroll(delta);
                true
            }
            _ => false,
        }
    }

    pub fn update(&mut self, camera: &mut Camera, projection: &mut Projection, dt: Duration) {
        let dt = dt.as_secs_f32();
        let velocity = self.speed * dt;

        let front = camera.front();
        let right = camera.right();
        let up = camera.up();
        camera.position += front * (self.amount_forward - self.amount_backward) * velocity;
        camera.position += right * (self.amount_right - self.amount_left) * velocity;
        camera.position += up * (self.amount_up - self.amount_down) * velocity;

        // Moving the mouse up (negative dy) looks up.
        camera.yaw += Rad::from(cgmath::Deg(self.rotate_horizontal * self.sensitivity));
        camera.pitch += Rad::from(cgmath::Deg(-self.rotate_vertical * self.sensitivity));
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        let max_pitch = Rad::from(cgmath::Deg(MAX_PITCH_DEG)).0;
        camera.pitch = Rad(camera.pitch.0.clamp(-max_pitch, max_pitch));

        if self.scroll != 0.0 {
            projection.zoom(self.scroll);
            self.scroll = 0.0;
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera state together with the GPU resources that expose it to shaders.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, EuclideanSpace};

    use super::*;

    fn start_camera() -> Camera {
        Camera::new((1.0, 3.0, 5.0), Deg(-90.0), Deg(0.0))
    }

    #[test]
    fn starts_looking_down_negative_z() {
        let front = start_camera().front();
        assert!((front - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn forward_moves_speed_times_dt() {
        let mut camera = start_camera();
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let mut controller = CameraController::new(2.5, 0.1);

        assert!(controller.handle_key(KeyCode::KeyW, ElementState::Pressed));
        controller.update(&mut camera, &mut projection, Duration::from_millis(500));
        assert!((camera.position.to_vec() - Vector3::new(1.0, 3.0, 3.75)).magnitude() < 1e-4);

        controller.handle_key(KeyCode::KeyW, ElementState::Released);
        controller.update(&mut camera, &mut projection, Duration::from_millis(500));
        assert!((camera.position.z - 3.75).abs() < 1e-4);
    }

    #[test]
    fn q_and_e_move_vertically() {
        let mut camera = start_camera();
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let mut controller = CameraController::new(2.0, 0.1);

        controller.handle_key(KeyCode::KeyQ, ElementState::Pressed);
        controller.update(&mut camera, &mut projection, Duration::from_secs(1));
        assert!((camera.position.y - 5.0).abs() < 1e-4);

        controller.handle_key(KeyCode::KeyQ, ElementState::Released);
        controller.handle_key(KeyCode::KeyE, ElementState::Pressed);
        controller.update(&mut camera, &mut projection, Duration::from_millis(500));
        assert!((camera.position.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut controller = CameraController::new(2.5, 0.1);
        assert!(!controller.handle_key(KeyCode::KeyP, ElementState::Pressed));
        assert!(!controller.handle_key(KeyCode::Escape, ElementState::Pressed));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = start_camera();
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let mut controller = CameraController::new(2.5, 0.1);

        // Mouse moves up by a lot: 5000 px * 0.1 deg = 500 deg of pitch requested.
        controller.handle_mouse(0.0, -5000.0);
        controller.update(&mut camera, &mut projection, Duration::from_millis(16));
        assert!((Deg::from(camera.pitch).0 - 89.0).abs() < 1e-3);

        controller.handle_mouse(0.0, 10000.0);
        controller.update(&mut camera, &mut projection, Duration::from_millis(16));
        assert!((Deg::from(camera.pitch).0 + 89.0).abs() < 1e-3);
    }

    #[test]
    fn mouse_right_turns_right() {
        let mut camera = start_camera();
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let mut controller = CameraController::new(2.5, 0.1);

        controller.handle_mouse(900.0, 0.0);
        controller.update(&mut camera, &mut projection, Duration::from_millis(16));
        // yaw -90 + 90 = 0 looks along +X
        assert!((camera.front() - Vector3::unit_x()).magnitude() < 1e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        projection.zoom(10.0);
        assert!((Deg::from(projection.fovy()).0 - 35.0).abs() < 1e-4);
        projection.zoom(100.0);
        assert!((Deg::from(projection.fovy()).0 - 1.0).abs() < 1e-4);
        projection.zoom(-100.0);
        assert!((Deg::from(projection.fovy()).0 - 45.0).abs() < 1e-4);
    }

    #[test]
    fn scroll_feeds_zoom_on_update() {
        let mut camera = start_camera();
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let mut controller = CameraController::new(2.5, 0.1);

        controller.handle_scroll(&MouseScrollDelta::LineDelta(0.0, 5.0));
        controller.update(&mut camera, &mut projection, Duration::from_millis(16));
        assert!((Deg::from(projection.fovy()).0 - 40.0).abs() < 1e-4);
    }

    #[test]
    fn toggling_switches_projection() {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let perspective = projection.calc_matrix();
        projection.toggle_mode();
        assert_eq!(projection.mode(), ProjectionMode::Orthographic);
        // orthographic keeps w = 1
        let ortho = projection.calc_matrix();
        assert_eq!(ortho.w.w, 1.0);
        assert_ne!(ortho, perspective);
        projection.toggle_mode();
        assert_eq!(projection.mode(), ProjectionMode::Perspective);
        assert_eq!(projection.calc_matrix(), perspective);
    }

    #[test]
    fn orthographic_view_spans_five_units_up_and_aspect_across() {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        projection.toggle_mode();
        let half_width = 5.0 * 800.0 / 600.0;
        let m = projection.calc_matrix();

        let corner = m * cgmath::Vector4::new(half_width, 5.0, -50.0, 1.0);
        assert!((corner.x / corner.w - 1.0).abs() < 1e-5);
        assert!((corner.y / corner.w - 1.0).abs() < 1e-5);
        let opposite = m * cgmath::Vector4::new(-half_width, -5.0, -50.0, 1.0);
        assert!((opposite.x / opposite.w + 1.0).abs() < 1e-5);
        assert!((opposite.y / opposite.w + 1.0).abs() < 1e-5);

        // depth maps into wgpu's 0..1 range
        let near = m * cgmath::Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = m * cgmath::Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn resize_updates_the_aspect() {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let before = projection.calc_matrix();
        assert!((before.y.y / before.x.x - 800.0 / 600.0).abs() < 1e-5);

        projection.resize(1600, 600);
        let after = projection.calc_matrix();
        assert!((after.y.y / after.x.x - 1600.0 / 600.0).abs() < 1e-5);
        assert!((after.y.y - before.y.y).abs() < 1e-6);

        projection.toggle_mode();
        let ortho = projection.calc_matrix();
        let edge = ortho * cgmath::Vector4::new(5.0 * 1600.0 / 600.0, 0.0, -1.0, 1.0);
        assert!((edge.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn uniform_carries_camera_position() {
        let camera = start_camera();
        let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, &projection);
        assert_eq!(uniform.view_position, [1.0, 3.0, 5.0, 1.0]);
    }
}
