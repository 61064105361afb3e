use glam::{Mat4, Vec3};

use crate::core::controller::{Button, Controller};
use crate::math::AABB;
use crate::types::CameraUniform;

pub const ORBIT_SPEED: f32 = 0.005;
pub const ZOOM_SPEED: f32 = 0.1;
pub const MIN_DISTANCE: f32 = 1.0;
pub const MAX_DISTANCE: f32 = 500.0;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 2000.0;

/// Orbit camera around a target point, Y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitCamera {
    /// Eye at (0, 0, 5) looking at the origin
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ORBIT_SPEED;
        self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Screen-space drag, scaled so the target follows the cursor roughly
    /// at any distance
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let scale = self.distance * ORBIT_SPEED * 0.5;
        let up = self.right().cross(self.forward());
        self.target += -self.right() * dx * scale + up * dy * scale;
    }

    /// Positive `scroll` moves closer
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * ZOOM_SPEED)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn focus(&mut self, bounds: &AABB) {
        self.target = bounds.center();
        self.distance = (bounds.radius() * 2.5).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Left drag orbits, right drag pans, wheel zooms
    pub fn update(&mut self, controller: &impl Controller, mouse_delta: (f32, f32), scroll: f32) {
        let (dx, dy) = mouse_delta;
        if controller.is_down(Button::MouseLeft) {
            self.orbit(dx, dy);
        } else if controller.is_down(Button::MouseRight) {
            self.pan(dx, dy);
        }
        if scroll != 0.0 {
            self.zoom(scroll);
        }
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y, aspect.max(f32::EPSILON), Z_NEAR, Z_FAR);
        proj * view
    }

    pub fn to_uniform(&self, aspect: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj(aspect).to_cols_array_2d(),
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Held(Vec<Button>);

    impl Controller for Held {
        fn is_down(&self, button: Button) -> bool {
            self.0.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.0
        }
    }

    #[test]
    fn starts_at_z5_facing_origin() {
        let camera = OrbitCamera::new();
        assert!((camera.eye() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::new();
        for _ in 0..100 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.distance, MIN_DISTANCE);
        for _ in 0..200 {
            camera.zoom(-5.0);
        }
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn pitch_never_flips() {
        let mut camera = OrbitCamera::new();
        camera.orbit(0.0, 10_000.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        assert!(camera.forward().is_finite());
    }

    #[test]
    fn drag_needs_a_button() {
        let mut camera = OrbitCamera::new();
        camera.update(&Held(vec![]), (50.0, 0.0), 0.0);
        assert_eq!(camera, OrbitCamera::new());

        camera.update(&Held(vec![Button::MouseLeft]), (50.0, 0.0), 0.0);
        assert!(camera.yaw != 0.0);
        assert_eq!(camera.target, Vec3::ZERO);

        let before = camera.yaw;
        camera.update(&Held(vec![Button::MouseRight]), (50.0, 0.0), 0.0);
        assert_eq!(camera.yaw, before);
        assert!(camera.target != Vec3::ZERO);
    }

    #[test]
    fn focus_frames_bounds() {
        let mut camera = OrbitCamera::new();
        let bounds = AABB::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 2.0, 10.0));
        camera.focus(&bounds);
        assert_eq!(camera.target, Vec3::new(0.0, 1.0, 0.0));
        assert!(camera.distance > 10.0);
    }

    #[test]
    fn projects_target_to_screen_center() {
        let camera = OrbitCamera::new();
        let clip = camera.view_proj(1.5) * camera.target.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
