//! Orbit camera around the puzzle.
//!
//! The puzzle only needs a projection × view matrix each frame; everything
//! about how pointer input becomes that matrix lives here.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;

/// Degrees of orbit per pixel of pointer movement
const MOUSE_SENSITIVITY: f32 = 0.5;
/// Distance change per scroll line
const ZOOM_SENSITIVITY: f32 = 1.0;
const MAX_PITCH: f32 = 89.0;

/// What the puzzle consumes from a camera.
pub(crate) trait ViewCamera {
    /// Moves the eye towards (positive) or away from the puzzle.
    fn on_zoom(&mut self, delta: f32);
    /// Orbits the eye by a pointer drag of `(dx, dy)` pixels.
    fn on_orbit(&mut self, dx: f32, dy: f32);
    /// Updates the viewport width / height ratio.
    fn set_aspect(&mut self, aspect: f32);
    fn current_view_projection(&self) -> Matrix4<f32>;
}

#[derive(Debug, Clone)]
pub(crate) struct Camera {
    pub(crate) eye: Point3<f32>,
    pub(crate) target: Point3<f32>,
    pub(crate) up: Vector3<f32>,
}

impl Camera {
    pub(crate) fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CameraController {
    pub(crate) distance: f32,
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
    min_distance: f32,
    max_distance: f32,
}

impl CameraController {
    pub(crate) fn new(config: &CameraConfig) -> Self {
        Self {
            distance: config.distance,
            yaw: config.yaw,
            pitch: config.pitch.clamp(-MAX_PITCH, MAX_PITCH),
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        }
    }

    pub(crate) fn update_camera(&self, camera: &mut Camera) {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();

        let x = self.distance * pitch_rad.cos() * yaw_rad.sin();
        let y = self.distance * pitch_rad.sin();
        let z = self.distance * pitch_rad.cos() * yaw_rad.cos();

        camera.eye = Point3::new(x, y, z);
        camera.target = Point3::origin();
        camera.up = Vector3::y();
    }

    pub(crate) fn process_mouse_motion(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * MOUSE_SENSITIVITY;
        self.pitch += delta_y * MOUSE_SENSITIVITY;

        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub(crate) fn process_scroll(&mut self, delta: f32) {
        self.distance -= delta * ZOOM_SENSITIVITY;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Projection {
    pub(crate) aspect: f32,
    /// Vertical field of view in radians
    pub(crate) fovy: f32,
    pub(crate) znear: f32,
    pub(crate) zfar: f32,
}

impl Projection {
    pub(crate) fn build_projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar)
    }
}

/// Camera orbiting the origin at a distance, controlled by drag and scroll.
#[derive(Debug, Clone)]
pub(crate) struct OrbitCamera {
    camera: Camera,
    controller: CameraController,
    projection: Projection,
}

impl OrbitCamera {
    pub(crate) fn new(config: &CameraConfig) -> Self {
        let controller = CameraController::new(config);
        let mut camera = Camera {
            eye: Point3::new(0.0, 0.0, config.distance),
            target: Point3::origin(),
            up: Vector3::y(),
        };
        controller.update_camera(&mut camera);

        let projection = Projection {
            aspect: 800.0 / 600.0,
            fovy: config.fovy.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        };

        Self {
            camera,
            controller,
            projection,
        }
    }

    #[cfg(test)]
    pub(crate) fn eye(&self) -> Point3<f32> {
        self.camera.eye
    }

    #[cfg(test)]
    pub(crate) fn distance(&self) -> f32 {
        self.controller.distance
    }
}

impl ViewCamera for OrbitCamera {
    fn on_zoom(&mut self, delta: f32) {
        self.controller.process_scroll(delta);
        self.controller.update_camera(&mut self.camera);
    }

    fn on_orbit(&mut self, dx: f32, dy: f32) {
        self.controller.process_mouse_motion(dx, dy);
        self.controller.update_camera(&mut self.camera);
    }

    fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.projection.aspect = aspect;
        }
    }

    fn current_view_projection(&self) -> Matrix4<f32> {
        self.projection.build_projection_matrix() * self.camera.build_view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;

    #[test]
    fn default_eye_sits_above_and_to_the_side() {
        let camera = OrbitCamera::new(&CameraConfig::default());
        let eye = camera.eye();
        assert!((eye.coords.norm() - 20.0).abs() < 1e-4);
        assert!(eye.x > 0.0 && eye.y > 0.0 && eye.z > 0.0);
    }

    #[test]
    fn origin_projects_to_viewport_centre() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        camera.on_orbit(37.0, -12.0);
        let clip = camera.current_view_projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let config = CameraConfig::default();
        let mut camera = OrbitCamera::new(&config);
        camera.on_zoom(1000.0);
        assert_eq!(camera.distance(), config.min_distance);
        camera.on_zoom(-1000.0);
        assert_eq!(camera.distance(), config.max_distance);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        camera.on_orbit(0.0, 10_000.0);
        assert_eq!(camera.controller.pitch, MAX_PITCH);
        camera.on_orbit(0.0, -10_000.0);
        assert_eq!(camera.controller.pitch, -MAX_PITCH);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        let before = camera.current_view_projection();
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.current_view_projection(), before);
    }
}
