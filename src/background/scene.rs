//! Background camera, light and point cloud motion
//!
//! Everything here is a function of elapsed time plus an eased camera, so the
//! renderer only has to read the current matrices each frame.

use glam::{Mat4, Vec2, Vec3};

use super::field::hex_to_linear;

/// Fixed scene parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_start: Vec3,
    /// How far the camera may drift for a pointer at the element edge (x2)
    pub parallax_range: f32,
    /// Fraction of the remaining distance covered each frame
    pub smoothing: f32,
    pub spin_speed: f32,
    pub wobble_speed: f32,
    pub wobble_amount: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub fog_color: Vec3,
    pub fog_density: f32,
    pub light_color: Vec3,
    pub light_intensity: f32,
    pub light_range: f32,
    pub light_start: Vec3,
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            camera_start: Vec3::new(0.0, 0.0, 8.0),
            parallax_range: 1.2,
            smoothing: 0.03,
            spin_speed: 0.03,
            wobble_speed: 0.2,
            wobble_amount: 0.05,
            point_size: 0.06,
            opacity: 0.9,
            fog_color: hex_to_linear(0x001a10),
            fog_density: 0.08,
            light_color: hex_to_linear(0x22c55e),
            light_intensity: 1.4,
            light_range: 40.0,
            light_start: Vec3::new(5.0, 3.0, 6.0),
            ambient_color: hex_to_linear(0x0ea5a4),
            ambient_intensity: 0.15,
        }
    }
}

/// Light orbit position at `t` seconds. Depth stays where it started.
pub fn light_position(t: f32, depth: f32) -> Vec3 {
    Vec3::new((t * 0.7).sin() * 6.0, (t * 0.6).cos() * 4.0, depth)
}

/// Live state of the background scene
#[derive(Debug, Clone)]
pub struct BackgroundScene {
    pub params: SceneParams,
    pub camera: Vec3,
    /// Normalized pointer offset, each axis in about [-0.5, 0.5]
    pub pointer: Vec2,
    /// Point cloud rotation (x, y) in radians
    pub rotation: Vec2,
    pub light: Vec3,
    pub aspect: f32,
    pub parallax: bool,
    pub spin: bool,
}

impl BackgroundScene {
    pub fn new(params: SceneParams) -> Self {
        Self {
            camera: params.camera_start,
            pointer: Vec2::ZERO,
            rotation: Vec2::ZERO,
            light: params.light_start,
            aspect: 1.0,
            parallax: true,
            spin: true,
            params,
        }
    }

    pub fn set_pointer(&mut self, offset: Vec2) {
        self.pointer = offset;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Where the camera is heading for the current pointer
    pub fn camera_target(&self) -> Vec2 {
        if !self.parallax {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.pointer.x * self.params.parallax_range,
            -self.pointer.y * self.params.parallax_range,
        )
    }

    /// Advance to `t` seconds after mount. Called once per frame.
    pub fn update(&mut self, t: f32) {
        let p = &self.params;
        if self.spin {
            self.rotation = Vec2::new((t * p.wobble_speed).sin() * p.wobble_amount, t * p.spin_speed);
        }

        let target = self.camera_target();
        self.camera.x += (target.x - self.camera.x) * p.smoothing;
        self.camera.y += (target.y - self.camera.y) * p.smoothing;

        self.light = light_position(t, p.light_start.z);
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.params.fov_y_degrees.to_radians(),
            self.aspect,
            self.params.near,
            self.params.far,
        )
    }

    /// Camera always looks at the origin
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera, Vec3::ZERO, Vec3::Y)
    }

    /// Point cloud transform
    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation.x) * Mat4::from_rotation_y(self.rotation.y)
    }
}

impl Default for BackgroundScene {
    fn default() -> Self {
        Self::new(SceneParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_pointer_keeps_camera_centered() {
        let mut scene = BackgroundScene::default();
        for frame in 0..120 {
            scene.update(frame as f32 / 60.0);
        }
        assert_eq!(scene.camera, Vec3::new(0.0, 0.0, 8.0));
    }

    #[test]
    fn test_camera_eases_toward_target() {
        let mut scene = BackgroundScene::default();
        scene.set_pointer(Vec2::new(0.5, -0.5));
        let target = scene.camera_target();
        assert_eq!(target, Vec2::new(0.6, 0.6));

        scene.update(0.0);
        // First step covers 3% of the distance
        assert!((scene.camera.x - 0.018).abs() < 1e-6);

        let mut last_gap = (target.x - scene.camera.x).abs();
        for frame in 1..300 {
            scene.update(frame as f32 / 60.0);
            let gap = (target.x - scene.camera.x).abs();
            assert!(gap < last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-3);
        assert_eq!(scene.camera.z, 8.0);
    }

    #[test]
    fn test_reduced_motion_disables_parallax() {
        let mut scene = BackgroundScene::default();
        scene.parallax = false;
        scene.spin = false;
        scene.set_pointer(Vec2::new(0.5, 0.5));
        scene.update(10.0);
        assert_eq!(scene.camera, Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(scene.rotation, Vec2::ZERO);
    }

    #[test]
    fn test_rotation_is_function_of_time() {
        let mut a = BackgroundScene::default();
        let mut b = BackgroundScene::default();
        a.update(3.0);
        b.update(1.0);
        b.update(3.0);
        assert_eq!(a.rotation, b.rotation);
        assert!((a.rotation.y - 0.09).abs() < 1e-6);
        assert!((a.rotation.x - (0.6f32).sin() * 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_light_orbit() {
        let p = light_position(0.0, 6.0);
        assert_eq!(p, Vec3::new(0.0, 4.0, 6.0));
        let q = light_position(100.0, 6.0);
        assert!(q.x.abs() <= 6.0 && q.y.abs() <= 4.0);
    }

    #[test]
    fn test_viewport_aspect() {
        let mut scene = BackgroundScene::default();
        scene.set_viewport(1600, 900);
        assert!((scene.aspect - 16.0 / 9.0).abs() < 1e-6);
        // Zero-height resize keeps the last aspect
        scene.set_viewport(1600, 0);
        assert!((scene.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let mut scene = BackgroundScene::default();
        scene.set_viewport(800, 600);
        scene.update(2.0);
        let clip = scene.projection() * scene.view() * scene.model() * glam::Vec4::W;
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
