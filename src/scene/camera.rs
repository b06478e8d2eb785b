//! Camera, lights and renderer settings for the ribbon scene.

use crate::geom::Point3;

/// Host surface size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Width over height, or `1.0` for an empty surface.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1, 1.0)
    }
}

/// Perspective camera looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3,
}

impl Camera {
    pub const FOV: f64 = 70.0;
    pub const NEAR: f64 = 0.01;
    pub const FAR: f64 = 10.0;

    #[must_use]
    pub fn new(aspect: f64) -> Self {
        Self {
            fov: Self::FOV,
            aspect,
            near: Self::NEAR,
            far: Self::FAR,
            position: Point3::new(0.0, 0.0, 2.0),
        }
    }

    /// Updates the aspect ratio. Returns `false` and leaves the camera alone
    /// for a zero-sized viewport.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = f64::from(width) / f64::from(height);
        true
    }

    /// Column-major projection matrix (OpenGL clip space).
    #[must_use]
    pub fn projection_matrix(&self) -> [f64; 16] {
        let top = self.near * (self.fov.to_radians() * 0.5).tan();
        let height = 2.0 * top;
        let width = self.aspect * height;
        let left = -0.5 * width;
        let right = left + width;
        let bottom = top - height;

        let x = 2.0 * self.near / (right - left);
        let y = 2.0 * self.near / (top - bottom);
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(self.far + self.near) / (self.far - self.near);
        let d = -2.0 * self.far * self.near / (self.far - self.near);

        [
            x, 0.0, 0.0, 0.0, //
            0.0, y, 0.0, 0.0, //
            a, b, c, -1.0, //
            0.0, 0.0, d, 0.0,
        ]
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Packed `0xRRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const SCENE: Color = Color(0x00ee_eeee);

    /// Linear channel values in `[0, 1]`.
    #[must_use]
    pub fn to_rgb(self) -> [f64; 3] {
        let channel = |shift: u32| f64::from((self.0 >> shift) & 0xff) / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f64,
    pub position: Point3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Color::SCENE,
                intensity: 0.5,
            },
            directional: DirectionalLight {
                color: Color::SCENE,
                intensity: 0.5,
                position: Point3::new(0.5, 0.0, 0.866),
            },
        }
    }
}

/// Output settings a renderer applies once at setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererSettings {
    pub clear_color: Color,
    pub clear_alpha: f64,
    pub pixel_ratio: f64,
    pub antialias: bool,
}

impl RendererSettings {
    pub const MAX_PIXEL_RATIO: f64 = 2.0;

    /// Settings for a display with the given device pixel ratio, capped at
    /// [`Self::MAX_PIXEL_RATIO`].
    #[must_use]
    pub fn for_device(device_pixel_ratio: f64) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(Self::MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            clear_color: Color::SCENE,
            clear_alpha: 1.0,
            pixel_ratio,
            antialias: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_defaults() {
        let camera = Camera::new(16.0 / 9.0);
        assert_eq!(camera.fov, 70.0);
        assert_eq!(camera.near, 0.01);
        assert_eq!(camera.far, 10.0);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn resize_updates_aspect_only() {
        let mut camera = Camera::default();
        assert!(camera.resize(800, 400));
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.fov, 70.0);

        assert!(!camera.resize(800, 0));
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn projection_matches_field_of_view() {
        let camera = Camera::new(2.0);
        let m = camera.projection_matrix();
        let f = 1.0 / (35.0_f64.to_radians()).tan();
        assert!((m[5] - f).abs() < 1e-12);
        assert!((m[0] - f / 2.0).abs() < 1e-12);
        assert_eq!(m[11], -1.0);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(RendererSettings::for_device(3.0).pixel_ratio, 2.0);
        assert_eq!(RendererSettings::for_device(1.5).pixel_ratio, 1.5);
        assert_eq!(RendererSettings::for_device(f64::NAN).pixel_ratio, 1.0);
    }

    #[test]
    fn scene_color_channels() {
        let [r, g, b] = Color::SCENE.to_rgb();
        assert_eq!(r, 238.0 / 255.0);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn viewport_aspect_handles_empty_surface() {
        assert_eq!(Viewport::new(0, 10, 1.0).aspect(), 1.0);
        assert_eq!(Viewport::new(300, 150, 1.0).aspect(), 2.0);
    }
}
