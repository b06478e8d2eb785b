// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn mul_scalar(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[must_use]
    pub const fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    #[must_use]
    pub const fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    /// Rotates `self` around the unit `axis` by `angle` radians (Rodrigues).
    #[must_use]
    pub fn rotated_about(self, axis: Vec3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        self.mul_scalar(c)
            .add(axis.cross(self).mul_scalar(s))
            .add(axis.mul_scalar(axis.dot(self) * (1.0 - c)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin point (0, 0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point from spherical coordinates with the polar angle `phi` measured
    /// from +Y and the azimuth `theta` measured around Y starting at +Z.
    #[must_use]
    pub fn from_spherical(radius: f64, phi: f64, theta: f64) -> Self {
        let sin_phi_radius = phi.sin() * radius;
        Self::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        )
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub const fn add_vec(self, v: Vec3) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    #[must_use]
    pub const fn sub_point(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.sub_point(other).length()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Thresholds used while sampling frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Orthonormality tolerance guaranteed for sampled frames (1e-5).
    pub const FRAME: Self = Self { eps: 1e-5 };

    /// Minimum rotation axis length for a parallel-transport step.
    pub const TRANSPORT: Self = Self { eps: f64::EPSILON };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_cross_and_difference() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        let p = Point3::new(1.0, 2.0, 3.0);
        let q = p.add_vec(Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(q.sub_point(p), Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(q.distance_to(p), 5.0);
        assert!(Vec3::ZERO.normalized().is_none());
    }

    #[test]
    fn test_rotated_about_quarter_turn() {
        let v = Vec3::X.rotated_about(Vec3::Z, FRAC_PI_2);
        assert!((v.x).abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
        assert!((v.z).abs() < 1e-12);

        // Components along the axis are untouched.
        let w = Vec3::new(0.0, 0.0, 2.0).rotated_about(Vec3::Z, 1.234);
        assert!((w.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_spherical_equator() {
        let p = Point3::from_spherical(1.0, FRAC_PI_2, 0.0);
        assert!((p.x).abs() < 1e-12);
        assert!((p.y).abs() < 1e-12);
        assert!((p.z - 1.0).abs() < 1e-12);

        let q = Point3::from_spherical(1.0, FRAC_PI_2, FRAC_PI_2);
        assert!((q.x - 1.0).abs() < 1e-12);

        let pole = Point3::from_spherical(2.0, PI, 0.3);
        assert!((pole.y + 2.0).abs() < 1e-12);
    }
}
