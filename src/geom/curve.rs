use serde::Deserialize;

use super::core::{Point3, Vec3};

/// Number of chord segments used to tabulate arc length along a curve.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

/// Parameter step for finite-difference tangents.
const TANGENT_DELTA: f64 = 1e-4;

/// Knot distances below this are treated as coincident control points.
const MIN_KNOT_SPACING: f64 = 1e-4;

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = TANGENT_DELTA * span;
        let t0 = (t - h).max(a);
        let t1 = (t + h).min(b);
        if t1 == t0 {
            return Vec3::ZERO;
        }

        let p0 = self.point_at(t0);
        let p1 = self.point_at(t1);
        p1.sub_point(p0).mul_scalar(1.0 / (t1 - t0))
    }

    /// Returns the unit tangent vector at parameter `t`.
    /// Returns `None` if the derivative is zero or degenerate.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec3> {
        self.derivative_at(t).normalized()
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("closed curve requires at least {min} control points, got {count}")]
    TooFewControlPoints { count: usize, min: usize },
    #[error("generated curves support at most {max} control points, got {count}")]
    TooManyControlPoints { count: usize, max: usize },
    #[error("control points must be finite")]
    NonFiniteControlPoint,
    #[error("tension must be finite")]
    NonFiniteTension,
}

/// Parameterization used between Catmull-Rom knots.
///
/// `Centripetal` and `Chordal` space knots by a power of the chord length;
/// `CatmullRom` is the uniform variant and is the only one that honours
/// the curve's tension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    #[default]
    Centripetal,
    Chordal,
    CatmullRom,
}

impl CurveType {
    const fn knot_exponent(self) -> f64 {
        match self {
            Self::Chordal => 0.5,
            Self::Centripetal | Self::CatmullRom => 0.25,
        }
    }
}

/// A Catmull-Rom spline through 3D control points.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve3 {
    points: Vec<Point3>,
    closed: bool,
    curve_type: CurveType,
    tension: f64,
    arc_lengths: Vec<ArcLengthEntry>,
}

impl CatmullRomCurve3 {
    pub fn new(
        points: Vec<Point3>,
        closed: bool,
        curve_type: CurveType,
        tension: f64,
    ) -> Result<Self, CurveError> {
        let min = if closed { 3 } else { 2 };
        if points.len() < min {
            return Err(CurveError::TooFewControlPoints {
                count: points.len(),
                min,
            });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CurveError::NonFiniteControlPoint);
        }
        if !tension.is_finite() {
            return Err(CurveError::NonFiniteTension);
        }

        let mut curve = Self {
            points,
            closed,
            curve_type,
            tension,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = build_arc_length_table(&curve, ARC_LENGTH_DIVISIONS);
        Ok(curve)
    }

    #[must_use]
    pub fn control_points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub const fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    #[must_use]
    pub const fn tension(&self) -> f64 {
        self.tension
    }

    /// Total arc length estimated from the chord table.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.arc_lengths.last().map_or(0.0, |e| e.arc_length)
    }

    /// Maps a fraction of total arc length in `[0, 1]` to a curve parameter.
    #[must_use]
    pub fn parameter_at_fraction(&self, u: f64) -> f64 {
        let (t0, t1) = self.domain();
        parameter_at_arc_length(&self.arc_lengths, t0, t1, u * self.length())
    }

    /// Point at a fraction `u` of the total arc length.
    #[must_use]
    pub fn point_at_fraction(&self, u: f64) -> Point3 {
        self.point_at(self.parameter_at_fraction(u))
    }

    /// `divisions + 1` points at uniform parameter steps.
    #[must_use]
    pub fn points(&self, divisions: usize) -> Vec<Point3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point_at(d as f64 / divisions as f64))
            .collect()
    }

    /// `divisions + 1` points at uniform arc-length steps.
    #[must_use]
    pub fn spaced_points(&self, divisions: usize) -> Vec<Point3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point_at_fraction(d as f64 / divisions as f64))
            .collect()
    }

    fn segment_points(&self, t: f64) -> ([Point3; 4], f64) {
        let points = &self.points;
        let l = points.len();
        let span = if self.closed { l } else { l - 1 };
        let p = span as f64 * t.clamp(0.0, 1.0);
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f64;

        if self.closed {
            if int_point == 0 {
                int_point = l;
            }
        } else if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }

        let p0 = if self.closed || int_point > 0 {
            points[(int_point + l - 1) % l]
        } else {
            points[0].add_vec(points[0].sub_point(points[1]))
        };
        let p1 = points[int_point % l];
        let p2 = points[(int_point + 1) % l];
        let p3 = if self.closed || int_point + 2 < l {
            points[(int_point + 2) % l]
        } else {
            points[l - 1].add_vec(points[l - 1].sub_point(points[l - 2]))
        };

        ([p0, p1, p2, p3], weight)
    }
}

impl Curve3 for CatmullRomCurve3 {
    fn point_at(&self, t: f64) -> Point3 {
        let ([p0, p1, p2, p3], weight) = self.segment_points(t);

        let (px, py, pz) = match self.curve_type {
            CurveType::CatmullRom => (
                CubicPoly::catmull_rom(p0.x, p1.x, p2.x, p3.x, self.tension),
                CubicPoly::catmull_rom(p0.y, p1.y, p2.y, p3.y, self.tension),
                CubicPoly::catmull_rom(p0.z, p1.z, p2.z, p3.z, self.tension),
            ),
            kind => {
                let pow = kind.knot_exponent();
                let mut dt0 = p0.sub_point(p1).length_squared().powf(pow);
                let mut dt1 = p1.sub_point(p2).length_squared().powf(pow);
                let mut dt2 = p2.sub_point(p3).length_squared().powf(pow);

                if dt1 < MIN_KNOT_SPACING {
                    dt1 = 1.0;
                }
                if dt0 < MIN_KNOT_SPACING {
                    dt0 = dt1;
                }
                if dt2 < MIN_KNOT_SPACING {
                    dt2 = dt1;
                }

                let dt = [dt0, dt1, dt2];
                (
                    CubicPoly::nonuniform_catmull_rom([p0.x, p1.x, p2.x, p3.x], dt),
                    CubicPoly::nonuniform_catmull_rom([p0.y, p1.y, p2.y, p3.y], dt),
                    CubicPoly::nonuniform_catmull_rom([p0.z, p1.z, p2.z, p3.z], dt),
                )
            }
        };

        Point3::new(px.calc(weight), py.calc(weight), pz.calc(weight))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        if !self.closed {
            let (a, b) = self.domain();
            let t0 = (t - TANGENT_DELTA).max(a);
            let t1 = (t + TANGENT_DELTA).min(b);
            return self
                .point_at(t1)
                .sub_point(self.point_at(t0))
                .mul_scalar(1.0 / (t1 - t0));
        }

        // Closed curves wrap so that t = 0 and t = 1 see the same neighbourhood.
        let t0 = (t - TANGENT_DELTA).rem_euclid(1.0);
        let t1 = (t + TANGENT_DELTA).rem_euclid(1.0);
        self.point_at(t1)
            .sub_point(self.point_at(t0))
            .mul_scalar(0.5 / TANGENT_DELTA)
    }
}

#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
}

impl CubicPoly {
    /// Hermite cubic through `x0`, `x1` with end slopes `t0`, `t1`.
    fn hermite(x0: f64, x1: f64, t0: f64, t1: f64) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn catmull_rom(x0: f64, x1: f64, x2: f64, x3: f64, tension: f64) -> Self {
        Self::hermite(x1, x2, tension * (x2 - x0), tension * (x3 - x1))
    }

    fn nonuniform_catmull_rom(x: [f64; 4], dt: [f64; 3]) -> Self {
        let [x0, x1, x2, x3] = x;
        let [dt0, dt1, dt2] = dt;
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    fn calc(self, t: f64) -> f64 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

// ============================================================================
// Arc-Length Table Helpers
// ============================================================================

/// An entry in the arc-length lookup table.
#[derive(Debug, Clone, Copy)]
struct ArcLengthEntry {
    parameter: f64,
    arc_length: f64,
}

fn build_arc_length_table<C: Curve3>(curve: &C, divisions: usize) -> Vec<ArcLengthEntry> {
    let divisions = divisions.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;

    let mut table = Vec::with_capacity(divisions + 1);
    let mut prev = curve.point_at(t0);
    let mut cumulative = 0.0;

    table.push(ArcLengthEntry {
        parameter: t0,
        arc_length: 0.0,
    });

    for i in 1..=divisions {
        let t = t0 + span * (i as f64 / divisions as f64);
        let curr = curve.point_at(t);
        cumulative += curr.sub_point(prev).length();
        table.push(ArcLengthEntry {
            parameter: t,
            arc_length: cumulative,
        });
        prev = curr;
    }

    table
}

/// Finds the parameter value corresponding to a target arc length.
fn parameter_at_arc_length(
    table: &[ArcLengthEntry],
    t0: f64,
    t1: f64,
    target_length: f64,
) -> f64 {
    if table.len() < 2 {
        return t0;
    }

    let total = table.last().map_or(0.0, |e| e.arc_length);
    if target_length <= 0.0 || !total.is_finite() || total <= 0.0 {
        return t0;
    }
    if target_length >= total {
        return t1;
    }

    let idx = table
        .binary_search_by(|entry| entry.arc_length.total_cmp(&target_length))
        .unwrap_or_else(|i| i.saturating_sub(1));

    let idx = idx.min(table.len() - 2);
    let e0 = &table[idx];
    let e1 = &table[idx + 1];

    let segment_length = e1.arc_length - e0.arc_length;
    if segment_length.abs() < 1e-14 {
        return e0.parameter;
    }

    let ratio = (target_length - e0.arc_length) / segment_length;
    e0.parameter + (e1.parameter - e0.parameter) * ratio.clamp(0.0, 1.0)
}
