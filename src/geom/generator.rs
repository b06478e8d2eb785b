//! Random closed curves on the unit sphere.
//!
//! Control points sit at evenly spaced azimuths around the sphere's equator,
//! each nudged up or down by a random polar offset in `[-0.5, 0.5)` radians.
//! The resulting loop wobbles around the equator without self-intersecting.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use super::core::Point3;
use super::curve::{CatmullRomCurve3, CurveError, CurveType};

/// Smallest control point count that defines a closed loop.
pub const MIN_CONTROL_POINTS: usize = 3;

/// Largest control point count [`control_points`] accepts.
pub const MAX_CONTROL_POINTS: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveGeneratorOptions {
    pub control_points: usize,
    pub curve_type: CurveType,
    pub tension: f64,
}

impl Default for CurveGeneratorOptions {
    fn default() -> Self {
        Self {
            control_points: 7,
            curve_type: CurveType::CatmullRom,
            tension: 0.7,
        }
    }
}

/// Random control points for a closed loop around the unit sphere.
pub fn control_points<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Result<Vec<Point3>, CurveError> {
    if count < MIN_CONTROL_POINTS {
        return Err(CurveError::TooFewControlPoints {
            count,
            min: MIN_CONTROL_POINTS,
        });
    }
    if count > MAX_CONTROL_POINTS {
        return Err(CurveError::TooManyControlPoints {
            count,
            max: MAX_CONTROL_POINTS,
        });
    }

    Ok((0..count)
        .map(|i| {
            let theta = i as f64 / count as f64 * TAU;
            let jitter: f64 = rng.random();
            Point3::from_spherical(1.0, FRAC_PI_2 + (jitter - 0.5), theta)
        })
        .collect())
}

/// Generates a closed Catmull-Rom curve with `count` random control points
/// and the default tension.
pub fn generate_curve<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Result<CatmullRomCurve3, CurveError> {
    generate_curve_with_options(
        CurveGeneratorOptions {
            control_points: count,
            ..CurveGeneratorOptions::default()
        },
        rng,
    )
}

pub fn generate_curve_with_options<R: Rng + ?Sized>(
    options: CurveGeneratorOptions,
    rng: &mut R,
) -> Result<CatmullRomCurve3, CurveError> {
    let points = control_points(options.control_points, rng)?;
    log::debug!(
        "generated {} control points ({:?}, tension {})",
        points.len(),
        options.curve_type,
        options.tension
    );
    CatmullRomCurve3::new(points, true, options.curve_type, options.tension)
}
