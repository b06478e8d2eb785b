//! Tunables for building and animating a ribbon sketch.

use serde::Deserialize;

use crate::geom::{CurveGeneratorOptions, CurveType, OffsetMode, RibbonBuildOptions};

use super::animation::TIME_STEP;

/// Every knob of the sketch, with the values the ribbon was designed around
/// as defaults. Missing fields deserialize to their default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RibbonOptions {
    /// Random control points around the unit sphere.
    pub control_points: usize,
    pub tension: f64,
    pub curve_type: CurveType,
    /// Quads along the ribbon.
    pub segments: usize,
    /// Signed offsets of the two ribbon edges along the binormal.
    pub half_widths: [f64; 2],
    pub offset_mode: OffsetMode,
    /// Animation clock increment per frame.
    pub time_step: f64,
    /// Divisions of the debug curve line.
    pub preview_points: usize,
    /// Initial horizontal texture offset.
    pub texture_offset: f64,
    /// Seed for reproducible curves; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for RibbonOptions {
    fn default() -> Self {
        let curve = CurveGeneratorOptions::default();
        Self {
            control_points: curve.control_points,
            tension: curve.tension,
            curve_type: curve.curve_type,
            segments: 1000,
            half_widths: [-0.1, 0.1],
            offset_mode: OffsetMode::Direct,
            time_step: TIME_STEP,
            preview_points: 50,
            texture_offset: 0.5,
            seed: None,
        }
    }
}

impl RibbonOptions {
    #[must_use]
    pub fn generator_options(&self) -> CurveGeneratorOptions {
        CurveGeneratorOptions {
            control_points: self.control_points,
            curve_type: self.curve_type,
            tension: self.tension,
        }
    }

    #[must_use]
    pub fn build_options(&self) -> RibbonBuildOptions {
        RibbonBuildOptions {
            offset_mode: self.offset_mode,
        }
    }
}
