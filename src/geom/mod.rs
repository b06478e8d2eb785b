mod core;
mod curve;
mod diagnostics;
mod frames;
mod generator;
mod ribbon;
mod triangulation;

pub use core::{Point3, Tolerance, Vec3};
pub use curve::{ARC_LENGTH_DIVISIONS, CatmullRomCurve3, Curve3, CurveError, CurveType};
pub use diagnostics::RibbonDiagnostics;
pub use frames::{
    CurveFrame, FrameError, MAX_SEGMENTS, SampledCurve, sample_curve_frames, transport_frames,
};
pub use generator::{
    CurveGeneratorOptions, MAX_CONTROL_POINTS, MIN_CONTROL_POINTS, control_points, generate_curve,
    generate_curve_with_options,
};
pub use ribbon::{
    MaterialGroup, OffsetMode, RIBBON_ROWS, RibbonBuildOptions, RibbonError, RibbonMesh,
    build_ribbon, offset_rows, ribbon_capacity, stitch_seam,
};
pub use triangulation::{grid_index_count, triangulate_grid};

#[cfg(test)]
mod tests;
