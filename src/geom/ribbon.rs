//! Two-sided ribbon meshes along a sampled closed curve.
//!
//! The ribbon is a `(k + 1) × 2` vertex grid: row 0 is the curve offset by the
//! first half-width along each sample's binormal, row 1 by the second. `k`
//! quads run along the curve and one across it. Both rows are stitched at the
//! seam by copying the last vertex of each row onto its first, so the loop
//! closes bit-exactly regardless of floating-point drift in sampling.
//!
//! Two [`MaterialGroup`]s cover the same index range. A renderer draws the
//! buffer twice, once per group, with opposite face culling and a different
//! texture each time.

use serde::Deserialize;

use super::core::{Point3, Vec3};
use super::diagnostics::RibbonDiagnostics;
use super::frames::{CurveFrame, SampledCurve};
use super::triangulation::{grid_index_count, triangulate_grid};
use super::Tolerance;

/// Vertex rows across the ribbon, one per half-width.
pub const RIBBON_ROWS: usize = 2;

/// How the binormal offset is applied to each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetMode {
    /// `position + w · binormal`, computed fresh for every sample.
    #[default]
    Direct,
    /// `shift = (shift + binormal) · w`, carried from sample to sample and
    /// reset for each half-width. Produces a slightly wider, smoothed edge.
    Accumulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RibbonBuildOptions {
    pub offset_mode: OffsetMode,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum RibbonError {
    #[error("ribbon requires at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[error("sample count mismatch: {positions} positions, {frames} frames")]
    SampleCountMismatch { positions: usize, frames: usize },
    #[error("half-widths must be finite")]
    InvalidHalfWidth,
    #[error("ribbon grid holds {expected} vertices but {actual} were given")]
    CapacityMismatch { expected: usize, actual: usize },
    #[error("ribbon with {segments} segments cannot be indexed with u32")]
    IndexOverflow { segments: usize },
}

/// A contiguous index range drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialGroup {
    /// First index in the index buffer.
    pub start: usize,
    /// Number of indices.
    pub count: usize,
    /// Index into the ribbon's material pair.
    pub material_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RibbonMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub uvs: Vec<[f64; 2]>,
    pub groups: Vec<MaterialGroup>,
    segments: usize,
}

impl RibbonMesh {
    /// Number of quads along the curve.
    #[must_use]
    pub const fn segments(&self) -> usize {
        self.segments
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices of one offset row (`0` or `1`).
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[[f64; 3]]> {
        let width = self.segments + 1;
        let start = row.checked_mul(width)?;
        self.positions.get(start..start + width)
    }

    /// Returns the position buffer flattened to `[x0, y0, z0, x1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.positions.iter().flatten().copied().collect()
    }

    /// Returns the UV buffer flattened to `[u0, v0, u1, v1, ...]`.
    #[must_use]
    pub fn uvs_flat(&self) -> Vec<f64> {
        self.uvs.iter().flatten().copied().collect()
    }

    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err("ribbon indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self
            .positions
            .iter()
            .any(|p| !p.iter().all(|c| c.is_finite()))
        {
            return Err("ribbon has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("ribbon has out-of-bounds vertex indices".to_string());
        }
        if self.uvs.len() != self.positions.len() {
            return Err("ribbon uv buffer does not match vertex count".to_string());
        }
        if self
            .groups
            .iter()
            .any(|g| g.start + g.count > self.indices.len())
        {
            return Err("ribbon material group exceeds index buffer".to_string());
        }
        Ok(())
    }
}

/// Offsets every sample along its binormal, one row per half-width.
///
/// Returns `RIBBON_ROWS * positions.len()` vertices, row by row.
#[must_use]
pub fn offset_rows(
    positions: &[Point3],
    frames: &[CurveFrame],
    half_widths: [f64; RIBBON_ROWS],
    mode: OffsetMode,
) -> Vec<Point3> {
    let mut vertices = Vec::with_capacity(positions.len() * RIBBON_ROWS);
    for width in half_widths {
        match mode {
            OffsetMode::Direct => {
                vertices.extend(
                    positions
                        .iter()
                        .zip(frames)
                        .map(|(p, frame)| p.add_vec(frame.binormal.mul_scalar(width))),
                );
            }
            OffsetMode::Accumulated => {
                let mut shift = Vec3::ZERO;
                for (p, frame) in positions.iter().zip(frames) {
                    shift = shift.add(frame.binormal).mul_scalar(width);
                    vertices.push(p.add_vec(shift));
                }
            }
        }
    }
    vertices
}

/// Vertex count of a ribbon grid with `segments` quads along the curve.
///
/// Fails if the grid cannot be addressed with `u32` indices.
pub fn ribbon_capacity(segments: usize) -> Result<usize, RibbonError> {
    segments
        .checked_add(1)
        .and_then(|width| width.checked_mul(RIBBON_ROWS))
        .filter(|&capacity| u32::try_from(capacity).is_ok())
        .ok_or(RibbonError::IndexOverflow { segments })
}

/// Copies the last vertex of each row onto the row's first vertex.
///
/// `vertices` must hold exactly one grid of `segments` quads. Returns the
/// largest distance a vertex moved.
pub fn stitch_seam(vertices: &mut [Point3], segments: usize) -> Result<f64, RibbonError> {
    let expected = ribbon_capacity(segments)?;
    if vertices.len() != expected {
        return Err(RibbonError::CapacityMismatch {
            expected,
            actual: vertices.len(),
        });
    }

    let width = segments + 1;
    let mut drift: f64 = 0.0;
    for row in 0..RIBBON_ROWS {
        let first = row * width;
        let last = first + segments;
        drift = drift.max(vertices[first].distance_to(vertices[last]));
        vertices[first] = vertices[last];
    }
    Ok(drift)
}

/// Builds the ribbon mesh for a sampled curve.
pub fn build_ribbon(
    sampled: &SampledCurve,
    half_widths: [f64; RIBBON_ROWS],
    options: RibbonBuildOptions,
) -> Result<(RibbonMesh, RibbonDiagnostics), RibbonError> {
    let positions = &sampled.positions;
    let frames = &sampled.frames;
    if positions.len() != frames.len() {
        return Err(RibbonError::SampleCountMismatch {
            positions: positions.len(),
            frames: frames.len(),
        });
    }
    if positions.len() < 2 {
        return Err(RibbonError::TooFewSamples(positions.len()));
    }
    if half_widths.iter().any(|w| !w.is_finite()) {
        return Err(RibbonError::InvalidHalfWidth);
    }

    let segments = positions.len() - 1;
    let row_width = segments + 1;
    let capacity = ribbon_capacity(segments)?;

    let mut vertices = offset_rows(positions, frames, half_widths, options.offset_mode);
    let seam_drift = stitch_seam(&mut vertices, segments)?;

    let mut uvs = Vec::with_capacity(capacity);
    for row in 0..RIBBON_ROWS {
        let v = 1.0 - row as f64 / (RIBBON_ROWS - 1) as f64;
        uvs.extend((0..row_width).map(|i| [i as f64 / segments as f64, v]));
    }

    let indices = triangulate_grid(row_width, RIBBON_ROWS);
    let index_count = grid_index_count(row_width, RIBBON_ROWS);
    let groups = (0..RIBBON_ROWS)
        .map(|material_index| MaterialGroup {
            start: 0,
            count: index_count,
            material_index,
        })
        .collect();

    let mesh = RibbonMesh {
        positions: vertices.into_iter().map(Point3::to_array).collect(),
        indices,
        uvs,
        groups,
        segments,
    };

    let mut diagnostics = RibbonDiagnostics {
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        seam_drift,
        max_frame_error: sampled.max_orthonormality_error(),
        warnings: Vec::new(),
    };
    if half_widths[0] == half_widths[1] {
        diagnostics.add_warning("half-widths are equal; ribbon has zero width");
    }
    if !diagnostics.frames_are_orthonormal() {
        diagnostics.add_warning(format!(
            "frame orthonormality error {:e} exceeds {:e}",
            diagnostics.max_frame_error,
            Tolerance::FRAME.eps
        ));
    }
    if !sampled.closed {
        diagnostics.add_warning("curve is open; seam stitch joins its two ends");
    }

    log::debug!("built ribbon: {}", diagnostics.summary());
    Ok((mesh, diagnostics))
}
