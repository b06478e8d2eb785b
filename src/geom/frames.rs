//! Rotation-minimizing frames along a sampled curve.
//!
//! Samples are taken at uniform arc-length steps. The first frame is seeded
//! from the world axis least aligned with the initial tangent; every following
//! frame is the previous one rotated onto the new tangent (parallel
//! transport), so the binormal never flips between neighbouring samples.
//!
//! On closed curves transport alone leaves a residual twist between the first
//! and the last frame. That angle is spread linearly over all samples, which
//! makes frame `k` coincide with frame `0` and lets a ribbon close without a
//! visible kink.

use super::core::{Point3, Tolerance, Vec3};
use super::curve::{CatmullRomCurve3, Curve3};

/// Largest segment count [`sample_curve_frames`] accepts.
pub const MAX_SEGMENTS: usize = 1 << 20;

/// Frame data at one curve sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFrame {
    /// Unit vector pointing along the curve direction.
    pub tangent: Vec3,
    /// Unit vector perpendicular to the tangent.
    pub normal: Vec3,
    /// `tangent × normal`; the ribbon's width direction.
    pub binormal: Vec3,
}

impl CurveFrame {
    /// Seeds a frame from the world axis on which `tangent` has its smallest
    /// component. Ties resolve towards Z, then Y.
    #[must_use]
    pub fn seed(tangent: Vec3) -> Option<Self> {
        let tangent = tangent.normalized()?;
        let (tx, ty, tz) = (tangent.x.abs(), tangent.y.abs(), tangent.z.abs());

        let mut min = f64::MAX;
        let mut axis = Vec3::X;
        if tx <= min {
            min = tx;
            axis = Vec3::X;
        }
        if ty <= min {
            min = ty;
            axis = Vec3::Y;
        }
        if tz <= min {
            axis = Vec3::Z;
        }

        let side = tangent.cross(axis).normalized()?;
        let normal = tangent.cross(side);
        let binormal = tangent.cross(normal);
        Some(Self {
            tangent,
            normal,
            binormal,
        })
    }

    /// Rotates this frame so its tangent becomes `tangent`, minimizing twist.
    #[must_use]
    pub fn transported(self, tangent: Vec3) -> Self {
        let axis = self.tangent.cross(tangent);
        let normal = if axis.length() > Tolerance::TRANSPORT.eps {
            let angle = self.tangent.dot(tangent).clamp(-1.0, 1.0).acos();
            // `axis` is non-zero so normalization cannot fail here.
            let axis = axis.normalized().unwrap_or(Vec3::Z);
            self.normal.rotated_about(axis, angle)
        } else {
            self.normal
        };
        Self::from_tangent_normal(tangent, normal).unwrap_or(Self {
            tangent,
            ..self
        })
    }

    /// Rotates the normal and binormal around the tangent by `angle`.
    #[must_use]
    pub fn twisted(self, angle: f64) -> Self {
        let normal = self.normal.rotated_about(self.tangent, angle);
        Self::from_tangent_normal(self.tangent, normal).unwrap_or(self)
    }

    /// Builds an orthonormal frame, projecting `normal` off the tangent.
    fn from_tangent_normal(tangent: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normal
            .sub(tangent.mul_scalar(tangent.dot(normal)))
            .normalized()?;
        Some(Self {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        })
    }

    /// Worst deviation from an orthonormal basis.
    #[must_use]
    pub fn orthonormality_error(&self) -> f64 {
        [
            (self.tangent.length() - 1.0).abs(),
            (self.normal.length() - 1.0).abs(),
            (self.binormal.length() - 1.0).abs(),
            self.tangent.dot(self.normal).abs(),
            self.tangent.dot(self.binormal).abs(),
            self.normal.dot(self.binormal).abs(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("frame sampling requires at least 1 segment")]
    InvalidSegmentCount,
    #[error("frame sampling supports at most {max} segments, got {segments}")]
    TooManySegments { segments: usize, max: usize },
    #[error("curve tangent is degenerate at sample {index}")]
    DegenerateTangent { index: usize },
}

/// Positions and frames at `segments + 1` arc-length samples of a curve.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    pub positions: Vec<Point3>,
    pub frames: Vec<CurveFrame>,
    pub closed: bool,
}

impl SampledCurve {
    /// Number of segments between samples (`positions.len() - 1`).
    #[must_use]
    pub fn segments(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// Worst orthonormality error across all frames.
    #[must_use]
    pub fn max_orthonormality_error(&self) -> f64 {
        self.frames
            .iter()
            .map(CurveFrame::orthonormality_error)
            .fold(0.0, f64::max)
    }
}

/// Samples `segments + 1` evenly spaced positions along `curve` and a
/// transported frame at each.
///
/// For closed curves the last position is the first one again.
pub fn sample_curve_frames(
    curve: &CatmullRomCurve3,
    segments: usize,
) -> Result<SampledCurve, FrameError> {
    if segments == 0 {
        return Err(FrameError::InvalidSegmentCount);
    }
    if segments > MAX_SEGMENTS {
        return Err(FrameError::TooManySegments {
            segments,
            max: MAX_SEGMENTS,
        });
    }

    let mut positions = Vec::with_capacity(segments + 1);
    let mut tangents = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let u = i as f64 / segments as f64;
        let t = curve.parameter_at_fraction(u);
        positions.push(curve.point_at(t));
        let tangent = curve
            .tangent_at(t)
            .ok_or(FrameError::DegenerateTangent { index: i })?;
        tangents.push(tangent);
    }

    let frames = transport_frames(&tangents, curve.is_closed())?;
    Ok(SampledCurve {
        positions,
        frames,
        closed: curve.is_closed(),
    })
}

/// Parallel-transports a frame along a tangent sequence.
///
/// With `closed` set, the twist between the first and last frame is
/// distributed over the sequence so both ends agree.
pub fn transport_frames(tangents: &[Vec3], closed: bool) -> Result<Vec<CurveFrame>, FrameError> {
    let Some(&first) = tangents.first() else {
        return Err(FrameError::InvalidSegmentCount);
    };

    let seed = CurveFrame::seed(first).ok_or(FrameError::DegenerateTangent { index: 0 })?;
    let mut frames = Vec::with_capacity(tangents.len());
    frames.push(seed);

    for (index, tangent) in tangents.iter().enumerate().skip(1) {
        let tangent = tangent
            .normalized()
            .ok_or(FrameError::DegenerateTangent { index })?;
        let prev = frames[index - 1];
        frames.push(prev.transported(tangent));
    }

    let segments = frames.len() - 1;
    if closed && segments > 0 {
        let first = frames[0];
        let last = frames[segments];
        let mut theta = first.normal.dot(last.normal).clamp(-1.0, 1.0).acos() / segments as f64;
        if first.tangent.dot(first.normal.cross(last.normal)) > 0.0 {
            theta = -theta;
        }
        if theta != 0.0 {
            for (i, frame) in frames.iter_mut().enumerate().skip(1) {
                *frame = frame.twisted(theta * i as f64);
            }
        }
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn circle_tangents(count: usize) -> Vec<Vec3> {
        (0..=count)
            .map(|i| {
                let a = i as f64 / count as f64 * TAU;
                Vec3::new(-a.sin(), a.cos(), 0.0)
            })
            .collect()
    }

    #[test]
    fn seed_frame_is_orthonormal() {
        for t in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, 3.0)] {
            let frame = CurveFrame::seed(t).unwrap();
            assert!(frame.orthonormality_error() < 1e-12);
        }
        assert!(CurveFrame::seed(Vec3::ZERO).is_none());
    }

    #[test]
    fn planar_circle_keeps_normal_on_axis() {
        let frames = transport_frames(&circle_tangents(64), true).unwrap();
        let n0 = frames[0].normal;
        assert!(n0.z.abs() > 0.999_999);
        for frame in &frames {
            // No twist: the normal stays parallel to the circle's axis and the
            // binormal stays in the circle's plane.
            assert!(frame.normal.dot(n0) > 0.999_999);
            assert!(frame.binormal.z.abs() < 1e-6);
            assert!(frame.orthonormality_error() < 1e-9);
        }
    }

    #[test]
    fn straight_line_does_not_rotate() {
        let tangents = vec![Vec3::X; 10];
        let frames = transport_frames(&tangents, false).unwrap();
        for frame in &frames {
            assert_eq!(frame.normal, frames[0].normal);
        }
    }

    #[test]
    fn rejects_zero_tangent() {
        let tangents = vec![Vec3::X, Vec3::ZERO, Vec3::X];
        assert_eq!(
            transport_frames(&tangents, false),
            Err(FrameError::DegenerateTangent { index: 1 })
        );
        assert_eq!(transport_frames(&[], false), Err(FrameError::InvalidSegmentCount));
    }

    #[test]
    fn rejects_oversized_segment_count() {
        let points = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(-1.0, 0.0, 0.0),
        ];
        let curve = CatmullRomCurve3::new(points, true, Default::default(), 0.5).unwrap();
        for segments in [MAX_SEGMENTS + 1, usize::MAX] {
            assert_eq!(
                sample_curve_frames(&curve, segments),
                Err(FrameError::TooManySegments {
                    segments,
                    max: MAX_SEGMENTS
                })
            );
        }
    }
}
