//! Diagnostics collected while building a ribbon mesh.
//!
//! The builder reports how far the seam vertices had drifted before the
//! explicit stitch copied them into place, and how close the transported
//! frames were to orthonormal. Both numbers should be tiny; large values
//! point at a degenerate curve or a sampling bug.
//!
//! # Example
//!
//! ```ignore
//! let (mesh, diagnostics) = build_ribbon(&sampled, [-0.1, 0.1], RibbonBuildOptions::default())?;
//! log::debug!("{}", diagnostics.summary());
//! ```

use std::fmt;

use super::core::Tolerance;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RibbonDiagnostics {
    /// Total number of vertices in the ribbon mesh.
    pub vertex_count: usize,

    /// Total number of triangles in the ribbon mesh.
    pub triangle_count: usize,

    /// Largest distance a seam vertex moved when it was stitched.
    ///
    /// Closed sampling already puts the seam vertices on top of each other,
    /// so this measures floating-point drift only.
    pub seam_drift: f64,

    /// Worst deviation of any sampled frame from an orthonormal basis.
    pub max_frame_error: f64,

    /// Human-readable warnings about the build.
    pub warnings: Vec<String>,
}

impl RibbonDiagnostics {
    /// Returns `true` if all frames are orthonormal within [`Tolerance::FRAME`].
    #[must_use]
    pub fn frames_are_orthonormal(&self) -> bool {
        self.max_frame_error <= Tolerance::FRAME.eps
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.frames_are_orthonormal() && self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} T:{triangles} seam:{drift} frame:{error}"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];
        parts.push(format!("seam:{:.3e}", self.seam_drift));
        parts.push(format!("frame:{:.3e}", self.max_frame_error));
        if !self.warnings.is_empty() {
            parts.push(format!("warnings:{}", self.warnings.len()));
        }
        parts.join(" ")
    }
}

impl fmt::Display for RibbonDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ribbon Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Seam drift: {:e}", self.seam_drift)?;
        writeln!(f, "  Frame error: {:e}", self.max_frame_error)?;

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        let status = if self.is_clean() { "CLEAN" } else { "ISSUES DETECTED" };
        writeln!(f, "  Status: {status}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clean() {
        let diag = RibbonDiagnostics::default();
        assert!(diag.is_clean());
        assert!(diag.frames_are_orthonormal());
    }

    #[test]
    fn test_large_frame_error_is_reported() {
        let diag = RibbonDiagnostics {
            max_frame_error: 1e-3,
            ..Default::default()
        };
        assert!(!diag.frames_are_orthonormal());
        assert!(format!("{diag}").contains("ISSUES DETECTED"));
    }

    #[test]
    fn test_summary() {
        let mut diag = RibbonDiagnostics {
            vertex_count: 2002,
            triangle_count: 2000,
            ..Default::default()
        };
        diag.add_warning("half-widths are equal");

        let summary = diag.summary();
        assert!(summary.contains("V:2002"));
        assert!(summary.contains("T:2000"));
        assert!(summary.contains("warnings:1"));
        assert!(!diag.is_clean());
    }
}
