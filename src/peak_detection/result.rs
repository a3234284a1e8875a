use serde::{Deserialize, Serialize};

/// One chromatographic peak found by the detector.
///
/// Scan positions index into the chromatogram the peak was detected on, and
/// always satisfy `scan_num_at_left <= scan_num_at_top <= scan_num_at_right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PeakDetectionResult {
    /// Sequential id within one detection call
    pub peak_id: usize,
    /// Chromatogram position of the left edge
    pub scan_num_at_left: usize,
    /// Chromatogram position of the apex
    pub scan_num_at_top: usize,
    /// Chromatogram position of the right edge
    pub scan_num_at_right: usize,
    /// Axis value at the left edge
    pub chrom_x_at_left: f64,
    /// Axis value at the apex
    pub chrom_x_at_top: f64,
    /// Axis value at the right edge
    pub chrom_x_at_right: f64,
    /// Intensity at the left edge
    pub intensity_at_left: f64,
    /// Intensity at the apex
    pub intensity_at_top: f64,
    /// Intensity at the right edge
    pub intensity_at_right: f64,
    /// Chromatogram mass recorded at the apex
    pub mass: f64,
    /// Trapezoidal area from zero intensity
    pub area_above_zero: f64,
    /// Trapezoidal area above the straight edge-to-edge baseline
    pub area_above_baseline: f64,
    /// Apex height above the edge-to-edge baseline
    pub height_above_baseline: f64,
    /// Noise level of the whole chromatogram
    pub estimated_noise: f64,
    /// `height_above_baseline / estimated_noise`
    pub signal_to_noise: f64,
    /// Axis width between the edges
    pub peak_width: f64,
}

impl PeakDetectionResult {
    /// A result describes a peak only if its apex intensity is positive
    pub fn is_valid(&self) -> bool {
        self.intensity_at_top > 0.0
    }

    /// Number of chromatogram points spanned by the peak
    pub fn data_points(&self) -> usize {
        self.scan_num_at_right - self.scan_num_at_left + 1
    }
}

/// Mass window whose peaks are discarded after detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcludedMass {
    /// Centre m/z
    pub mass: f64,
    /// Half window in m/z
    pub tolerance: f64,
}

impl ExcludedMass {
    /// Create a new exclusion window
    pub fn new(mass: f64, tolerance: f64) -> Self {
        Self { mass, tolerance }
    }

    /// Whether `mass` lies inside the window (inclusive)
    pub fn contains(&self, mass: f64) -> bool {
        (mass - self.mass).abs() <= self.tolerance
    }
}
