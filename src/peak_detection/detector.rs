use serde::{Deserialize, Serialize};

use crate::chromatogram::{smooth, Chromatogram, SmoothingParameter};

use super::result::{ExcludedMass, PeakDetectionResult};

/// Lower bound of the noise estimate, keeps S/N finite on clean traces
const MINIMUM_NOISE_LEVEL: f64 = 1.0;

/// Configuration for [`PeakDetector`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakDetectionParameter {
    /// Smoothing applied before detection
    pub smoothing: SmoothingParameter,
    /// Minimum number of chromatogram points a peak must span
    pub minimum_datapoints: usize,
    /// Minimum apex height above the lower edge
    pub minimum_amplitude: f64,
    /// Mass windows whose peaks are discarded
    pub excluded_masses: Vec<ExcludedMass>,
}

impl Default for PeakDetectionParameter {
    fn default() -> Self {
        Self {
            smoothing: SmoothingParameter::default(),
            minimum_datapoints: 5,
            minimum_amplitude: 1000.0,
            excluded_masses: Vec::new(),
        }
    }
}

/// Smoothing + detection + exclusion over one chromatogram.
///
/// Stateless: one detector can be shared by any number of threads.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    parameter: PeakDetectionParameter,
}

impl PeakDetector {
    /// Create a detector
    pub fn new(parameter: PeakDetectionParameter) -> Self {
        Self { parameter }
    }

    /// Detector configuration
    pub fn parameter(&self) -> &PeakDetectionParameter {
        &self.parameter
    }

    /// Smooth `chromatogram`, detect peaks and drop invalid or excluded ones.
    ///
    /// Returns the smoothed chromatogram the result positions refer to.
    pub fn detect(&self, chromatogram: &Chromatogram) -> (Chromatogram, Vec<PeakDetectionResult>) {
        let smoothed = smooth(chromatogram, &self.parameter.smoothing);
        let results = detect_peaks(
            &smoothed,
            self.parameter.minimum_datapoints,
            self.parameter.minimum_amplitude,
        );
        let results = exclude_masses(results, &self.parameter.excluded_masses)
            .into_iter()
            .filter(PeakDetectionResult::is_valid)
            .collect();
        (smoothed, results)
    }
}

/// Remove results whose apex mass falls inside an excluded window
pub fn exclude_masses(
    results: Vec<PeakDetectionResult>,
    excluded: &[ExcludedMass],
) -> Vec<PeakDetectionResult> {
    if excluded.is_empty() {
        return results;
    }
    results
        .into_iter()
        .filter(|r| !excluded.iter().any(|e| e.contains(r.mass)))
        .collect()
}

/// Median of the non-zero absolute first differences, floored at 1.0
pub fn estimate_noise(intensities: &[f64]) -> f64 {
    let mut diffs: Vec<f64> = intensities
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .filter(|d| *d > 0.0)
        .collect();
    if diffs.is_empty() {
        return MINIMUM_NOISE_LEVEL;
    }
    diffs.sort_by(|a, b| a.total_cmp(b));
    let mid = diffs.len() / 2;
    let median = if diffs.len() % 2 == 0 {
        (diffs[mid - 1] + diffs[mid]) / 2.0
    } else {
        diffs[mid]
    };
    median.max(MINIMUM_NOISE_LEVEL)
}

/// Valley-to-valley peak detection.
///
/// The trace is walked once: a peak starts where the intensity rises, its
/// apex is the end of the ascent and its right edge is the end of the
/// following descent. Consecutive peaks share their separating valley point
/// but never overlap otherwise. Peaks narrower than `min_data_points` or whose
/// apex rises less than `min_amplitude` above the lower edge are dropped.
pub fn detect_peaks(
    chromatogram: &Chromatogram,
    min_data_points: usize,
    min_amplitude: f64,
) -> Vec<PeakDetectionResult> {
    let points = chromatogram.peaks();
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let intensities = chromatogram.intensities();
    let noise = estimate_noise(&intensities);

    let mut results = Vec::new();
    let mut i = 0;
    while i + 1 < n {
        if intensities[i + 1] <= intensities[i] {
            i += 1;
            continue;
        }
        let left = i;
        let mut top = i;
        while top + 1 < n && intensities[top + 1] >= intensities[top] {
            top += 1;
        }
        let mut right = top;
        while right + 1 < n && intensities[right + 1] <= intensities[right] {
            right += 1;
        }
        i = right;

        if right - left + 1 < min_data_points.max(1) {
            continue;
        }
        let amplitude = intensities[top] - intensities[left].min(intensities[right]);
        if amplitude < min_amplitude {
            continue;
        }
        results.push(describe_peak(chromatogram, results.len(), left, top, right, noise));
    }
    results
}

fn describe_peak(
    chromatogram: &Chromatogram,
    peak_id: usize,
    left: usize,
    top: usize,
    right: usize,
    noise: f64,
) -> PeakDetectionResult {
    let points = chromatogram.peaks();
    let (l, t, r) = (&points[left], &points[top], &points[right]);

    let area_above_zero: f64 = points[left..=right]
        .windows(2)
        .map(|w| (w[1].time - w[0].time) * (w[0].intensity + w[1].intensity) / 2.0)
        .sum();
    let baseline_area = (r.time - l.time) * (l.intensity + r.intensity) / 2.0;
    let baseline_at_top = if r.time > l.time {
        l.intensity + (r.intensity - l.intensity) * (t.time - l.time) / (r.time - l.time)
    } else {
        l.intensity.min(r.intensity)
    };
    let height_above_baseline = (t.intensity - baseline_at_top).max(0.0);

    PeakDetectionResult {
        peak_id,
        scan_num_at_left: left,
        scan_num_at_top: top,
        scan_num_at_right: right,
        chrom_x_at_left: l.time,
        chrom_x_at_top: t.time,
        chrom_x_at_right: r.time,
        intensity_at_left: l.intensity,
        intensity_at_top: t.intensity,
        intensity_at_right: r.intensity,
        mass: t.mass,
        area_above_zero,
        area_above_baseline: (area_above_zero - baseline_area).max(0.0),
        height_above_baseline,
        estimated_noise: noise,
        signal_to_noise: height_above_baseline / noise,
        peak_width: r.time - l.time,
    }
}
