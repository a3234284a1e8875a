use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::chromatogram::RawSpectraIndex;
use crate::peak_detection::{PeakDetectionParameter, PeakDetector};

use super::builder::{FeatureBuilder, DEFAULT_MS2_TOLERANCE};
use super::types::ChromatogramPeakFeature;

/// Configuration of one peak-picking run over a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakPickParameter {
    /// Lowest slice centre (m/z)
    pub mass_range_begin: f64,
    /// Highest slice centre (m/z)
    pub mass_range_end: f64,
    /// Slice step; each slice is extracted with half this width as tolerance
    pub mass_slice_width: f64,
    /// Start of the axis range; the first scan when unset
    pub axis_range_begin: Option<f64>,
    /// End of the axis range; the last scan when unset
    pub axis_range_end: Option<f64>,
    /// Precursor tolerance for linking MS2 scans
    pub ms2_tolerance: f64,
    /// Smoothing and detection thresholds
    pub detection: PeakDetectionParameter,
}

impl Default for PeakPickParameter {
    fn default() -> Self {
        Self {
            mass_range_begin: 100.0,
            mass_range_end: 1500.0,
            mass_slice_width: 0.1,
            axis_range_begin: None,
            axis_range_end: None,
            ms2_tolerance: DEFAULT_MS2_TOLERANCE,
            detection: PeakDetectionParameter::default(),
        }
    }
}

impl PeakPickParameter {
    /// Centres of all mass slices, ascending
    pub fn slice_centres(&self) -> Vec<f64> {
        if self.mass_slice_width.is_nan()
            || self.mass_slice_width <= 0.0
            || self.mass_range_end < self.mass_range_begin
        {
            return Vec::new();
        }
        // Epsilon absorbs the rounding of ranges that are exact multiples of the step
        let steps = (self.mass_range_end - self.mass_range_begin) / self.mass_slice_width;
        let count = (steps + 1e-9).floor() as usize + 1;
        (0..count)
            .map(|k| self.mass_range_begin + k as f64 * self.mass_slice_width)
            .collect()
    }
}

/// Per-file peak picking: mass slicing, detection and feature building
#[derive(Debug, Clone, Default)]
pub struct PeakSpotting {
    parameter: PeakPickParameter,
}

impl PeakSpotting {
    /// Create a spotter
    pub fn new(parameter: PeakPickParameter) -> Self {
        Self { parameter }
    }

    /// Spotting configuration
    pub fn parameter(&self) -> &PeakPickParameter {
        &self.parameter
    }

    /// Pick all features of the file behind `index`.
    ///
    /// Slices are processed in parallel. A peak seen by two neighbouring
    /// slices (same apex scan, masses closer than one slice width) is kept
    /// once, with its highest apex. The result is ordered by mass, then by
    /// apex axis value, and renumbered from zero.
    pub fn run(&self, index: &RawSpectraIndex) -> Vec<ChromatogramPeakFeature> {
        let Some((first, last)) = index.axis_range() else {
            return Vec::new();
        };
        let start = self.parameter.axis_range_begin.unwrap_or(first);
        let end = self.parameter.axis_range_end.unwrap_or(last);
        let tolerance = self.parameter.mass_slice_width / 2.0;
        let detector = PeakDetector::new(self.parameter.detection.clone());
        let builder = FeatureBuilder::new(index).with_ms2_tolerance(self.parameter.ms2_tolerance);

        let centres = self.parameter.slice_centres();
        info!(
            "Spotting {} mass slices over [{start}, {end}] on {} scans",
            centres.len(),
            index.len()
        );

        let candidates: Vec<ChromatogramPeakFeature> = centres
            .into_par_iter()
            .flat_map_iter(|centre| {
                let chromatogram = index.extracted_ion_chromatogram(centre, tolerance, start, end);
                let (smoothed, results) = detector.detect(&chromatogram);
                builder.build(&results, &smoothed)
            })
            .collect();

        let candidate_count = candidates.len();
        let mut features = collapse_slice_duplicates(candidates, self.parameter.mass_slice_width);
        debug!(
            "Collapsed {} slice candidates into {} features",
            candidate_count,
            features.len()
        );

        features.sort_by(|a, b| {
            a.mass
                .total_cmp(&b.mass)
                .then_with(|| a.chrom_x_top.value.total_cmp(&b.chrom_x_top.value))
        });
        for (peak_id, feature) in features.iter_mut().enumerate() {
            feature.peak_id = peak_id;
        }
        features
    }
}

/// Keep the highest of features sharing an apex scan within `mass_width`
pub(super) fn collapse_slice_duplicates(
    mut candidates: Vec<ChromatogramPeakFeature>,
    mass_width: f64,
) -> Vec<ChromatogramPeakFeature> {
    candidates.sort_by(|a, b| {
        a.ms1_raw_spectrum_id_top
            .cmp(&b.ms1_raw_spectrum_id_top)
            .then_with(|| b.peak_height_top.total_cmp(&a.peak_height_top))
            .then_with(|| a.mass.total_cmp(&b.mass))
    });

    let mut kept: Vec<ChromatogramPeakFeature> = Vec::with_capacity(candidates.len());
    let mut group_start = 0;
    for candidate in candidates {
        if kept
            .get(group_start)
            .map_or(true, |f| f.ms1_raw_spectrum_id_top != candidate.ms1_raw_spectrum_id_top)
        {
            group_start = kept.len();
        }
        let redundant = kept[group_start..]
            .iter()
            .any(|f| (f.mass - candidate.mass).abs() < mass_width);
        if !redundant {
            kept.push(candidate);
        }
    }
    kept
}
