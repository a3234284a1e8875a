use log::debug;

use crate::chromatogram::{Chromatogram, RawSpectraIndex};
use crate::peak_detection::PeakDetectionResult;
use crate::spectrum::ChromX;

use super::types::ChromatogramPeakFeature;

/// Default precursor tolerance used to link MS2 scans to features
pub const DEFAULT_MS2_TOLERANCE: f64 = 0.025;

/// Turns peak-detection results into per-file features.
///
/// Raw spectrum ids and axis values are resolved through the index the
/// chromatogram was extracted from. Features are independent: the builder
/// never merges or deduplicates them.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder<'a> {
    index: &'a RawSpectraIndex,
    ms2_tolerance: f64,
}

impl<'a> FeatureBuilder<'a> {
    /// Builder over `index` with the default MS2 tolerance
    pub fn new(index: &'a RawSpectraIndex) -> Self {
        Self {
            index,
            ms2_tolerance: DEFAULT_MS2_TOLERANCE,
        }
    }

    /// Set the precursor tolerance for MS2 linking
    pub fn with_ms2_tolerance(mut self, tolerance: f64) -> Self {
        self.ms2_tolerance = tolerance;
        self
    }

    /// Build one feature per result.
    ///
    /// `chromatogram` must be the (smoothed) chromatogram the results were
    /// detected on. Results pointing outside it are skipped.
    pub fn build(
        &self,
        results: &[PeakDetectionResult],
        chromatogram: &Chromatogram,
    ) -> Vec<ChromatogramPeakFeature> {
        results
            .iter()
            .filter_map(|result| {
                let feature = self.build_one(result, chromatogram);
                if feature.is_none() {
                    debug!(
                        "Skipping peak {} outside chromatogram of {} points",
                        result.peak_id,
                        chromatogram.len()
                    );
                }
                feature
            })
            .collect()
    }

    fn build_one(
        &self,
        result: &PeakDetectionResult,
        chromatogram: &Chromatogram,
    ) -> Option<ChromatogramPeakFeature> {
        let left = chromatogram.get(result.scan_num_at_left)?;
        let top = chromatogram.get(result.scan_num_at_top)?;
        let right = chromatogram.get(result.scan_num_at_right)?;

        let axis = self.index.axis();
        let unit = self.index.unit();
        let chrom_x = |id: usize, fallback: f64| {
            ChromX::new(self.index.axis_value_of(id).unwrap_or(fallback), axis, unit)
        };
        let chrom_x_left = chrom_x(left.id, left.time);
        let chrom_x_top = chrom_x(top.id, top.time);
        let chrom_x_right = chrom_x(right.id, right.time);

        let mass = top.mass;
        let ms2_raw_spectrum_id = self.index.find_ms2_spectrum(
            mass,
            self.ms2_tolerance,
            chrom_x_left.value,
            chrom_x_right.value,
            chrom_x_top.value,
        );

        Some(ChromatogramPeakFeature {
            peak_id: result.peak_id,
            ion_mode: self.index.ion_mode(),
            mass,
            chrom_x_left,
            chrom_x_top,
            chrom_x_right,
            chrom_scan_id_left: result.scan_num_at_left,
            chrom_scan_id_top: result.scan_num_at_top,
            chrom_scan_id_right: result.scan_num_at_right,
            ms1_raw_spectrum_id_left: left.id,
            ms1_raw_spectrum_id_top: top.id,
            ms1_raw_spectrum_id_right: right.id,
            ms2_raw_spectrum_id,
            peak_height_left: result.intensity_at_left,
            peak_height_top: result.intensity_at_top,
            peak_height_right: result.intensity_at_right,
            peak_area_above_zero: result.area_above_zero,
            peak_area_above_baseline: result.area_above_baseline,
            peak_height_above_baseline: result.height_above_baseline,
            peak_width: result.peak_width,
            signal_to_noise: result.signal_to_noise,
            estimated_noise: result.estimated_noise,
            ..ChromatogramPeakFeature::default()
        })
    }
}
