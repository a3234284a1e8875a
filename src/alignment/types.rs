use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feature::{ChromatogramPeakFeature, MoleculeProperty};
use crate::matching::MsScanMatchResultContainer;
use crate::spectrum::ChromX;

/// Role of an analysis file in the study design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnalysisFileType {
    /// Biological sample
    #[default]
    Sample,
    /// Procedural blank
    Blank,
    /// Pooled quality control
    QC,
    /// Authentic standard
    Standard,
}

/// One analysis file of an alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFileBean {
    /// Position of the file in the alignment
    pub file_id: usize,
    /// Display name
    pub file_name: String,
    /// Study role
    #[serde(default)]
    pub file_type: AnalysisFileType,
}

impl AnalysisFileBean {
    /// Create a file entry
    pub fn new(file_id: usize, file_name: impl Into<String>, file_type: AnalysisFileType) -> Self {
        Self {
            file_id,
            file_name: file_name.into(),
            file_type,
        }
    }
}

/// Read-only lookup from file id to file type
#[derive(Debug, Clone, Default)]
pub struct FileTypeMap {
    types: HashMap<usize, AnalysisFileType>,
}

impl FileTypeMap {
    /// Build the map from file entries
    pub fn from_files(files: &[AnalysisFileBean]) -> Self {
        Self {
            types: files.iter().map(|f| (f.file_id, f.file_type)).collect(),
        }
    }

    /// Type of `file_id`, if known
    pub fn get(&self, file_id: usize) -> Option<AnalysisFileType> {
        self.types.get(&file_id).copied()
    }

    /// Number of files of a type
    pub fn count(&self, file_type: AnalysisFileType) -> usize {
        self.types.values().filter(|t| **t == file_type).count()
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no file is known
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Non-destructive filter flags of a spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFilterStatus {
    /// Failed blank filtering but kept for checking
    pub is_blank_filtered: bool,
}

impl FeatureFilterStatus {
    /// Whether any filter flagged the spot
    pub fn is_filtered(&self) -> bool {
        self.is_blank_filtered
    }
}

/// Kind of relation between two spots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeakLinkType {
    /// 13C isotope partner
    Isotope,
    /// Different adduct of the same compound
    Adduct,
    /// Same feature seen twice
    SameFeature,
}

/// Directed relation to another spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeakLink {
    /// Alignment id of the linked spot
    pub linked_id: usize,
    /// Kind of relation
    pub link_type: PeakLinkType,
}

/// Per-file slot of a spot; a zero height marks a file without a detected peak
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentChromPeakFeature {
    /// File the feature belongs to
    pub file_id: usize,
    /// Display name of the file
    pub file_name: String,
    /// Feature id inside the file, -1 for gap-filled slots
    pub peak_id: i64,
    /// Apex m/z
    pub mass: f64,
    /// Axis value at the left edge
    pub chrom_x_left: ChromX,
    /// Axis value at the apex
    pub chrom_x_top: ChromX,
    /// Axis value at the right edge
    pub chrom_x_right: ChromX,
    /// Apex intensity
    pub peak_height_top: f64,
    /// Area above zero
    pub peak_area_above_zero: f64,
    /// Axis width
    pub peak_width: f64,
    /// Signal-to-noise ratio
    pub signal_to_noise: f64,
    /// Raw spectrum index of the apex
    pub ms1_raw_spectrum_id_top: usize,
    /// Linked MS2 scan
    pub ms2_raw_spectrum_id: Option<usize>,
}

impl AlignmentChromPeakFeature {
    /// Slot for a feature detected in `file_id`
    pub fn from_feature(
        file_id: usize,
        file_name: impl Into<String>,
        feature: &ChromatogramPeakFeature,
    ) -> Self {
        Self {
            file_id,
            file_name: file_name.into(),
            peak_id: feature.peak_id as i64,
            mass: feature.mass,
            chrom_x_left: feature.chrom_x_left,
            chrom_x_top: feature.chrom_x_top,
            chrom_x_right: feature.chrom_x_right,
            peak_height_top: feature.peak_height_top,
            peak_area_above_zero: feature.peak_area_above_zero,
            peak_width: feature.peak_width,
            signal_to_noise: feature.signal_to_noise,
            ms1_raw_spectrum_id_top: feature.ms1_raw_spectrum_id_top,
            ms2_raw_spectrum_id: feature.ms2_raw_spectrum_id,
        }
    }

    /// Empty slot for a file without a detected peak
    pub fn missing(file_id: usize, file_name: impl Into<String>) -> Self {
        Self {
            file_id,
            file_name: file_name.into(),
            peak_id: -1,
            ..Self::default()
        }
    }

    /// Whether a peak was detected in this file
    pub fn is_detected(&self) -> bool {
        self.peak_height_top > 0.0
    }
}

/// One row of the aligned feature table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentSpotProperty {
    /// Sequential id in the table
    pub alignment_id: usize,
    /// Id across drift and parent spots
    pub master_alignment_id: usize,
    /// File the representative spectrum comes from
    pub representative_file_id: usize,
    /// Centre m/z
    pub mass_center: f64,
    /// Centre axis value
    pub time_center: ChromX,
    /// One slot per analysis file
    pub alignment_chrom_peak_features: Vec<AlignmentChromPeakFeature>,

    /// Average detected height
    pub height_average: f64,
    /// Lowest detected height
    pub height_min: f64,
    /// Highest detected height
    pub height_max: f64,
    /// Average detected peak width
    pub peak_width_average: f64,
    /// Narrowest detected peak
    pub peak_width_min: f64,
    /// Widest detected peak
    pub peak_width_max: f64,
    /// Average signal-to-noise ratio
    pub signal_to_noise_average: f64,
    /// Lowest signal-to-noise ratio
    pub signal_to_noise_min: f64,
    /// Highest signal-to-noise ratio
    pub signal_to_noise_max: f64,

    /// Assigned compound identity
    pub molecule: MoleculeProperty,
    /// Annotation candidates
    pub match_results: MsScanMatchResultContainer,
    /// Filter flags
    pub feature_filter_status: FeatureFilterStatus,

    /// Links to related spots
    pub peak_links: Vec<PeakLink>,
    /// 0 for a monoisotopic spot, n for its M+n isotope
    pub isotope_weight_number: u32,
    /// Alignment id of the monoisotopic parent
    pub isotope_parent_id: Option<usize>,
    /// Drift-time sub-spots of an ion-mobility alignment
    pub alignment_drift_spot_features: Vec<AlignmentSpotProperty>,
}

impl AlignmentSpotProperty {
    /// Assigned compound name
    pub fn name(&self) -> &str {
        &self.molecule.name
    }

    /// Library id of the best MSP-based result, -1 if none
    pub fn msp_id(&self) -> i64 {
        self.match_results.msp_id()
    }

    /// Library id of the best text-library result, -1 if none
    pub fn text_db_id(&self) -> i64 {
        self.match_results.text_db_id()
    }

    /// Add a link unless it is already present
    pub fn add_link(&mut self, link: PeakLink) {
        if !self.peak_links.contains(&link) {
            self.peak_links.push(link);
        }
    }

    /// Recompute height, width and S/N statistics over detected files.
    ///
    /// All statistics are zero when no file detected the spot.
    pub fn update_statistics(&mut self) {
        let detected: Vec<&AlignmentChromPeakFeature> = self
            .alignment_chrom_peak_features
            .iter()
            .filter(|f| f.is_detected())
            .collect();
        let heights = summarize(detected.iter().map(|f| f.peak_height_top));
        let widths = summarize(detected.iter().map(|f| f.peak_width));
        let sn = summarize(detected.iter().map(|f| f.signal_to_noise));
        (self.height_average, self.height_min, self.height_max) = heights;
        (self.peak_width_average, self.peak_width_min, self.peak_width_max) = widths;
        (self.signal_to_noise_average, self.signal_to_noise_min, self.signal_to_noise_max) = sn;

        for drift in &mut self.alignment_drift_spot_features {
            drift.update_statistics();
        }
    }
}

/// (average, min, max); zeros for an empty input
fn summarize(values: impl Iterator<Item = f64>) -> (f64, f64, f64) {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }
    if count == 0 {
        (0.0, 0.0, 0.0)
    } else {
        (sum / count as f64, min, max)
    }
}
