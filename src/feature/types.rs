use serde::{Deserialize, Serialize};

use crate::matching::MsScanMatchResultContainer;
use crate::spectrum::{ChromX, IonMode};

/// Compound identity assigned to a feature or spot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculeProperty {
    /// Compound name
    pub name: String,
    /// Molecular formula
    pub formula: String,
    /// Compound class
    pub ontology: String,
    /// SMILES
    pub smiles: String,
    /// InChIKey
    pub inchikey: String,
}

impl MoleculeProperty {
    /// Whether no identity is assigned
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.formula.is_empty()
            && self.ontology.is_empty()
            && self.smiles.is_empty()
            && self.inchikey.is_empty()
    }

    /// Reset to the unannotated state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One detected peak within one analysis file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChromatogramPeakFeature {
    /// Sequential id within the file
    pub peak_id: usize,
    /// Ion mode of the file
    pub ion_mode: IonMode,
    /// Apex m/z
    pub mass: f64,

    /// Axis value at the left edge
    pub chrom_x_left: ChromX,
    /// Axis value at the apex
    pub chrom_x_top: ChromX,
    /// Axis value at the right edge
    pub chrom_x_right: ChromX,

    /// Chromatogram position of the left edge
    pub chrom_scan_id_left: usize,
    /// Chromatogram position of the apex
    pub chrom_scan_id_top: usize,
    /// Chromatogram position of the right edge
    pub chrom_scan_id_right: usize,

    /// Raw spectrum index at the left edge
    pub ms1_raw_spectrum_id_left: usize,
    /// Raw spectrum index at the apex
    pub ms1_raw_spectrum_id_top: usize,
    /// Raw spectrum index at the right edge
    pub ms1_raw_spectrum_id_right: usize,
    /// MS2 scan acquired for this feature, closest to the apex
    pub ms2_raw_spectrum_id: Option<usize>,

    /// Intensity at the left edge
    pub peak_height_left: f64,
    /// Intensity at the apex
    pub peak_height_top: f64,
    /// Intensity at the right edge
    pub peak_height_right: f64,
    /// Trapezoid area above zero
    pub peak_area_above_zero: f64,
    /// Trapezoid area above the edge-to-edge baseline
    pub peak_area_above_baseline: f64,
    /// Apex height above the baseline
    pub peak_height_above_baseline: f64,

    /// Axis width between the edges
    pub peak_width: f64,
    /// Signal-to-noise ratio
    pub signal_to_noise: f64,
    /// Noise level of the chromatogram
    pub estimated_noise: f64,

    /// Assigned compound identity
    #[serde(default)]
    pub molecule: MoleculeProperty,
    /// Annotation candidates
    #[serde(default)]
    pub match_results: MsScanMatchResultContainer,
}

impl ChromatogramPeakFeature {
    /// Number of chromatogram points between the edges, inclusive
    pub fn data_points(&self) -> usize {
        self.chrom_scan_id_right - self.chrom_scan_id_left + 1
    }

    /// Whether an MS2 scan was linked to the feature
    pub fn has_ms2(&self) -> bool {
        self.ms2_raw_spectrum_id.is_some()
    }
}
