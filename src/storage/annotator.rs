use serde::{Deserialize, Serialize};

use crate::matching::{MatchResultEvaluator, MsScanMatchResult, SourceType};

/// Search thresholds of one annotator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsRefSearchParameter {
    /// Lowest reference precursor m/z searched
    pub mass_range_begin: f64,
    /// Highest reference precursor m/z searched
    pub mass_range_end: f64,
    /// Retention time tolerance (minutes)
    pub rt_tolerance: f64,
    /// Drift time tolerance (milliseconds)
    pub dt_tolerance: f64,
    /// CCS tolerance (percent)
    pub ccs_tolerance: f64,
    /// Precursor m/z tolerance (Da)
    pub ms1_tolerance: f64,
    /// Product ion m/z tolerance (Da)
    pub ms2_tolerance: f64,
    /// Relative intensity cutoff of query peaks
    pub relative_amp_cutoff: f64,
    /// Absolute intensity cutoff of query peaks
    pub absolute_amp_cutoff: f64,
    /// Minimum weighted dot product for a spectrum match
    pub weighted_dot_product_cutoff: f32,
    /// Minimum simple dot product for a spectrum match
    pub simple_dot_product_cutoff: f32,
    /// Minimum reverse dot product for a spectrum match
    pub reverse_dot_product_cutoff: f32,
    /// Minimum fraction of matched reference peaks
    pub matched_peaks_percentage_cutoff: f32,
    /// Minimum number of matched peaks
    pub minimum_spectrum_match: u32,
    /// Minimum total score reported
    pub total_score_cutoff: f32,
    /// Drop candidates outside the retention time tolerance
    pub is_use_time_for_annotation_filtering: bool,
    /// Include retention time similarity in the total score
    pub is_use_time_for_annotation_scoring: bool,
    /// Drop candidates outside the CCS tolerance
    pub is_use_ccs_for_annotation_filtering: bool,
    /// Include CCS similarity in the total score
    pub is_use_ccs_for_annotation_scoring: bool,
}

impl Default for MsRefSearchParameter {
    fn default() -> Self {
        Self {
            mass_range_begin: 0.0,
            mass_range_end: 2000.0,
            rt_tolerance: 100.0,
            dt_tolerance: 100.0,
            ccs_tolerance: 10.0,
            ms1_tolerance: 0.01,
            ms2_tolerance: 0.025,
            relative_amp_cutoff: 0.0,
            absolute_amp_cutoff: 0.0,
            weighted_dot_product_cutoff: 0.6,
            simple_dot_product_cutoff: 0.6,
            reverse_dot_product_cutoff: 0.8,
            matched_peaks_percentage_cutoff: 0.25,
            minimum_spectrum_match: 3,
            total_score_cutoff: 0.8,
            is_use_time_for_annotation_filtering: false,
            is_use_time_for_annotation_scoring: false,
            is_use_ccs_for_annotation_filtering: false,
            is_use_ccs_for_annotation_scoring: false,
        }
    }
}

/// Family of an annotator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotatorKind {
    /// Spectral library search
    MspSearch,
    /// m/z and retention time library search
    TextDbSearch,
    /// Peptide spectrum search
    PeptideSearch,
    /// Search against generated lipid spectra
    LipidSearch,
}

impl AnnotatorKind {
    /// Source flag of results this family produces
    pub fn default_source_type(self) -> SourceType {
        match self {
            Self::MspSearch => SourceType::MSP_DB,
            Self::TextDbSearch => SourceType::TEXT_DB,
            Self::PeptideSearch => SourceType::FASTA_DB,
            Self::LipidSearch => SourceType::GENERATED_LIPID,
        }
    }
}

/// Persisted identity of an annotator.
///
/// The descriptor also judges the results its annotator produced: a spectral
/// annotator calls a result reference matched when precursor and spectrum
/// matched, and suggested when only the precursor matched. A text library
/// annotator has no spectrum to compare, so a precursor match is a reference
/// match and nothing is ever only suggested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatorDescriptor {
    /// Unique annotator id, stamped on every result it produces
    pub id: String,
    /// Annotator family
    pub kind: AnnotatorKind,
    /// Source flag of its results
    pub source_type: SourceType,
    /// Lower runs first
    pub priority: i32,
}

impl AnnotatorDescriptor {
    /// Descriptor using the family's default source flag
    pub fn new(id: impl Into<String>, kind: AnnotatorKind, priority: i32) -> Self {
        Self {
            id: id.into(),
            kind,
            source_type: kind.default_source_type(),
            priority,
        }
    }
}

impl MatchResultEvaluator for AnnotatorDescriptor {
    fn is_reference_matched(&self, result: &MsScanMatchResult) -> bool {
        match self.kind {
            AnnotatorKind::TextDbSearch => result.is_precursor_mz_match,
            _ => result.is_precursor_mz_match && result.is_spectrum_match,
        }
    }

    fn is_annotation_suggested(&self, result: &MsScanMatchResult) -> bool {
        match self.kind {
            AnnotatorKind::TextDbSearch => false,
            _ => result.is_precursor_mz_match && !result.is_spectrum_match,
        }
    }
}

/// An annotator bound to a database together with its search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorParameterPair {
    /// Annotator identity
    pub annotator: AnnotatorDescriptor,
    /// Thresholds it searches with
    pub parameter: MsRefSearchParameter,
}

impl AnnotatorParameterPair {
    /// Pair an annotator with its parameters
    pub fn new(annotator: AnnotatorDescriptor, parameter: MsRefSearchParameter) -> Self {
        Self {
            annotator,
            parameter,
        }
    }

    /// Annotator id
    pub fn id(&self) -> &str {
        &self.annotator.id
    }
}
