use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use super::source_type::SourceType;

/// One candidate annotation of a feature or spot.
///
/// Values are immutable once scored and shared between the flat result list
/// and the source-specific views of a container through `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsScanMatchResult {
    /// Reference name
    pub name: String,
    /// Reference InChIKey
    pub inchikey: String,
    /// Reference id inside its library (-1 when unannotated)
    pub library_id: i64,
    /// Reference id inside the library ordered by precursor m/z
    pub library_id_when_ordered: i64,
    /// Combined score used to rank candidates of the same source
    pub total_score: f32,
    /// Weighted dot product
    pub weighted_dot_product: f32,
    /// Simple dot product
    pub simple_dot_product: f32,
    /// Reverse dot product
    pub reverse_dot_product: f32,
    /// Fraction of reference peaks matched
    pub matched_peaks_percentage: f32,
    /// Precursor mass similarity
    pub acurate_mass_similarity: f32,
    /// Retention time similarity
    pub rt_similarity: f32,
    /// Precursor m/z within tolerance
    pub is_precursor_mz_match: bool,
    /// Spectrum similarity above cutoff
    pub is_spectrum_match: bool,
    /// Origin flags
    pub source: SourceType,
    /// Id of the annotator that scored this result
    pub annotator_id: String,
    /// Priority of that annotator (lower runs first)
    pub priority: i32,
}

impl Default for MsScanMatchResult {
    fn default() -> Self {
        Self {
            name: String::new(),
            inchikey: String::new(),
            library_id: -1,
            library_id_when_ordered: -1,
            total_score: 0.0,
            weighted_dot_product: 0.0,
            simple_dot_product: 0.0,
            reverse_dot_product: 0.0,
            matched_peaks_percentage: 0.0,
            acurate_mass_similarity: 0.0,
            rt_similarity: 0.0,
            is_precursor_mz_match: false,
            is_spectrum_match: false,
            source: SourceType::UNKNOWN,
            annotator_id: String::new(),
            priority: 0,
        }
    }
}

impl MsScanMatchResult {
    /// Result for `library_id` from `source` scored `total_score`
    pub fn new(library_id: i64, source: SourceType, total_score: f32) -> Self {
        Self {
            library_id,
            source,
            total_score,
            ..Self::default()
        }
    }

    /// The shared "no annotation" result.
    ///
    /// Every call returns the same allocation, so it can be recognised with
    /// `Arc::ptr_eq`.
    pub fn unknown_result() -> Arc<MsScanMatchResult> {
        static UNKNOWN: OnceLock<Arc<MsScanMatchResult>> = OnceLock::new();
        UNKNOWN
            .get_or_init(|| Arc::new(MsScanMatchResult::default()))
            .clone()
    }

    /// Whether this is the unannotated placeholder value
    pub fn is_unknown(&self) -> bool {
        self.source.is_unknown() && self.library_id < 0
    }

    /// Whether a curator set or changed this result
    pub fn is_manually_modified(&self) -> bool {
        self.source.contains(SourceType::MANUAL)
    }
}
