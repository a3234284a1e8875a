use std::cmp::Ordering;

use log::{debug, info};

use crate::matching::{MatchResultRefer, MsScanMatchResultContainer};

use super::error::AlignmentError;
use super::parameter::{AlignmentParameter, BlankFiltering, OFF_TARGET_MARKER};
use super::types::{AlignmentSpotProperty, AnalysisFileBean, AnalysisFileType, FileTypeMap};

/// Annotation source a deduplication pass works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationSource {
    /// MSP spectral library results
    Msp,
    /// Text library results
    TextDb,
}

impl AnnotationSource {
    fn library_id(self, spot: &AlignmentSpotProperty) -> i64 {
        match self {
            Self::Msp => spot.msp_id(),
            Self::TextDb => spot.text_db_id(),
        }
    }

    fn top_score(self, spot: &AlignmentSpotProperty) -> f32 {
        let top = match self {
            Self::Msp => spot.match_results.top_msp_result(),
            Self::TextDb => spot.match_results.top_text_db_result(),
        };
        top.map(|r| r.total_score).unwrap_or(f32::NEG_INFINITY)
    }

    fn clear(self, container: &mut MsScanMatchResultContainer) {
        match self {
            Self::Msp => container.clear_msp_results(),
            Self::TextDb => container.clear_text_db_results(),
        }
    }
}

/// Post-processing of aligned spots.
///
/// [`refine`](AlignmentRefiner::refine) always runs the stages in one fixed
/// order: deduplicate, clean, blank filter, link, post-process. Deduplication
/// and blank filtering are shared; the other stages are customization points
/// of the acquisition-specific refiners and default to the identity.
pub trait AlignmentRefiner {
    /// Refinement configuration
    fn parameter(&self) -> &AlignmentParameter;

    /// Analysis files of the alignment, in slot order
    fn files(&self) -> &[AnalysisFileBean];

    /// File id to file type lookup
    fn file_types(&self) -> &FileTypeMap;

    /// Evaluator lookup for annotation levels
    fn refer(&self) -> &dyn MatchResultRefer;

    /// Run all stages
    fn refine(
        &self,
        spots: Vec<AlignmentSpotProperty>,
    ) -> Result<Vec<AlignmentSpotProperty>, AlignmentError> {
        let expected = self.files().len();
        if let Some(spot) = spots
            .iter()
            .find(|s| s.alignment_chrom_peak_features.len() != expected)
        {
            return Err(AlignmentError::FeatureCountMismatch {
                alignment_id: spot.alignment_id,
                expected,
                found: spot.alignment_chrom_peak_features.len(),
            });
        }

        let input = spots.len();
        let spots = self.deduplicate(spots);
        let spots = self.get_cleaned_spots(spots);
        let spots = self.filter_by_blank(spots)?;
        let spots = self.set_links(spots);
        let spots = self.post_process(spots);
        info!("Refined {} aligned spots into {}", input, spots.len());
        Ok(spots)
    }

    /// Keep one annotated spot per library entry, per enabled source
    fn deduplicate(&self, mut spots: Vec<AlignmentSpotProperty>) -> Vec<AlignmentSpotProperty> {
        let parameter = self.parameter();
        if parameter.only_report_top_hit_in_msp_search {
            deduplicate_by(&mut spots, AnnotationSource::Msp);
        }
        if parameter.only_report_top_hit_in_text_db_search {
            deduplicate_by(&mut spots, AnnotationSource::TextDb);
        }
        spots
    }

    /// Merge spots that describe the same signal
    fn get_cleaned_spots(&self, spots: Vec<AlignmentSpotProperty>) -> Vec<AlignmentSpotProperty> {
        spots
    }

    /// Drop or flag spots whose sample signal does not clear the blank
    fn filter_by_blank(
        &self,
        spots: Vec<AlignmentSpotProperty>,
    ) -> Result<Vec<AlignmentSpotProperty>, AlignmentError> {
        let parameter = self.parameter();
        let file_types = self.file_types();
        let blank_count = file_types.count(AnalysisFileType::Blank);
        if !parameter.is_remove_feature_based_on_blank_peak_height_fold_change || blank_count == 0 {
            return Ok(spots);
        }
        if file_types.count(AnalysisFileType::Sample) == 0 {
            return Err(AlignmentError::NoSampleFiles {
                files: file_types.len(),
            });
        }

        let refer = self.refer();
        let mut kept = Vec::with_capacity(spots.len());
        let mut flagged = 0usize;
        let mut dropped = 0usize;
        for mut spot in spots {
            if passes_blank(&spot, file_types, parameter) || is_rescued(&spot, refer, parameter) {
                kept.push(spot);
            } else if parameter.is_keep_removable_features_and_assigned_tag_for_checking {
                spot.feature_filter_status.is_blank_filtered = true;
                flagged += 1;
                kept.push(spot);
            } else {
                dropped += 1;
            }
        }
        debug!("Blank filter flagged {} and dropped {} spots", flagged, dropped);
        Ok(kept)
    }

    /// Establish links between related spots
    fn set_links(&self, spots: Vec<AlignmentSpotProperty>) -> Vec<AlignmentSpotProperty> {
        spots
    }

    /// Final pass after linking
    fn post_process(&self, spots: Vec<AlignmentSpotProperty>) -> Vec<AlignmentSpotProperty> {
        spots
    }
}

/// One deduplication pass over `source`.
///
/// Spots are stably sorted by descending library id; unannotated spots (id
/// below zero) sort last and end the walk. Within a run of equal ids only the
/// spot with the highest score keeps its annotation, the first one on ties.
pub fn deduplicate_by(spots: &mut [AlignmentSpotProperty], source: AnnotationSource) {
    spots.sort_by(|a, b| source.library_id(b).cmp(&source.library_id(a)));

    let mut start = 0;
    while start < spots.len() {
        let id = source.library_id(&spots[start]);
        if id < 0 {
            break;
        }
        let mut end = start + 1;
        while end < spots.len() && source.library_id(&spots[end]) == id {
            end += 1;
        }

        let mut best = start;
        for i in start + 1..end {
            if source.top_score(&spots[i]).total_cmp(&source.top_score(&spots[best]))
                == Ordering::Greater
            {
                best = i;
            }
        }
        for (i, spot) in spots[start..end].iter_mut().enumerate() {
            if start + i != best {
                spot.molecule.clear();
                source.clear(&mut spot.match_results);
            }
        }
        if end - start > 1 {
            debug!(
                "Library entry {} annotated {} spots, kept spot {}",
                id,
                end - start,
                spots[best].alignment_id
            );
        }
        start = end;
    }
}

/// Whether the sample metric reaches the blank threshold
fn passes_blank(
    spot: &AlignmentSpotProperty,
    file_types: &FileTypeMap,
    parameter: &AlignmentParameter,
) -> bool {
    let mut sample_sum = 0.0;
    let mut sample_max = 0.0f64;
    let mut sample_count = 0usize;
    let mut blank_sum = 0.0;
    let mut blank_count = 0usize;
    let mut non_min_value = f64::MAX;

    for feature in &spot.alignment_chrom_peak_features {
        let height = feature.peak_height_top;
        if height > 0.0 && height < non_min_value {
            non_min_value = height;
        }
        match file_types.get(feature.file_id) {
            Some(AnalysisFileType::Sample) => {
                sample_sum += height;
                sample_max = sample_max.max(height);
                sample_count += 1;
            }
            Some(AnalysisFileType::Blank) => {
                blank_sum += height;
                blank_count += 1;
            }
            _ => {}
        }
    }

    let sample_average = if sample_count > 0 {
        sample_sum / sample_count as f64
    } else {
        0.0
    };
    let mut blank_average = if blank_count > 0 {
        blank_sum / blank_count as f64
    } else {
        0.0
    };
    if blank_average == 0.0 {
        blank_average = if non_min_value != f64::MAX {
            non_min_value * 0.1
        } else {
            1.0
        };
    }

    let threshold = blank_average * parameter.fold_change_for_blank_filtering;
    let metric = match parameter.blank_filtering {
        BlankFiltering::SampleMaxOverBlankAverage => sample_max,
        BlankFiltering::SampleAverageOverBlankAverage => sample_average,
    };
    metric >= threshold
}

/// Whether an annotation keeps a blank-filter candidate
fn is_rescued(
    spot: &AlignmentSpotProperty,
    refer: &dyn MatchResultRefer,
    parameter: &AlignmentParameter,
) -> bool {
    let off_target = spot.name().contains(OFF_TARGET_MARKER);
    (parameter.is_keep_ref_matched_metabolite_features
        && !off_target
        && spot.match_results.is_reference_matched(refer))
        || (parameter.is_keep_suggested_metabolite_features
            && off_target
            && spot.match_results.is_annotation_suggested(refer))
}
