//! # Alignment Refinement
//!
//! Post-processing of the cross-sample spot table produced by the joiner.
//!
//! [`AlignmentRefiner::refine`] runs, in this order:
//!
//! 1. [`deduplicate`](AlignmentRefiner::deduplicate): one library entry
//!    annotates at most one spot per annotation source.
//! 2. [`get_cleaned_spots`](AlignmentRefiner::get_cleaned_spots): redundant
//!    spots are merged.
//! 3. [`filter_by_blank`](AlignmentRefiner::filter_by_blank): spots whose
//!    sample signal does not clear the blank signal are dropped or flagged.
//! 4. [`set_links`](AlignmentRefiner::set_links): isotope and adduct
//!    relations between spots.
//! 5. [`post_process`](AlignmentRefiner::post_process): statistics and ids.
//!
//! [`LcmsAlignmentRefiner`] is the liquid-chromatography variant.

mod error;
mod lcms;
mod parameter;
mod refiner;
mod types;


pub use error::AlignmentError;
pub use lcms::{LcmsAlignmentRefiner, C13_C12_DIFFERENCE, MAX_ISOTOPE_NUMBER};
pub use parameter::{AlignmentParameter, BlankFiltering, OFF_TARGET_MARKER};
pub use refiner::{deduplicate_by, AlignmentRefiner, AnnotationSource};
pub use types::{
    AlignmentChromPeakFeature, AlignmentSpotProperty, AnalysisFileBean, AnalysisFileType,
    FeatureFilterStatus, FileTypeMap, PeakLink, PeakLinkType,
};
