//! # msalign - LC-MS Feature Picking and Alignment Refinement
//!
//! `msalign` is the processing core of an untargeted LC-MS workflow: it turns
//! raw scans into chromatographic features, refines spots aligned across
//! analysis files, and persists the annotation databases those spots were
//! searched against.
//!
//! ## Pipeline
//!
//! ```text
//! RawSpectrum ──► RawSpectraIndex ──► Chromatogram ──► PeakDetector
//!                  (chromatogram)                      (peak_detection)
//!                                                            │
//!                                                            ▼
//!          AlignmentRefiner ◄── AlignmentSpotProperty ◄── PeakSpotting
//!            (alignment)                                   (feature)
//!                 │
//!                 ▼
//!  MsScanMatchResultContainer ──► MatchResultRefer ◄── DataBaseMapper
//!            (matching)                                   (storage)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use msalign::prelude::*;
//!
//! let scans: Vec<RawSpectrum> = (0..20)
//!     .map(|i| {
//!         let height = 10_000.0 * (-((i as f64 - 10.0).powi(2)) / 8.0).exp();
//!         RawSpectrum::new_ms1(
//!             i,
//!             i as f64 * 0.05,
//!             ScanPolarity::Positive,
//!             vec![RawPeak::new(301.1, height)],
//!         )
//!     })
//!     .collect();
//!
//! let index = RawSpectraIndex::build(scans, ChromXType::RT, ChromXUnit::Min, IonMode::Positive)?;
//! let features = PeakSpotting::new(PeakPickParameter::default()).run(&index);
//! assert!(!features.is_empty());
//! # Ok::<(), msalign::chromatogram::IndexError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`spectrum`]: raw scan model and chromatographic axes
//! - [`chromatogram`]: scan index, TIC/BPC/XIC extraction and smoothing
//! - [`peak_detection`]: peak detection over one chromatogram
//! - [`feature`]: mass-slice peak spotting into chromatogram features
//! - [`matching`]: annotation results and their per-feature container
//! - [`alignment`]: refinement of aligned spots (dedup, blank filter, linking)
//! - [`reference`]: MSP, text and generated lipid reference libraries
//! - [`storage`]: the ZIP archive of databases and their annotators
//! - [`project`]: per-dataset storages saved and loaded in parallel

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod alignment;
pub mod chromatogram;
pub mod feature;
pub mod matching;
pub mod peak_detection;
pub mod project;
pub mod reference;
pub mod spectrum;
pub mod storage;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::alignment::{
        AlignmentParameter, AlignmentRefiner, AlignmentSpotProperty, AnalysisFileBean,
        AnalysisFileType, LcmsAlignmentRefiner,
    };
    pub use crate::chromatogram::{Chromatogram, IndexError, RawSpectraIndex, ValuePeak};
    pub use crate::feature::{ChromatogramPeakFeature, PeakPickParameter, PeakSpotting};
    pub use crate::matching::{
        MatchResultEvaluator, MatchResultRefer, MsScanMatchResult, MsScanMatchResultContainer,
        SourceType,
    };
    pub use crate::peak_detection::{PeakDetectionParameter, PeakDetector};
    pub use crate::project::{ProjectParameter, ProjectStorage};
    pub use crate::reference::{MoleculeMsReference, PeptideMsReference};
    pub use crate::spectrum::{
        ChromX, ChromXType, ChromXUnit, IonMode, RawPeak, RawSpectrum, ScanPolarity,
    };
    pub use crate::storage::{DataBaseMapper, DataBaseStorage, StorageError};
}
