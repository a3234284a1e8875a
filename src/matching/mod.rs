//! # Match-Result Consolidation
//!
//! Every feature and alignment spot owns one [`MsScanMatchResultContainer`]
//! holding the library candidates proposed by the annotators. The container
//! exposes a single *representative* result chosen by a fixed rule:
//!
//! 1. The larger raw [`SourceType`] value wins, whatever the scores.
//! 2. Among equal sources the larger `total_score` wins.
//! 3. The first of several equal maxima is kept.
//!
//! The numeric flag values are persisted in archives; changing them changes
//! which historical candidates become representative.
//!
//! ## Usage
//!
//! ```rust
//! use msalign::matching::{MsScanMatchResult, MsScanMatchResultContainer, SourceType};
//!
//! let mut container = MsScanMatchResultContainer::new();
//! container.add_result(MsScanMatchResult::new(7, SourceType::MSP_DB, 0.9));
//! container.add_result(MsScanMatchResult::new(3, SourceType::TEXT_DB, 0.1));
//! assert_eq!(container.representative().library_id, 3);
//!
//! container.clear_results();
//! assert!(container.representative().is_unknown());
//! ```

mod container;
mod error;
mod evaluator;
mod result;
mod source_type;

#[cfg(test)]
mod tests;

pub use container::MsScanMatchResultContainer;
pub use error::MatchError;
pub use evaluator::{MatchResultEvaluator, MatchResultRefer};
pub use result::MsScanMatchResult;
pub use source_type::SourceType;
