//! # Chromatogram Module
//!
//! Chromatogram extraction over the raw scans of one analysis file.
//!
//! [`RawSpectraIndex`] sorts the scans of a file once by their value on a
//! chromatographic axis and then answers range queries:
//!
//! - [`RawSpectraIndex::total_ion_chromatogram`] (TIC)
//! - [`RawSpectraIndex::base_peak_chromatogram`] (BPC)
//! - [`RawSpectraIndex::extracted_ion_chromatogram`] (XIC/EIC)
//!
//! Only MS1 scans of the polarity matching the index ion mode contribute
//! points. Scans outside the filter are skipped, never reported as zero
//! intensity, so a polarity-switching run does not produce artificial valleys.
//!
//! ## Usage
//!
//! ```rust
//! use msalign::chromatogram::RawSpectraIndex;
//! use msalign::spectrum::{ChromXType, ChromXUnit, IonMode, RawPeak, RawSpectrum, ScanPolarity};
//!
//! let scans = vec![
//!     RawSpectrum::new_ms1(0, 1.0, ScanPolarity::Positive, vec![RawPeak::new(400.0, 10.0)]),
//!     RawSpectrum::new_ms1(1, 1.1, ScanPolarity::Positive, vec![RawPeak::new(400.0, 30.0)]),
//! ];
//! let index = RawSpectraIndex::build(scans, ChromXType::RT, ChromXUnit::Min, IonMode::Positive)?;
//! let xic = index.extracted_ion_chromatogram(400.0, 0.01, 0.0, 2.0);
//! assert_eq!(xic.len(), 2);
//! # Ok::<(), msalign::chromatogram::IndexError>(())
//! ```

mod error;
mod index;
mod smoothing;
mod types;


pub use error::IndexError;
pub use index::RawSpectraIndex;
pub use smoothing::{smooth, smooth_intensities, SmoothingMethod, SmoothingParameter};
pub use types::{Chromatogram, ValuePeak};
