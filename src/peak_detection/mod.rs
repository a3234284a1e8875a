//! # Peak Detection Module
//!
//! Finds chromatographic peaks in a single [`Chromatogram`](crate::chromatogram::Chromatogram).
//!
//! Detection is a pure function of its input: the same chromatogram and
//! thresholds always give the same results, and detectors can run on many
//! files in parallel without shared state.
//!
//! Results whose apex intensity is not positive describe no peak and are
//! dropped by [`PeakDetector::detect`]; an excluded-mass list removes peaks
//! whose apex mass falls inside a user-defined noise window.

mod detector;
mod result;

#[cfg(test)]
mod tests;

pub use detector::{detect_peaks, estimate_noise, exclude_masses, PeakDetectionParameter, PeakDetector};
pub use result::{ExcludedMass, PeakDetectionResult};
