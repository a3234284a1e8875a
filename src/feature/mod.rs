//! # Feature Building
//!
//! Converts peak-detection results into per-file [`ChromatogramPeakFeature`]s
//! and drives the whole per-file peak picking ([`PeakSpotting`]): the mass
//! range is cut into slices, an extracted chromatogram is built and searched
//! for every slice, and the surviving peaks become features linked back to
//! their raw MS1 scans and, where one was acquired, their MS2 scan.

mod builder;
mod spotting;
mod types;

#[cfg(test)]
mod tests;

pub use builder::{FeatureBuilder, DEFAULT_MS2_TOLERANCE};
pub use spotting::{PeakPickParameter, PeakSpotting};
pub use types::{ChromatogramPeakFeature, MoleculeProperty};
