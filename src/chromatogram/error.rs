use crate::spectrum::{ChromXType, ChromXUnit, IonMode};

/// Errors raised while building a chromatogram index.
///
/// All of these are configuration or input errors; none is recoverable by
/// retrying the same call.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The ion mode does not map onto exactly one scan polarity
    #[error("Unsupported ion mode for chromatogram index: {0:?}")]
    UnsupportedIonMode(IonMode),

    /// The axis type/unit combination cannot be derived from raw scans
    #[error("Unsupported chromatogram axis: {axis} ({unit})")]
    UnsupportedAxis {
        /// Requested axis type
        axis: ChromXType,
        /// Requested axis unit
        unit: ChromXUnit,
    },

    /// A scan has a NaN or infinite axis value
    #[error("Scan {index} has a non-finite axis value")]
    InvalidAxisValue {
        /// Raw index of the offending scan
        index: usize,
    },

    /// Two scans share the same raw spectrum index
    #[error("Duplicate raw spectrum index: {0}")]
    DuplicateSpectrumIndex(usize),
}
