/// Errors raised while refining aligned spots
#[derive(Debug, thiserror::Error)]
pub enum AlignmentError {
    /// Blank filtering needs at least one sample file to average over
    #[error("Blank filtering requires at least one sample file, found none among {files} files")]
    NoSampleFiles {
        /// Number of analysis files configured
        files: usize,
    },

    /// A spot does not carry exactly one feature slot per analysis file
    #[error("Spot {alignment_id} has {found} per-file features, expected {expected}")]
    FeatureCountMismatch {
        /// Alignment id of the offending spot
        alignment_id: usize,
        /// Number of analysis files
        expected: usize,
        /// Number of per-file features on the spot
        found: usize,
    },
}
