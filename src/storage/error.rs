/// Errors raised while saving or loading a database storage archive
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error serializing/deserializing JSON
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Error from the ZIP container library
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// A record frame is longer than the reader accepts
    #[error("Record frame of {len} bytes exceeds the limit of {max} bytes")]
    FrameTooLarge {
        /// Declared frame length
        len: u64,
        /// Accepted maximum
        max: u64,
    },

    /// A record stream ended before its terminator
    #[error("Record stream ended unexpectedly")]
    Truncated,

    /// An entry decoded but its content is inconsistent
    #[error("Corrupt archive entry {entry}: {reason}")]
    CorruptEntry {
        /// Archive entry path
        entry: String,
        /// What was wrong
        reason: String,
    },

    /// A database id cannot be used as an archive path segment
    #[error("Invalid database id '{0}'")]
    InvalidId(String),

    /// Two databases of one storage share an id
    #[error("Duplicate database id '{0}'")]
    DuplicateId(String),
}

impl StorageError {
    /// Whether the error describes malformed archive content rather than a
    /// failing device or a caller mistake
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::ZipError(zip::result::ZipError::Io(_)) => false,
            Self::ZipError(_)
            | Self::SerdeJsonError(_)
            | Self::FrameTooLarge { .. }
            | Self::Truncated
            | Self::CorruptEntry { .. } => true,
            Self::IoError(e) => e.kind() == std::io::ErrorKind::InvalidData,
            Self::InvalidId(_) | Self::DuplicateId(_) => false,
        }
    }
}
