/// Errors raised while reading or generating reference libraries
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// I/O error while reading a library file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed tab-delimited text library
    #[error("Text library error: {0}")]
    CsvError(#[from] csv::Error),

    /// A numeric field could not be parsed
    #[error("Line {line}: invalid {field} value '{value}'")]
    InvalidValue {
        /// 1-based line number
        line: usize,
        /// Field name
        field: String,
        /// Raw text
        value: String,
    },

    /// Adduct notation not in the supported table
    #[error("Unsupported adduct: {0}")]
    UnsupportedAdduct(String),

    /// Lipid notation that cannot be parsed
    #[error("Invalid lipid notation: {0}")]
    InvalidLipid(String),
}
