use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("Could not locate field '{field}' in document '{document}'")]
    AlignmentFailure { field: String, document: String },

    #[error("Failed to build match pattern for field '{field}'")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

impl AlignmentError {
    /// Name of the field that could not be aligned.
    pub fn field(&self) -> &str {
        match self {
            AlignmentError::AlignmentFailure { field, .. }
            | AlignmentError::InvalidPattern { field, .. } => field,
        }
    }
}
