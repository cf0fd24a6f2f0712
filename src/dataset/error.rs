use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentError;
use crate::inference::InferenceError;
use crate::labeling::AlignmentError;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse key information in {path}")]
    KeyInfoParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse dataset file {path}")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No matching OCR/key-info partner for {path}")]
    UnpairedFile { path: PathBuf },

    #[error("Cannot build a batch from zero documents")]
    EmptyBatch,

    #[error("Label array length {labels} does not match text length {text}")]
    LabelLength { text: usize, labels: usize },

    #[error("Document error")]
    Document {
        #[from]
        source: DocumentError,
    },

    #[error("Alignment error")]
    Alignment {
        #[from]
        source: AlignmentError,
    },

    #[error("Encoding error")]
    Encoding {
        #[from]
        source: InferenceError,
    },
}
