use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Inconsistent box geometry: top={top}, bottom={bottom}, left={left}, right={right}")]
    GeometryInconsistency {
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    },

    #[error("Malformed OCR box on line {line_number}: {message}")]
    MalformedBoxLine { line_number: usize, message: String },

    #[error("Failed to read OCR file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
