use std::path::PathBuf;

use ort::Error as OrtError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Character {character:?} at position {position} is not in the vocabulary")]
    UnknownCharacter { character: char, position: usize },

    #[error("Index {index} is outside the vocabulary")]
    UnknownIndex { index: i64 },

    #[error("Tagger output shape mismatch: expected {expected} rows, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("ONNX Runtime error: {source}")]
    Ort {
        #[from]
        source: OrtError,
    },

    #[error("Failed to load model file: {path}")]
    ModelFileLoadError {
        path: PathBuf,
        #[source]
        source: OrtError,
    },

    #[error("Model execution failed: {operation}")]
    ModelExecutionError {
        operation: String,
        #[source]
        source: OrtError,
    },

    #[error("Prediction processing failed: {operation}")]
    PredictionError { operation: String, message: String },
}
