pub mod decoder;
pub mod error;
pub mod onnx_tagger;
pub mod tagger;
pub mod vocab;

pub use decoder::{best_per_field, decode, Aggregation, ExtractedField, FieldResult, SpanDecoder};
pub use error::InferenceError;
pub use onnx_tagger::OnnxTagger;
pub use tagger::{softmax_rows, Prediction, SequenceTagger};
pub use vocab::{Vocabulary, RECEIPT_ALPHABET};
