pub mod dataset;
pub mod document;
pub mod inference;
pub mod labeling;
pub mod pipeline;
pub mod server;
pub mod utils;

pub use dataset::{Dataset, DatasetError, TrainingExample};
pub use document::{linearize, DocumentError, LinearDocument, TextBox};
pub use inference::{FieldResult, InferenceError, SequenceTagger, SpanDecoder, Vocabulary};
pub use labeling::{align, AlignmentError, FieldSpec, LabelAligner};
pub use pipeline::{ExtractionResult, Extractor};
pub use server::{create_app, start_server};
