pub mod batch;
pub mod corpus;
pub mod error;
pub mod split;
pub mod store;

pub use batch::{encode_document, pad_right_batch, robust_pad_batch, sample_batch, Batch};
pub use corpus::{Corpus, CorpusEntry, PreparedCorpus, SkippedDocument};
pub use error::DatasetError;
pub use split::split_train_validation;
pub use store::{Dataset, TrainingExample};
