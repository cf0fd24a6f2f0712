pub mod aligner;
pub mod error;
pub mod field;
pub mod matchers;

pub use aligner::{align, Alignment, LabelAligner, TOTAL_FIELD};
pub use error::AlignmentError;
pub use field::{parse_key_info, ClassId, FieldSpec, LabelArray, BACKGROUND};
pub use matchers::MatchStrategy;
