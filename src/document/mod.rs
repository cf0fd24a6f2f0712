pub mod bounds;
pub mod error;
pub mod linearize;
pub mod text_box;
pub mod text_line;

pub use bounds::Bounds;
pub use error::DocumentError;
pub use linearize::{linearize, normalize_whitespace, LinearDocument};
pub use text_box::{parse_boxes, read_boxes, TextBox};
pub use text_line::{assemble_lines, TextLine};
