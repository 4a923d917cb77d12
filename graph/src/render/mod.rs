pub mod dot;
pub mod text;

pub use dot::{DotRenderer, Weights, BOTH_COLOR, BRANCH_COLOR, TAG_COLOR};
pub use text::{escape_label, truncate_graphemes, SUBJECT_WIDTH};
