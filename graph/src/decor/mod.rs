pub mod refs;

pub use refs::{LabelKind, RefDecoration, RefDecorator};
