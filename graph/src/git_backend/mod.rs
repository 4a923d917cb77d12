pub mod walker;

pub use walker::{Ancestry, GitWalker, Subjects};
