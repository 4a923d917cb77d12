//! Commit graph model, reduction to interesting commits, and rendering to
//! Graphviz `dot` text.

pub mod core;
pub mod decor;
pub mod git_backend;
pub mod query;
pub mod render;

pub use crate::core::{CommitGraph, Edge, GraphError, GraphStats, LabelMap, RelationMap};
pub use crate::core::{minimal_prefix_length, FULL_ID_LEN, MIN_PREFIX_LEN};
pub use crate::decor::{RefDecoration, RefDecorator};
pub use crate::git_backend::{Ancestry, GitWalker, Subjects};
pub use crate::query::{reduce, CommitFilter};
pub use crate::render::{DotRenderer, Weights};
