pub mod dag;
pub mod edge;
pub mod error;
pub mod prefix;

pub use dag::{CommitGraph, GraphStats, LabelMap, RelationMap};
pub use edge::Edge;
pub use error::GraphError;
pub use prefix::{abbreviate, minimal_prefix_length, minimal_prefix_length_of, FULL_ID_LEN, MIN_PREFIX_LEN};
