use thiserror::Error;

/// Structural inconsistencies between the parent and child relations.
///
/// These are never recoverable: they mean the ancestry data handed to the
/// graph contradicts itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("commit {child} lists {parent} as a parent, but {parent} does not list {child} as a child")]
    MissingChild { parent: String, child: String },

    #[error("commit {parent} lists {child} as a child, but {child} does not list {parent} as a parent")]
    MissingParent { parent: String, child: String },

    #[error("commit {0} lists itself as a parent")]
    SelfParent(String),
}
