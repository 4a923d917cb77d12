//! Shortest unambiguous abbreviation of commit identifiers.

use super::dag::CommitGraph;
use std::collections::HashSet;

/// Shortest abbreviation ever handed out
pub const MIN_PREFIX_LEN: usize = 7;

/// Length of a full SHA-1 hex identifier
pub const FULL_ID_LEN: usize = 40;

/// Shortest prefix length, in `[MIN_PREFIX_LEN, FULL_ID_LEN]`, at which every
/// commit of the graph keeps a distinct abbreviation.
pub fn minimal_prefix_length(graph: &CommitGraph) -> usize {
    minimal_prefix_length_of(graph.commits())
}

/// Same as [`minimal_prefix_length`] over an arbitrary identifier set.
///
/// Duplicated identifiers in the input are counted once.
pub fn minimal_prefix_length_of<'a, I>(ids: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let ids: HashSet<&str> = ids.into_iter().collect();

    (MIN_PREFIX_LEN..FULL_ID_LEN)
        .find(|&len| {
            let prefixes: HashSet<&str> = ids.iter().map(|id| abbreviate(id, len)).collect();
            prefixes.len() == ids.len()
        })
        .unwrap_or(FULL_ID_LEN)
}

/// First `len` characters of an identifier, or all of it if shorter
pub fn abbreviate(id: &str, len: usize) -> &str {
    id.get(..len).unwrap_or(id)
}
