use crate::core::{CommitGraph, GraphError, RelationMap};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Collapse `graph` down to the commits in `interesting`.
///
/// Each interesting commit gets as parents the first interesting commits
/// found on every ancestry path leading away from it. Uninteresting commits
/// are walked through; the walk stops at an interesting one.
///
/// No transitive reduction is performed: if `X` is reachable from `c` both
/// directly and through another interesting `Y`, `c` keeps an edge to `X`
/// as well as to `Y`.
///
/// Label maps and elided commits are copied unchanged, so an isolated
/// interesting commit keeps its labels.
pub fn reduce(
    graph: &CommitGraph,
    interesting: &BTreeSet<String>,
) -> Result<CommitGraph, GraphError> {
    let mut reduced = RelationMap::new();

    for commit in interesting {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut to_visit: Vec<&str> = graph
            .parents_of(commit)
            .map(|parents| parents.iter().map(String::as_str).collect())
            .unwrap_or_default();
        let ancestors = reduced.entry(commit.clone()).or_default();

        while let Some(candidate) = to_visit.pop() {
            if !visited.insert(candidate) {
                continue;
            }
            if interesting.contains(candidate) {
                ancestors.insert(candidate.to_string());
            } else if let Some(parents) = graph.parents_of(candidate) {
                to_visit.extend(parents.iter().map(String::as_str));
            }
        }
    }

    debug!(
        from = graph.node_count(),
        to = reduced.len(),
        "reduced commit graph"
    );

    let result = CommitGraph::new(
        reduced,
        graph.branch_labels().clone(),
        graph.tag_labels().clone(),
    )?
    .with_object_tags(graph.object_tags().clone())
    .with_elided(graph.elided().clone());

    Ok(result)
}
