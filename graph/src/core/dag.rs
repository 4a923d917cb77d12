use super::{edge::Edge, error::GraphError};
use std::collections::{BTreeMap, BTreeSet};

/// Commit ID -> set of related commit IDs (parents or children)
pub type RelationMap = BTreeMap<String, BTreeSet<String>>;

/// Object ID -> set of ref names
pub type LabelMap = BTreeMap<String, BTreeSet<String>>;

/// Directed acyclic graph of commit ancestry with ref labels.
///
/// The parent map is the source of truth. The child map is derived from it on
/// construction and always holds the exact inverse relation. Once built, the
/// relations never change; filtering produces a new graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitGraph {
    parents: RelationMap,
    children: RelationMap,
    branch_labels: LabelMap,
    tag_labels: LabelMap,
    /// Tags whose target is a tree or blob. These objects are never keys of
    /// the parent map of a full graph.
    object_tags: LabelMap,
    /// Commits drawn only as a "…" placeholder
    elided: BTreeSet<String>,
}

impl CommitGraph {
    /// Build a graph from a parent map and the branch/tag label maps.
    ///
    /// Fails if the parent relation is self-contradictory.
    pub fn new(
        parents: RelationMap,
        branch_labels: LabelMap,
        tag_labels: LabelMap,
    ) -> Result<Self, GraphError> {
        let children = derive_children(&parents);
        check_relations(&parents, &children)?;

        Ok(Self {
            parents,
            children,
            branch_labels,
            tag_labels,
            object_tags: LabelMap::new(),
            elided: BTreeSet::new(),
        })
    }

    /// Attach tags that point at non-commit objects
    pub fn with_object_tags(mut self, object_tags: LabelMap) -> Self {
        self.object_tags = object_tags;
        self
    }

    /// Attach commits that should be drawn as placeholders
    pub fn with_elided(mut self, elided: BTreeSet<String>) -> Self {
        self.elided = elided;
        self
    }

    pub fn parents(&self) -> &RelationMap {
        &self.parents
    }

    pub fn children(&self) -> &RelationMap {
        &self.children
    }

    pub fn branch_labels(&self) -> &LabelMap {
        &self.branch_labels
    }

    pub fn tag_labels(&self) -> &LabelMap {
        &self.tag_labels
    }

    pub fn object_tags(&self) -> &LabelMap {
        &self.object_tags
    }

    pub fn elided(&self) -> &BTreeSet<String> {
        &self.elided
    }

    /// Whether the commit is a node of this graph
    pub fn contains(&self, commit_id: &str) -> bool {
        self.parents.contains_key(commit_id)
    }

    /// Iterate over all commit IDs in identifier order
    pub fn commits(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    /// Direct parents of a commit, if it is part of the graph
    pub fn parents_of(&self, commit_id: &str) -> Option<&BTreeSet<String>> {
        self.parents.get(commit_id)
    }

    /// Direct children of a commit
    pub fn children_of(&self, commit_id: &str) -> Option<&BTreeSet<String>> {
        self.children.get(commit_id)
    }

    /// True if any branch or tag points at the object
    pub fn has_label(&self, object_id: &str) -> bool {
        self.branch_labels.contains_key(object_id)
            || self.tag_labels.contains_key(object_id)
            || self.object_tags.contains_key(object_id)
    }

    /// Commits without parents
    pub fn roots(&self) -> Vec<&str> {
        self.parents
            .iter()
            .filter(|(_, parents)| parents.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Commits with more than one parent
    pub fn merges(&self) -> Vec<&str> {
        self.parents
            .iter()
            .filter(|(_, parents)| parents.len() > 1)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Commits with more than one child
    pub fn bifurcations(&self) -> Vec<&str> {
        self.commits()
            .filter(|id| self.child_count(id) > 1)
            .collect()
    }

    /// Commits without children
    pub fn leaves(&self) -> Vec<&str> {
        self.commits()
            .filter(|id| self.child_count(id) == 0)
            .collect()
    }

    fn child_count(&self, commit_id: &str) -> usize {
        self.children.get(commit_id).map_or(0, BTreeSet::len)
    }

    /// All parent relationships, descendant first
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (child, parents) in &self.parents {
            for parent in parents {
                edges.push(Edge::new(child.clone(), parent.clone()));
            }
        }
        edges
    }

    pub fn node_count(&self) -> usize {
        self.parents.len()
    }

    pub fn edge_count(&self) -> usize {
        self.parents.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Re-check the parent/child invariant
    pub fn validate(&self) -> Result<(), GraphError> {
        check_relations(&self.parents, &self.children)
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_commits: self.node_count(),
            total_edges: self.edge_count(),
            root_commits: self.roots().len(),
            merge_commits: self.merges().len(),
            bifurcations: self.bifurcations().len(),
            leaf_commits: self.leaves().len(),
            labeled_commits: self.commits().filter(|id| self.has_label(id)).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_commits: usize,
    pub total_edges: usize,
    pub root_commits: usize,
    pub merge_commits: usize,
    pub bifurcations: usize,
    pub leaf_commits: usize,
    pub labeled_commits: usize,
}

/// Invert the parent relation. Every key of `parents` is also a key of the
/// result, so leaves are addressable with an empty child set.
pub(crate) fn derive_children(parents: &RelationMap) -> RelationMap {
    let mut children = RelationMap::new();

    for (child, commit_parents) in parents {
        children.entry(child.clone()).or_default();
        for parent in commit_parents {
            children
                .entry(parent.clone())
                .or_default()
                .insert(child.clone());
        }
    }

    children
}

/// Check that `children` is the exact inverse of `parents`.
///
/// Parents that are not themselves keys of `parents` (a truncated history)
/// are allowed, but must still list their children.
pub(crate) fn check_relations(
    parents: &RelationMap,
    children: &RelationMap,
) -> Result<(), GraphError> {
    for (child, commit_parents) in parents {
        for parent in commit_parents {
            if parent == child {
                return Err(GraphError::SelfParent(child.clone()));
            }
            let listed = children
                .get(parent)
                .is_some_and(|set| set.contains(child));
            if !listed {
                return Err(GraphError::MissingChild {
                    parent: parent.clone(),
                    child: child.clone(),
                });
            }
        }
    }

    for (parent, commit_children) in children {
        for child in commit_children {
            let listed = parents
                .get(child)
                .is_some_and(|set| set.contains(parent));
            if !listed {
                return Err(GraphError::MissingParent {
                    parent: parent.clone(),
                    child: child.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a relation map from `(commit, [parents])` pairs
    pub(crate) fn relations(entries: &[(&str, &[&str])]) -> RelationMap {
        entries
            .iter()
            .map(|(id, parents)| {
                (
                    id.to_string(),
                    parents.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    /// Build a label map from `(object, [names])` pairs
    pub(crate) fn labels(entries: &[(&str, &[&str])]) -> LabelMap {
        relations(entries)
    }

    fn diamond() -> CommitGraph {
        CommitGraph::new(
            relations(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])]),
            LabelMap::new(),
            LabelMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_children_are_inverse_of_parents() {
        let graph = diamond();

        for (child, parents) in graph.parents() {
            for parent in parents {
                assert!(graph.children_of(parent).unwrap().contains(child));
            }
        }
        for (parent, children) in graph.children() {
            for child in children {
                assert!(graph.parents_of(child).unwrap().contains(parent));
            }
        }
    }

    #[test]
    fn test_leaves_have_empty_child_sets() {
        let graph = diamond();

        assert!(graph.children_of("D").unwrap().is_empty());
        assert_eq!(graph.leaves(), vec!["D"]);
    }

    #[test]
    fn test_derived_views() {
        let graph = diamond();

        assert_eq!(graph.roots(), vec!["A"]);
        assert_eq!(graph.merges(), vec!["D"]);
        assert_eq!(graph.bifurcations(), vec!["A"]);
    }

    #[test]
    fn test_edges() {
        let graph = diamond();
        let edges = graph.edges();

        assert_eq!(edges.len(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(edges.iter().filter(|e| e.from == "D").count(), 2);
        assert!(edges.contains(&Edge::new("D".into(), "B".into())));
        assert!(edges.contains(&Edge::new("B".into(), "A".into())));
    }

    #[test]
    fn test_has_label() {
        let graph = CommitGraph::new(
            relations(&[("A", &[]), ("B", &["A"])]),
            labels(&[("B", &["main"])]),
            labels(&[("A", &["v1"])]),
        )
        .unwrap()
        .with_object_tags(labels(&[("T", &["tree-tag"])]));

        assert!(graph.has_label("A"));
        assert!(graph.has_label("B"));
        assert!(graph.has_label("T"));
        assert!(!graph.has_label("C"));
    }

    #[test]
    fn test_truncated_history_is_accepted() {
        // "X" is referenced but was never walked
        let graph = CommitGraph::new(
            relations(&[("B", &["X"])]),
            LabelMap::new(),
            LabelMap::new(),
        )
        .unwrap();

        assert!(!graph.contains("X"));
        assert!(graph.children_of("X").unwrap().contains("B"));
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let result = CommitGraph::new(
            relations(&[("A", &["A"])]),
            LabelMap::new(),
            LabelMap::new(),
        );

        assert_eq!(result.unwrap_err(), GraphError::SelfParent("A".into()));
    }

    #[test]
    fn test_check_relations_reports_missing_child() {
        let parents = relations(&[("A", &[]), ("B", &["A"])]);
        let children = relations(&[("A", &[]), ("B", &[])]);

        assert_eq!(
            check_relations(&parents, &children),
            Err(GraphError::MissingChild {
                parent: "A".into(),
                child: "B".into()
            })
        );
    }

    #[test]
    fn test_check_relations_reports_missing_parent() {
        let parents = relations(&[("A", &[]), ("B", &[])]);
        let children = relations(&[("A", &["B"]), ("B", &[])]);

        assert_eq!(
            check_relations(&parents, &children),
            Err(GraphError::MissingParent {
                parent: "A".into(),
                child: "B".into()
            })
        );
    }

    #[test]
    fn test_stats() {
        let graph = diamond();
        let stats = graph.stats();

        assert_eq!(stats.total_commits, 4);
        assert_eq!(stats.total_edges, 4);
        assert_eq!(stats.root_commits, 1);
        assert_eq!(stats.merge_commits, 1);
        assert_eq!(stats.bifurcations, 1);
        assert_eq!(stats.leaf_commits, 1);
        assert_eq!(stats.labeled_commits, 0);
        assert!(graph.validate().is_ok());
    }
}
