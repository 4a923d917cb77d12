use crate::core::CommitGraph;
use std::collections::BTreeSet;

/// Selects the "interesting" commits of a graph.
///
/// Each category is toggled independently; the result is the union of all
/// enabled categories plus any explicitly included commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFilter {
    branches: bool,
    tags: bool,
    roots: bool,
    merges: bool,
    bifurcations: bool,
    all: bool,
    extra: BTreeSet<String>,
}

impl Default for CommitFilter {
    /// Every category enabled, full history off
    fn default() -> Self {
        Self {
            branches: true,
            tags: true,
            roots: true,
            merges: true,
            bifurcations: true,
            all: false,
            extra: BTreeSet::new(),
        }
    }
}

impl CommitFilter {
    /// A filter that selects nothing
    pub fn none() -> Self {
        Self {
            branches: false,
            tags: false,
            roots: false,
            merges: false,
            bifurcations: false,
            all: false,
            extra: BTreeSet::new(),
        }
    }

    pub fn branches(mut self, enabled: bool) -> Self {
        self.branches = enabled;
        self
    }

    pub fn tags(mut self, enabled: bool) -> Self {
        self.tags = enabled;
        self
    }

    pub fn roots(mut self, enabled: bool) -> Self {
        self.roots = enabled;
        self
    }

    pub fn merges(mut self, enabled: bool) -> Self {
        self.merges = enabled;
        self
    }

    pub fn bifurcations(mut self, enabled: bool) -> Self {
        self.bifurcations = enabled;
        self
    }

    /// Select every commit of the graph (full history)
    pub fn all(mut self, enabled: bool) -> Self {
        self.all = enabled;
        self
    }

    /// Always keep the given commits
    pub fn include<I, S>(mut self, commits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(commits.into_iter().map(Into::into));
        self
    }

    /// True if no configuration of this filter can select anything
    pub fn selects_nothing(&self) -> bool {
        !(self.branches
            || self.tags
            || self.roots
            || self.merges
            || self.bifurcations
            || self.all
            || !self.extra.is_empty())
    }

    /// Compute the set of interesting commits.
    ///
    /// Tags pointing at non-commit objects are included when tags are
    /// selected even though those objects are not graph nodes.
    pub fn interesting(&self, graph: &CommitGraph) -> BTreeSet<String> {
        let mut selected: BTreeSet<String> = self.extra.clone();

        if self.all {
            selected.extend(graph.commits().map(str::to_string));
        }
        if self.branches {
            selected.extend(graph.branch_labels().keys().cloned());
        }
        if self.tags {
            selected.extend(graph.tag_labels().keys().cloned());
            selected.extend(graph.object_tags().keys().cloned());
        }
        if self.roots {
            selected.extend(graph.roots().into_iter().map(str::to_string));
        }
        if self.merges {
            selected.extend(graph.merges().into_iter().map(str::to_string));
        }
        if self.bifurcations {
            selected.extend(graph.bifurcations().into_iter().map(str::to_string));
        }

        selected
    }
}
