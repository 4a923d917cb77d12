use crate::core::CommitGraph;
use std::collections::BTreeMap;

/// Which kinds of refs point at an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Tag,
    Branch,
    Both,
}

/// All ref names pointing at one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefDecoration {
    pub commit: String,
    pub tags: Vec<String>,
    pub branches: Vec<String>,
}

impl RefDecoration {
    pub fn kind(&self) -> LabelKind {
        match (self.tags.is_empty(), self.branches.is_empty()) {
            (false, false) => LabelKind::Both,
            (false, true) => LabelKind::Tag,
            _ => LabelKind::Branch,
        }
    }

    /// Tag names first, then branch names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .chain(self.branches.iter())
            .map(String::as_str)
    }
}

/// Decorations for every labeled object of a graph, assembled once
#[derive(Debug, Clone, Default)]
pub struct RefDecorator {
    decorations: BTreeMap<String, RefDecoration>,
}

impl RefDecorator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: &CommitGraph) -> Self {
        let mut decorator = Self::new();

        for (object, names) in graph.tag_labels().iter().chain(graph.object_tags()) {
            for name in names {
                decorator.add_tag(object.clone(), name.clone());
            }
        }
        for (commit, names) in graph.branch_labels() {
            for name in names {
                decorator.add_branch(commit.clone(), name.clone());
            }
        }

        decorator
    }

    pub fn add_branch(&mut self, commit_id: String, branch: String) {
        self.entry(commit_id).branches.push(branch);
    }

    pub fn add_tag(&mut self, commit_id: String, tag: String) {
        self.entry(commit_id).tags.push(tag);
    }

    fn entry(&mut self, commit_id: String) -> &mut RefDecoration {
        self.decorations
            .entry(commit_id.clone())
            .or_insert_with(|| RefDecoration {
                commit: commit_id,
                tags: Vec::new(),
                branches: Vec::new(),
            })
    }

    pub fn get(&self, commit_id: &str) -> Option<&RefDecoration> {
        self.decorations.get(commit_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RefDecoration> {
        self.decorations.values()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }
}
