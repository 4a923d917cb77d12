use crate::core::{abbreviate, CommitGraph, MIN_PREFIX_LEN};
use crate::decor::{LabelKind, RefDecoration, RefDecorator};
use crate::git_backend::Subjects;
use super::text::{escape_label, truncate_graphemes, SUBJECT_WIDTH};
use std::collections::HashMap;

/// Full commit ID -> duplicate-content weight
pub type Weights = HashMap<String, usize>;

pub const TAG_COLOR: &str = "yellow";
pub const BRANCH_COLOR: &str = "lightblue";
pub const BOTH_COLOR: &str = "palegreen";

const BASE_FONT_SIZE: usize = 14;
const FONT_SIZE_STEP: usize = 2;
const MAX_FONT_SIZE: usize = 40;

/// Emits a commit graph as Graphviz `dot` text.
///
/// Edges point from descendant to ancestor. Output is ordered by commit ID.
pub struct DotRenderer<'a> {
    prefix_len: usize,
    show_hashes: bool,
    full_history: bool,
    subjects: Option<&'a Subjects>,
    weights: Option<&'a Weights>,
}

impl<'a> DotRenderer<'a> {
    pub fn new(prefix_len: usize) -> Self {
        Self {
            prefix_len,
            show_hashes: false,
            full_history: false,
            subjects: None,
            weights: None,
        }
    }

    /// Add the short ID to labeled nodes
    pub fn show_hashes(mut self, show: bool) -> Self {
        self.show_hashes = show;
        self
    }

    /// Label unlabeled nodes with their subject instead of their short ID
    pub fn full_history(mut self, enabled: bool) -> Self {
        self.full_history = enabled;
        self
    }

    pub fn subjects(mut self, subjects: &'a Subjects) -> Self {
        self.subjects = Some(subjects);
        self
    }

    pub fn weights(mut self, weights: Option<&'a Weights>) -> Self {
        self.weights = weights;
        self
    }

    pub fn render(&self, graph: &CommitGraph) -> String {
        let decorator = RefDecorator::from_graph(graph);
        let mut out = String::new();

        out.push_str("digraph \"git-big-picture\" {\n");
        out.push_str("    node [style=filled];\n");

        for commit in graph.commits() {
            let attributes = match decorator.get(commit) {
                Some(decoration) => self.labeled_node(decoration),
                None => self.unlabeled_node(commit),
            };
            out.push_str(&format!("    \"{}\" [{}];\n", escape_label(commit), attributes));
        }

        for commit in graph.elided() {
            out.push_str(&format!(
                "    \"{}\" [label=\"…\", shape=plaintext];\n",
                escape_label(commit)
            ));
        }

        for edge in graph.edges() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                escape_label(&edge.from),
                escape_label(&edge.to)
            ));
        }

        out.push_str("}\n");
        out
    }

    fn short_id<'c>(&self, commit: &'c str) -> &'c str {
        abbreviate(commit, self.prefix_len.max(MIN_PREFIX_LEN))
    }

    fn labeled_node(&self, decoration: &RefDecoration) -> String {
        let mut lines: Vec<&str> = decoration.names().collect();
        if self.show_hashes {
            lines.push(self.short_id(&decoration.commit));
        }

        let color = match decoration.kind() {
            LabelKind::Tag => TAG_COLOR,
            LabelKind::Branch => BRANCH_COLOR,
            LabelKind::Both => BOTH_COLOR,
        };

        format!(
            "label=\"{}\", fillcolor={}",
            escape_label(&lines.join("\n")),
            color
        )
    }

    fn unlabeled_node(&self, commit: &str) -> String {
        if !self.full_history {
            return format!("label=\"{}\"", escape_label(self.short_id(commit)));
        }

        let subject = self
            .subjects
            .and_then(|subjects| subjects.get(commit))
            .map(|subject| truncate_graphemes(subject, SUBJECT_WIDTH))
            .unwrap_or_else(|| self.short_id(commit).to_string());

        let mut attributes = format!("label=\"{}\", shape=box", escape_label(&subject));
        if let Some(size) = self.font_size(commit) {
            attributes.push_str(&format!(", fontsize={}", size));
        }
        attributes
    }

    /// Boosted font size for commits whose content is duplicated elsewhere
    fn font_size(&self, commit: &str) -> Option<usize> {
        let weight = *self.weights?.get(commit)?;
        if weight <= 1 {
            return None;
        }
        Some((BASE_FONT_SIZE + FONT_SIZE_STEP * (weight - 1)).min(MAX_FONT_SIZE))
    }
}
