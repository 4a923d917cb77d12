use git2::{ObjectType, Reference, ReferenceType, Repository, Sort};
use anyhow::{Result, Context};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};
use crate::core::{CommitGraph, GraphError, LabelMap, RelationMap};

/// Commit ID -> one-line summary
pub type Subjects = HashMap<String, String>;

/// Raw ancestry and ref data extracted from a repository
#[derive(Debug, Clone, Default)]
pub struct Ancestry {
    pub parents: RelationMap,
    pub branches: LabelMap,
    /// Tags whose peeled target is a commit
    pub tags: LabelMap,
    /// Tags whose peeled target is a tree or blob
    pub object_tags: LabelMap,
    pub subjects: Subjects,
}

impl Ancestry {
    /// Consume the ancestry into a full commit graph, handing back the
    /// subjects for rendering.
    pub fn into_graph(self) -> Result<(CommitGraph, Subjects), GraphError> {
        let graph = CommitGraph::new(self.parents, self.branches, self.tags)?
            .with_object_tags(self.object_tags);
        Ok((graph, self.subjects))
    }
}

/// What a reference contributes as a label
enum RefLabel {
    Branch(String),
    Tag(String),
}

pub struct GitWalker {
    repo: Repository,
    remotes: bool,
}

impl GitWalker {
    pub fn new(repo_path: Option<&Path>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::discover(path),
            None => Repository::open_from_env(),
        }.context("Failed to open repository")?;

        Ok(Self::from_repository(repo))
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo, remotes: true }
    }

    /// Whether remote-tracking branches count as branch labels
    pub fn remotes(mut self, enabled: bool) -> Self {
        self.remotes = enabled;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Walk every commit reachable from HEAD, branches and tags
    pub fn collect(&self) -> Result<Ancestry> {
        let mut ancestry = Ancestry::default();
        let mut revwalk = self.repo.revwalk()?;
        let mut tips = 0usize;

        for reference in self.repo.references()? {
            let reference = reference?;
            let Some(label) = self.classify(&reference) else {
                continue;
            };

            let target = reference
                .peel(ObjectType::Any)
                .with_context(|| format!("Failed to peel {}", reference.name().unwrap_or_default()))?;
            let oid = target.id().to_string();
            let is_commit = target.kind() == Some(ObjectType::Commit);

            match label {
                RefLabel::Branch(name) if is_commit => {
                    ancestry.branches.entry(oid).or_default().insert(name);
                }
                RefLabel::Branch(name) => {
                    debug!(branch = %name, "skipping branch pointing at a non-commit");
                    continue;
                }
                RefLabel::Tag(name) if is_commit => {
                    ancestry.tags.entry(oid).or_default().insert(name);
                }
                RefLabel::Tag(name) => {
                    ancestry.object_tags.entry(oid).or_default().insert(name);
                    continue;
                }
            }

            revwalk.push(target.id())?;
            tips += 1;
        }

        // Detached HEAD may not be covered by any branch
        if let Ok(head) = self.repo.head() {
            if let Ok(commit) = head.peel_to_commit() {
                revwalk.push(commit.id())?;
                tips += 1;
            }
        }

        if tips == 0 {
            info!("repository has no commits");
            return Ok(ancestry);
        }

        revwalk.set_sorting(Sort::TOPOLOGICAL)?;

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            let id = oid.to_string();

            let parents: BTreeSet<String> =
                commit.parent_ids().map(|parent| parent.to_string()).collect();
            ancestry.parents.insert(id.clone(), parents);

            let subject = commit.summary().unwrap_or("").to_string();
            ancestry.subjects.insert(id, subject);
        }

        info!(
            commits = ancestry.parents.len(),
            branches = ancestry.branches.len(),
            tags = ancestry.tags.len() + ancestry.object_tags.len(),
            "collected ancestry"
        );

        Ok(ancestry)
    }

    /// Resolve a revision expression to a full commit ID
    pub fn resolve(&self, rev: &str) -> Result<String> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .with_context(|| format!("Failed to resolve revision '{}'", rev))?;
        Ok(commit.id().to_string())
    }

    /// Map a reference name to the label it contributes, if any.
    /// Symbolic refs, stashes and notes contribute nothing.
    fn classify(&self, reference: &Reference) -> Option<RefLabel> {
        if reference.kind() == Some(ReferenceType::Symbolic) {
            return None;
        }
        let name = reference.name()?;

        if let Some(branch) = name.strip_prefix("refs/heads/") {
            Some(RefLabel::Branch(branch.to_string()))
        } else if let Some(remote) = name.strip_prefix("refs/remotes/") {
            self.remotes.then(|| RefLabel::Branch(remote.to_string()))
        } else {
            name.strip_prefix("refs/tags/")
                .map(|tag| RefLabel::Tag(tag.to_string()))
        }
    }
}
