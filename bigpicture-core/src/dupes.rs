//! Cross-branch duplicate-content weighting.
//!
//! Commits that introduce the same change (cherry-picks, rebased copies)
//! share a patch-id. Each commit is weighted by how many commits share its
//! patch-id, so the renderer can make duplicated work stand out.

use anyhow::{Context, Result};
use git2::{Oid, Repository as Git2Repository};
use graph::Weights;
use std::collections::HashMap;
use tracing::debug;

pub struct DupeAnalysis<'repo> {
    repo: &'repo Git2Repository,
}

impl<'repo> DupeAnalysis<'repo> {
    pub fn new(repo: &'repo Git2Repository) -> Self {
        Self { repo }
    }

    /// Patch-id of a commit's change against its first parent.
    ///
    /// Merges and commits that change nothing have no patch-id.
    pub fn patch_id(&self, commit_id: &str) -> Result<Option<Oid>> {
        let oid = Oid::from_str(commit_id)
            .with_context(|| format!("Invalid commit id '{}'", commit_id))?;
        let commit = self.repo.find_commit(oid)?;
        if commit.parent_count() > 1 {
            return Ok(None);
        }

        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let diff = self.repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        if diff.deltas().len() == 0 {
            return Ok(None);
        }

        Ok(Some(diff.patchid(None)?))
    }

    /// Weight every given commit by the number of commits sharing its
    /// patch-id. Commits without a patch-id are left out of the table.
    pub fn weights<'a, I>(&self, commits: I) -> Result<Weights>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut patch_ids: HashMap<String, Oid> = HashMap::new();
        let mut histogram: HashMap<Oid, usize> = HashMap::new();

        for commit in commits {
            if let Some(patch_id) = self.patch_id(commit)? {
                *histogram.entry(patch_id).or_default() += 1;
                patch_ids.insert(commit.to_string(), patch_id);
            }
        }

        let duplicated = histogram.values().filter(|&&count| count > 1).count();
        debug!(commits = patch_ids.len(), duplicated, "computed patch-ids");

        Ok(patch_ids
            .into_iter()
            .map(|(commit, patch_id)| (commit, histogram[&patch_id]))
            .collect())
    }
}
