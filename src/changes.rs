//! # Commit Change Listing
//!
//! Lists the files touched by one commit by diffing its tree against its
//! first parent's tree. A root commit is diffed against the empty tree, so
//! every file it contains shows up as added.
//!
//! Repository access goes through `git2`; nothing here shells out to `git`.
//! The [`ChangeSource`] trait keeps the driver independent of the
//! repository so it can be fed a fixed list in tests.

use crate::error::Result;
use git2::{Delta, Repository};
use std::fmt;
use std::path::PathBuf;

/// How a file changed in the commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    /// Type changes and anything else the diff reports.
    Other,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<Delta> for ChangeStatus {
    fn from(delta: Delta) -> Self {
        match delta {
            Delta::Added => ChangeStatus::Added,
            Delta::Modified => ChangeStatus::Modified,
            Delta::Deleted => ChangeStatus::Deleted,
            _ => ChangeStatus::Other,
        }
    }
}

/// A file reported by the commit diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative path, always `/`-separated.
    pub path: String,
    pub status: ChangeStatus,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Something that can list the files changed by the commit of interest.
pub trait ChangeSource {
    /// Changed files in diff order.
    fn changed_files(&self) -> Result<Vec<ChangedFile>>;
}

/// Lists changes of a commit in a git repository.
#[derive(Debug, Clone)]
pub struct GitChangeSource {
    repo_path: PathBuf,
    revision: String,
}

impl GitChangeSource {
    /// `repo_path` may be any directory inside the work tree; the repository
    /// is discovered upward from it. `revision` is anything `git rev-parse`
    /// understands (`HEAD`, a branch, a sha).
    pub fn new(repo_path: impl Into<PathBuf>, revision: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            revision: revision.into(),
        }
    }
}

impl ChangeSource for GitChangeSource {
    fn changed_files(&self) -> Result<Vec<ChangedFile>> {
        let repo = Repository::discover(&self.repo_path)?;
        let commit = repo.revparse_single(&self.revision)?.peel_to_commit()?;
        let tree = commit.tree()?;

        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            log::debug!("{} is a root commit, diffing against the empty tree", commit.id());
            None
        };

        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            let side = match delta.status() {
                Delta::Deleted => delta.old_file(),
                _ => delta.new_file(),
            };
            let Some(path) = side.path_bytes() else {
                continue;
            };
            files.push(ChangedFile::new(
                String::from_utf8_lossy(path).into_owned(),
                delta.status().into(),
            ));
        }

        log::info!(
            "Commit {} changed {} file(s)",
            &commit.id().to_string()[..7],
            files.len()
        );
        Ok(files)
    }
}
