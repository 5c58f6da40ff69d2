// src/model.rs

use std::collections::BTreeSet;

/// Repository-relative path of a file as recorded by one commit
pub type FileId = String;

/// Identifies a commit in the history
pub type CommitId = git2::Oid;

/// Every file touched by one commit
pub type ChangeSet = BTreeSet<FileId>;

/// A maximal set of files linked by shared change sets
pub type Group = BTreeSet<FileId>;

/// Disjoint groups covering every observed file, in discovery order
pub type Partition = Vec<Group>;

/// A single commit and the files it touched
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: CommitId,
    pub timestamp: i64,
    pub files: ChangeSet,
}

/// The collected history, newest commit first
#[derive(Debug, Default)]
pub struct History {
    pub commits: Vec<CommitInfo>,
}

impl History {
    pub fn change_sets(&self) -> impl Iterator<Item = &ChangeSet> {
        self.commits.iter().map(|c| &c.files)
    }

    /// Oldest and newest commit timestamps, if there are any commits
    pub fn time_span(&self) -> Option<(i64, i64)> {
        let start = self.commits.iter().map(|c| c.timestamp).min()?;
        let end = self.commits.iter().map(|c| c.timestamp).max()?;
        Some((start, end))
    }
}
