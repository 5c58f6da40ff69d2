// src/history.rs

use crate::error::HistoryError;
use crate::model::*;
use chrono::{TimeZone, Utc};
use git2::{Delta, Repository, Sort};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where to read history from and how to treat the root commit
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    pub repo: PathBuf,
    /// List the files of the root commit instead of treating it as empty
    pub include_root: bool,
}

/// Anything that can enumerate commits and the files each one touched
pub trait HistorySource {
    /// All commits reachable from HEAD, newest first
    fn list_commits(&self) -> Result<Vec<CommitId>, HistoryError>;

    /// Timestamp and touched files of `commit` from a single lookup
    fn read_commit(&self, commit: CommitId) -> Result<CommitInfo, HistoryError>;

    /// Files touched by `commit`; empty for merges and (by default) the root commit
    fn changed_files(&self, commit: CommitId) -> Result<ChangeSet, HistoryError> {
        self.read_commit(commit).map(|info| info.files)
    }
}

pub struct GitHistory {
    repo: Repository,
    options: HistoryOptions,
}

impl GitHistory {
    pub fn open(options: HistoryOptions) -> Result<Self, HistoryError> {
        // Like git itself, walk up from a subdirectory to the enclosing repository
        let repo = Repository::discover(&options.repo).map_err(|source| HistoryError::Unavailable {
            path: options.repo.clone(),
            source,
        })?;
        debug!(path = %repo.path().display(), "opened repository");
        Ok(Self { repo, options })
    }

    fn unavailable(&self, source: git2::Error) -> HistoryError {
        HistoryError::Unavailable { path: self.options.repo.clone(), source }
    }
}

impl HistorySource for GitHistory {
    fn list_commits(&self) -> Result<Vec<CommitId>, HistoryError> {
        // An unborn HEAD has no history to walk
        if self.repo.is_empty().map_err(|e| self.unavailable(e))? {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk().map_err(|e| self.unavailable(e))?;
        revwalk.set_sorting(Sort::TIME).map_err(|e| self.unavailable(e))?;
        revwalk.push_head().map_err(|e| self.unavailable(e))?;

        revwalk
            .map(|oid| oid.map_err(|e| self.unavailable(e)))
            .collect()
    }

    fn read_commit(&self, commit: CommitId) -> Result<CommitInfo, HistoryError> {
        let wrap = |source| HistoryError::Commit { commit, source };
        let current = self.repo.find_commit(commit).map_err(wrap)?;
        let timestamp = current.time().seconds();

        let parent_tree = match current.parent_count() {
            0 if self.options.include_root => None,
            1 => Some(current.parent(0).and_then(|p| p.tree()).map_err(wrap)?),
            _ => {
                return Ok(CommitInfo { id: commit, timestamp, files: ChangeSet::new() });
            }
        };
        let current_tree = current.tree().map_err(wrap)?;

        // No rename detection: a rename shows up as a deletion plus an addition
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&current_tree), None)
            .map_err(wrap)?;

        let mut files = ChangeSet::new();
        for delta in diff.deltas() {
            let file = match delta.status() {
                Delta::Deleted => delta.old_file(),
                _ => delta.new_file(),
            };
            match file.path().and_then(|p| p.to_str()) {
                Some(path) => {
                    files.insert(path.to_string());
                }
                None => warn!(%commit, "skipping change entry with a non UTF-8 path"),
            }
        }
        Ok(CommitInfo { id: commit, timestamp, files })
    }
}

/// Reads every commit and its change set from `source`
pub fn collect<S: HistorySource>(source: &S) -> Result<History, HistoryError> {
    let ids = source.list_commits()?;

    let bar = ProgressBar::new(ids.len() as u64);
    bar.set_message("Reading commits");

    let mut commits = Vec::with_capacity(ids.len());
    for id in ids {
        let info = source.read_commit(id)?;
        debug!(commit = %info.id, files = info.files.len(), "read commit");
        commits.push(info);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let history = History { commits };
    match history.time_span() {
        Some((start, end)) => info!(
            commits = history.commits.len(),
            "history spans from {} to {}",
            format_time(start),
            format_time(end)
        ),
        None => info!("repository has no commits"),
    }
    Ok(history)
}

fn format_time(seconds: i64) -> String {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map_or_else(|| seconds.to_string(), |t| t.to_rfc2822())
}
