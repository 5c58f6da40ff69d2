// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

use crate::model::CommitId;

#[derive(Error, Debug)]
pub enum HistoryError {
    /// The repository could not be opened or its HEAD could not be walked
    #[error("history unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("failed to read changes of commit {commit}: {source}")]
    Commit {
        commit: CommitId,
        #[source]
        source: git2::Error,
    },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
