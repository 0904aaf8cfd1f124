//! Error taxonomy for reading a repository and rendering its history
//!
//! Object-store and parser failures carry the object id they were raised for,
//! so the history walker can decide whether a failure is fatal (entry point)
//! or just the end of the reachable history (a parent further back).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("object {oid} not found at {}", path.display())]
    ObjectNotFound { oid: String, path: PathBuf },

    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: String, reason: String },

    #[error("malformed commit {oid}: {reason}")]
    MalformedCommit { oid: String, reason: String },

    #[error("malformed committer line in commit {oid}: {reason}")]
    MalformedCommitter { oid: String, reason: String },

    #[error("reference {name} not found")]
    RefNotFound { name: String },

    #[error("reference {name} exceeds symbolic ref depth {depth}")]
    RefCycle { name: String, depth: usize },

    #[error("not a git repository: {}", path.display())]
    RepositoryNotFound { path: PathBuf },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("failed to render graph to {}: {reason}", path.display())]
    RenderFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
