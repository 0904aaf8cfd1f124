//! Commit ancestry graphs straight from a git object store
//!
//! Reads loose commit objects, walks first-parent history from a reference,
//! keeps the commits made on or after a date, and draws them as a graph.
//!
//! ```no_run
//! use bitgraph::artifacts::graph::renderer::{GraphRenderer, renderer_for};
//! use std::path::Path;
//!
//! # fn main() -> bitgraph::Result<()> {
//! let repo = Path::new("/path/to/project");
//! let start = bitgraph::resolve_ref(None, repo)?;
//! let commits = bitgraph::walk(repo, &start, 1640995200)?;
//! let graph = bitgraph::build_graph(&commits);
//!
//! let output = Path::new("history.png");
//! renderer_for(output).render(&graph, output)?;
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;

#[cfg(test)]
pub(crate) mod test_support;

use crate::areas::repository::Repository;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::log::rev_list::{RevList, WalkOptions};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::path::Path;

pub use crate::artifacts::objects::commit::parse_commit;
pub use crate::errors::{Error, Result};

fn open(repo_path: &Path) -> Result<Repository> {
    Repository::open(repo_path, Box::new(std::io::sink()))
}

/// Inflated payload of the loose object `hash` in the repository at
/// `repo_path`.
pub fn read_object(repo_path: &Path, hash: &str) -> Result<Bytes> {
    let object_id = ObjectId::try_parse(hash)?;

    open(repo_path)?.database().load(&object_id)
}

/// Commit id that `ref_name` (HEAD when `None`) currently points at.
pub fn resolve_ref(ref_name: Option<&str>, repo_path: &Path) -> Result<ObjectId> {
    open(repo_path)?.refs().resolve(ref_name)
}

/// First-parent history from `start`, most recent first, keeping commits
/// whose committer timestamp is at or after `since`.
pub fn walk(repo_path: &Path, start: &ObjectId, since: i64) -> Result<Vec<Commit>> {
    let repository = open(repo_path)?;
    let history = RevList::new(&repository, start.clone(), WalkOptions::since(since)).walk()?;

    Ok(history.commits)
}

/// One node per distinct commit, one edge per parent link inside the set.
pub fn build_graph(commits: &[Commit]) -> CommitGraph {
    CommitGraph::build(commits)
}
