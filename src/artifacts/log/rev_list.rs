use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use derive_new::new;
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// Knobs for a history walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    /// Inclusive lower bound on the committer timestamp (Unix seconds)
    pub since: i64,
    /// Stop after this many commits have been traversed
    pub max_depth: Option<NonZeroUsize>,
    /// Check every object against its content address while walking
    pub verify_hashes: bool,
}

impl WalkOptions {
    pub fn since(since: i64) -> Self {
        WalkOptions {
            since,
            ..Default::default()
        }
    }

    pub fn accepts(&self, commit: &Commit) -> bool {
        commit.committer_timestamp() >= self.since
    }
}

/// Result of a history walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    /// Commits that passed the date filter, most recent first
    pub commits: Vec<Commit>,
    /// Number of commits read, filtered or not
    pub traversed: usize,
}

/// First-parent walk starting at `start`
///
/// Yields every commit it reads, filtered or not. The date filter is a
/// projection applied by [`RevList::walk`], never a reason to stop early.
#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    start: ObjectId,
    options: WalkOptions,
}

impl<'r> RevList<'r> {
    pub fn into_iter(self) -> RevListIntoIter<'r> {
        RevListIntoIter {
            repository: self.repository,
            current_commit_oid: Some(self.start),
            options: self.options,
            seen: HashSet::new(),
        }
    }

    /// Walk to the end of the reachable history and keep the commits at or
    /// after `options.since`.
    ///
    /// A failure to read the start commit is returned; failures further back
    /// end the walk with what was collected so far.
    pub fn walk(self) -> Result<History> {
        let options = self.options;
        let mut commits = Vec::new();
        let mut traversed = 0;

        for commit in self.into_iter() {
            let commit = commit?;
            traversed += 1;

            if options.accepts(&commit) {
                commits.push(commit);
            }
        }

        tracing::debug!(traversed, kept = commits.len(), "history walk finished");

        Ok(History { commits, traversed })
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    current_commit_oid: Option<ObjectId>,
    options: WalkOptions,
    seen: HashSet<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        if self
            .options
            .max_depth
            .is_some_and(|max_depth| self.seen.len() >= max_depth.get())
        {
            tracing::debug!(oid = %commit_oid, "walk depth limit reached");
            return None;
        }

        if !self.seen.insert(commit_oid.clone()) {
            tracing::warn!(oid = %commit_oid, "history revisits a commit, stopping walk");
            return None;
        }

        match self
            .repository
            .database()
            .parse_object_as_commit(&commit_oid, self.options.verify_hashes)
        {
            Ok(commit) => {
                tracing::debug!(
                    oid = %commit_oid,
                    timestamp = commit.committer_timestamp(),
                    "walked commit"
                );
                // Move to the parent commit for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok(commit))
            }
            // the entry point itself is broken
            Err(e) if self.seen.len() == 1 => Some(Err(e)),
            Err(e) => {
                tracing::warn!(oid = %commit_oid, error = %e, "history ends at unreadable commit");
                None
            }
        }
    }
}
