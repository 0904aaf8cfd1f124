use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::{History, RevList, WalkOptions};
use crate::artifacts::objects::commit::Commit;
use crate::errors::Result;
use std::io::Write;

const READABLE_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub reference: Option<String>,
    pub walk: WalkOptions,
    pub oneline: bool,
}

impl Repository {
    /// Resolve `reference` (HEAD when `None`) and walk its history.
    pub fn history(&self, reference: Option<&str>, options: WalkOptions) -> Result<History> {
        let start = self.refs().resolve(reference)?;

        RevList::new(self, start, options).walk()
    }

    pub fn log(&self, opts: &LogOptions) -> Result<History> {
        let history = self.history(opts.reference.as_deref(), opts.walk)?;

        for (index, commit) in history.commits.iter().enumerate() {
            if opts.oneline {
                self.show_commit_oneline(commit)?;
            } else {
                if index > 0 {
                    writeln!(self.writer())?;
                }
                self.show_commit_medium(commit)?;
            }
        }

        Ok(history)
    }

    fn show_commit_medium(&self, commit: &Commit) -> Result<()> {
        writeln!(self.writer(), "commit {}", commit.oid())?;
        if !commit.merge_parents().is_empty() {
            let parents = commit
                .parents()
                .map(|parent| parent.to_short_oid())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.writer(), "Merge: {parents}")?;
        }
        writeln!(self.writer(), "Committer: {}", commit.committer_identity())?;
        writeln!(self.writer(), "Date:   {}", Self::readable_date(commit))?;

        Ok(())
    }

    fn show_commit_oneline(&self, commit: &Commit) -> Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            commit.oid().to_short_oid(),
            Self::readable_date(commit)
        )?;

        Ok(())
    }

    fn readable_date(commit: &Commit) -> String {
        commit
            .committed_at()
            .map(|date| date.format(READABLE_DATE_FORMAT).to_string())
            .unwrap_or_else(|| commit.committer_timestamp().to_string())
    }
}
