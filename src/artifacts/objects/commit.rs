//! Git commit object
//!
//! Only the header fields needed to walk and draw history are decoded:
//! the parent link(s) and the committer line. Everything else (tree, author,
//! gpgsig, encoding, ...) is skipped.
//!
//! ## Format
//!
//! On disk (after inflating):
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The `commit <size>\0` framing is optional here; bare header bodies are
//! accepted as well.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::{ObjectHeader, ObjectType};
use crate::errors::{Error, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::io::{BufRead, Cursor, Read};

const PARENT_FIELD: &str = "parent";
const COMMITTER_FIELD: &str = "committer";

/// Commit record reconstructed from a loose object
///
/// The id is the one the object was looked up by; it is not re-derived from
/// the content (see `Database::load_verified` for the checked variant).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    oid: ObjectId,
    /// First parent, `None` for a root commit or when the first `parent`
    /// line does not name an object
    parent: Option<ObjectId>,
    /// Raw first `parent` value that is not a valid object id
    unresolved_parent: Option<String>,
    /// Second and later parents of a merge commit
    merge_parents: Vec<ObjectId>,
    committer_timestamp: i64,
    committer_offset: Option<FixedOffset>,
    committer_line: String,
}

impl Commit {
    pub fn new(
        oid: ObjectId,
        parent: Option<ObjectId>,
        committer_timestamp: i64,
        committer_line: String,
    ) -> Self {
        Commit {
            oid,
            parent,
            unresolved_parent: None,
            merge_parents: Vec::new(),
            committer_timestamp,
            committer_offset: None,
            committer_line,
        }
    }

    pub fn with_merge_parents(mut self, merge_parents: Vec<ObjectId>) -> Self {
        self.merge_parents = merge_parents;
        self
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    /// First parent as written, when it could not be read as an object id.
    /// History ends at such a commit.
    pub fn unresolved_parent(&self) -> Option<&str> {
        self.unresolved_parent.as_deref()
    }

    pub fn merge_parents(&self) -> &[ObjectId] {
        &self.merge_parents
    }

    /// All parents in header order
    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.merge_parents.iter())
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.unresolved_parent.is_none()
    }

    pub fn committer_timestamp(&self) -> i64 {
        self.committer_timestamp
    }

    /// The raw committer line, kept for diagnostics
    pub fn committer_line(&self) -> &str {
        &self.committer_line
    }

    /// `Name <email>` part of the committer line
    pub fn committer_identity(&self) -> &str {
        let line = self
            .committer_line
            .strip_prefix(COMMITTER_FIELD)
            .unwrap_or(&self.committer_line);

        line.trim()
            .rsplitn(3, ' ')
            .nth(2)
            .map(str::trim)
            .unwrap_or_default()
    }

    /// Commit time in the committer's own timezone, or UTC when the
    /// timezone token was unreadable.
    pub fn committed_at(&self) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::<Utc>::from_timestamp(self.committer_timestamp, 0)?;
        let offset = self.committer_offset.unwrap_or_else(|| Utc.fix());

        Some(utc.with_timezone(&offset))
    }

    /// Decode a commit from a (possibly framed) payload.
    ///
    /// Header lines are read as `(key, rest-of-line)` pairs up to the first
    /// blank line; unknown keys are ignored.
    pub fn deserialize(oid: &ObjectId, mut reader: impl BufRead) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedCommit {
            oid: oid.to_string(),
            reason,
        };

        let header =
            ObjectType::parse_object_header(&mut reader).map_err(|e| malformed(e.to_string()))?;
        let declared_size = match header {
            Some(ObjectHeader {
                object_type: ObjectType::Commit,
                size,
            }) => Some(size),
            None => None,
            Some(ObjectHeader { object_type, .. }) => {
                return Err(malformed(format!("expected a commit, found a {object_type}")));
            }
        };

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        if let Some(declared) = declared_size
            && declared != content.len()
        {
            tracing::warn!(
                oid = %oid,
                declared,
                actual = content.len(),
                "commit size header disagrees with payload"
            );
        }
        let content = String::from_utf8_lossy(&content);

        if content.trim().is_empty() {
            return Err(malformed("empty commit payload".to_string()));
        }

        let mut parents = Vec::new();
        let mut committer_line = None;

        for (key, value) in header_fields(&content) {
            match key {
                PARENT_FIELD => parents.push(value.trim()),
                COMMITTER_FIELD if committer_line.is_none() => committer_line = Some(value),
                _ => {}
            }
        }

        let committer_line = committer_line.ok_or_else(|| Error::MalformedCommitter {
            oid: oid.to_string(),
            reason: "missing committer line".to_string(),
        })?;
        let (committer_timestamp, committer_offset) = parse_committer(oid, committer_line)?;

        let mut parents = parents.into_iter().map(|raw| {
            ObjectId::try_parse(raw).map_err(|e| {
                tracing::warn!(oid = %oid, parent = raw, error = %e, "unreadable parent id");
                raw.to_string()
            })
        });
        let (parent, unresolved_parent) = match parents.next() {
            Some(Ok(parent)) => (Some(parent), None),
            Some(Err(raw)) => (None, Some(raw)),
            None => (None, None),
        };

        Ok(Commit {
            oid: oid.clone(),
            parent,
            unresolved_parent,
            merge_parents: parents.filter_map(|parent| parent.ok()).collect(),
            committer_timestamp,
            committer_offset,
            committer_line: format!("{COMMITTER_FIELD} {committer_line}"),
        })
    }
}

/// Decode raw object bytes into a commit identified by `oid`.
pub fn parse_commit(raw_bytes: &[u8], oid: &ObjectId) -> Result<Commit> {
    Commit::deserialize(oid, Cursor::new(raw_bytes))
}

/// Split the header section into `(key, rest-of-line)` pairs.
///
/// Continuation lines (leading space, as used by `gpgsig` and `mergetag`)
/// belong to the previous field and are skipped.
fn header_fields(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content
        .lines()
        .take_while(|line| !line.is_empty())
        .filter(|line| !line.starts_with(' '))
        .map(|line| line.split_once(' ').unwrap_or((line, "")))
}

/// Extract the epoch seconds (second-to-last token) and timezone (last token)
/// from `<name> <email> <epoch-seconds> <timezone-offset>`.
fn parse_committer(oid: &ObjectId, line: &str) -> Result<(i64, Option<FixedOffset>)> {
    let malformed = |reason: String| Error::MalformedCommitter {
        oid: oid.to_string(),
        reason,
    };

    let mut tokens = line.split_whitespace().rev();
    let (Some(timezone), Some(timestamp)) = (tokens.next(), tokens.next()) else {
        return Err(malformed(format!("missing timestamp in '{line}'")));
    };

    let timestamp = timestamp
        .parse::<i64>()
        .map_err(|_| malformed(format!("invalid timestamp '{timestamp}'")))?;
    if timestamp < 0 {
        return Err(malformed(format!("negative timestamp {timestamp}")));
    }

    Ok((timestamp, parse_timezone(timezone)))
}

/// Parse a `+hhmm` / `-hhmm` offset.
fn parse_timezone(timezone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match timezone.split_at_checked(1)? {
        ("+", digits) => (1, digits),
        ("-", digits) => (-1, digits),
        _ => return None,
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
