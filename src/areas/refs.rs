//! Git references (branches, HEAD, tags)
//!
//! References are human-readable names pointing to commits. They can be:
//! - Direct: containing a commit SHA-1
//! - Symbolic: pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## File Format
//!
//! Loose references are text files containing either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! References that were packed by `git gc` live in `packed-refs`, one
//! `<sha> <refname>` pair per line.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use derive_new::new;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Read-only view over the references of a git directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

static SYMREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SYMREF_REGEX).expect("symref regex is valid"));

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Maximum number of `ref:` hops followed before giving up, as in git
pub const MAX_SYMREF_DEPTH: usize = 5;

/// Lookup prefixes tried for a short name, in git's rev-parse order
const REF_SEARCH_PREFIXES: [&str; 5] = ["", "refs/", "refs/tags/", "refs/heads/", "refs/remotes/"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn as_ref_path(&self) -> &str {
        &self.0
    }

    pub fn is_head(&self) -> bool {
        self.0 == HEAD_REF_NAME
    }

    /// `refs/heads/main` -> `main`
    pub fn short_name(&self) -> &str {
        ["refs/heads/", "refs/tags/", "refs/remotes/", "refs/"]
            .iter()
            .find_map(|prefix| self.0.strip_prefix(prefix))
            .unwrap_or(&self.0)
    }
}

impl std::fmt::Display for SymRefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal representation of a reference value
#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    /// `None` for empty files and for content that is neither form
    fn parse(content: &str) -> Option<SymRefOrOid> {
        let content = content.trim();

        if let Some(symref_match) = SYMREF.captures(content) {
            Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].trim().to_string()),
            })
        } else {
            ObjectId::try_parse(content).ok().map(SymRefOrOid::Oid)
        }
    }
}

impl Refs {
    /// Resolve a reference name (or HEAD when `None`) to the commit it points at.
    ///
    /// Accepts full names (`refs/heads/main`), short names (`main`, `v1.0`,
    /// `origin/main`) and, as a last resort, a literal 40-character hash.
    pub fn resolve(&self, name: Option<&str>) -> Result<ObjectId> {
        let name = name.unwrap_or(HEAD_REF_NAME);
        let mut current = SymRefName::new(name.to_string());

        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.lookup(&current)? {
                Some(SymRefOrOid::Oid(oid)) => {
                    tracing::debug!(reference = name, oid = %oid, "resolved reference");
                    return Ok(oid);
                }
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                None if current.as_ref_path() == name => {
                    return ObjectId::try_parse(name).map_err(|_| Error::RefNotFound {
                        name: name.to_string(),
                    });
                }
                None => {
                    return Err(Error::RefNotFound {
                        name: current.to_string(),
                    });
                }
            }
        }

        Err(Error::RefCycle {
            name: name.to_string(),
            depth: MAX_SYMREF_DEPTH,
        })
    }

    /// Get the last symbolic reference in the chain starting at `source`
    /// (HEAD when `None`); e.g. `refs/heads/main` when HEAD points at main.
    pub fn current_ref(&self, source: Option<SymRefName>) -> Result<SymRefName> {
        let mut current = source.unwrap_or_else(|| SymRefName::new(HEAD_REF_NAME.to_string()));

        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.lookup(&current)? {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                Some(SymRefOrOid::Oid(_)) | None => return Ok(current),
            }
        }

        Err(Error::RefCycle {
            name: current.to_string(),
            depth: MAX_SYMREF_DEPTH,
        })
    }

    /// Find the value stored for `name`, checking loose ref files first and
    /// `packed-refs` second.
    fn lookup(&self, name: &SymRefName) -> Result<Option<SymRefOrOid>> {
        if !Self::is_safe_ref_name(name.as_ref_path()) {
            return Ok(None);
        }

        let candidates = self.candidates(name);

        for candidate in &candidates {
            let path = self.path.join(candidate);
            if path.is_file() {
                let content = std::fs::read_to_string(&path)?;
                let value = SymRefOrOid::parse(&content);
                if value.is_none() {
                    tracing::warn!(reference = %candidate, "ignoring unreadable reference file");
                }
                return Ok(value);
            }
        }

        let packed_refs = self.packed_refs()?;
        Ok(candidates
            .iter()
            .find_map(|candidate| packed_refs.get(candidate))
            .map(|oid| SymRefOrOid::Oid(oid.clone())))
    }

    fn candidates(&self, name: &SymRefName) -> Vec<String> {
        let name = name.as_ref_path();

        if name == HEAD_REF_NAME || name.starts_with("refs/") {
            return vec![name.to_string()];
        }

        // only all-caps names such as ORIG_HEAD live directly in the git dir
        let root_level = name.bytes().all(|b| b.is_ascii_uppercase() || b == b'_');

        REF_SEARCH_PREFIXES
            .iter()
            .filter(|prefix| root_level || !prefix.is_empty())
            .map(|prefix| format!("{prefix}{name}"))
            .chain(std::iter::once(format!("refs/remotes/{name}/{HEAD_REF_NAME}")))
            .collect()
    }

    /// Parse `packed-refs`, skipping comments and peeled-tag (`^`) lines.
    fn packed_refs(&self) -> Result<HashMap<String, ObjectId>> {
        let path = self.packed_refs_path();
        if !path.is_file() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&path)?;

        Ok(content
            .lines()
            .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
            .filter_map(|line| line.split_once(' '))
            .filter_map(|(oid, name)| {
                ObjectId::try_parse(oid)
                    .ok()
                    .map(|oid| (name.trim().to_string(), oid))
            })
            .collect())
    }

    fn is_safe_ref_name(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('/')
            && !name.split('/').any(|component| component.is_empty() || component == "..")
    }

    pub fn packed_refs_path(&self) -> Box<Path> {
        self.path.join("packed-refs").into_boxed_path()
    }
}
