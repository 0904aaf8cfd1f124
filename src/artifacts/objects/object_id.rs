//! Git object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings naming loose objects.
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHORT_OBJECT_ID_LENGTH};
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Git object identifier (SHA-1 hash)
///
/// Always 40 lowercase hex characters once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Upper-case hex digits are accepted and normalized to lower case.
    pub fn try_parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::InvalidObjectId(format!(
                "expected {OBJECT_ID_LENGTH} characters, got {}: {id}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidObjectId(format!("non-hex characters: {id}")));
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Compute the id git would assign to a framed object payload
    /// (`<type> <size>\0<body>`).
    pub fn digest(payload: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(payload);

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(SHORT_OBJECT_ID_LENGTH).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}
