//! Loose object store
//!
//! Reads zlib-compressed objects from `<git-dir>/objects/<2-hex>/<38-hex>`.
//! Nothing here ever writes to the store.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::{Cursor, ErrorKind, Read};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

// TODO: fall back to pack files (objects/pack/*.idx) when a loose object is missing
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Inflate the object named by `object_id`.
    ///
    /// Never returns an empty payload: an object that inflates to nothing is
    /// reported as corrupt.
    pub fn load(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        self.read_object(object_id, object_path)
    }

    /// Like [`Database::load`], but also checks that the payload hashes back to
    /// `object_id`.
    pub fn load_verified(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_content = self.load(object_id)?;
        let actual = ObjectId::digest(&object_content);

        if &actual != object_id {
            return Err(Error::CorruptObject {
                oid: object_id.to_string(),
                reason: format!("content hashes to {actual}"),
            });
        }

        Ok(object_content)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId, verify: bool) -> Result<Commit> {
        let object_content = if verify {
            self.load_verified(object_id)?
        } else {
            self.load(object_id)?
        };

        Commit::deserialize(object_id, Cursor::new(object_content))
    }

    fn read_object(&self, object_id: &ObjectId, object_path: PathBuf) -> Result<Bytes> {
        tracing::debug!(oid = %object_id, path = %object_path.display(), "reading object");

        // read the object file
        let object_content = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound {
                    oid: object_id.to_string(),
                    path: object_path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        // decompress the object content
        let object_content =
            Self::decompress(object_content.into()).map_err(|e| Error::CorruptObject {
                oid: object_id.to_string(),
                reason: format!("unable to decompress object content: {e}"),
            })?;

        if object_content.is_empty() {
            return Err(Error::CorruptObject {
                oid: object_id.to_string(),
                reason: "object inflates to no data".to_string(),
            });
        }

        Ok(object_content)
    }

    fn decompress(data: Bytes) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }
}
