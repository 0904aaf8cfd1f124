//! Fixture repositories for unit tests
//!
//! Commits are stored under caller-chosen ids so histories with cycles or
//! dangling parents can be built; nothing here hashes the payloads.

use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use assert_fs::TempDir;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;
use std::path::Path;

/// Pad a short hex name such as `abc123` to a full object id.
pub fn oid(short: &str) -> ObjectId {
    ObjectId::try_parse(format!("{short:0<width$}", width = OBJECT_ID_LENGTH))
        .expect("fixture id is hex")
}

pub fn commit_body(parents: &[&ObjectId], timestamp: i64) -> String {
    let mut lines = vec!["tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string()];
    lines.extend(parents.iter().map(|parent| format!("parent {parent}")));
    lines.push(format!("author John Doe <john@example.com> {timestamp} +0000"));
    lines.push(format!("committer John Doe <john@example.com> {timestamp} +0000"));
    lines.push(String::new());
    lines.push("Fixture commit".to_string());

    lines.join("\n") + "\n"
}

pub struct RepoFixture {
    dir: TempDir,
}

impl RepoFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let git_dir = dir.path().join(".git");
        std::fs::create_dir_all(git_dir.join("objects")).expect("Failed to create objects dir");
        std::fs::create_dir_all(git_dir.join("refs").join("heads"))
            .expect("Failed to create refs dir");
        std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n")
            .expect("Failed to write HEAD");

        RepoFixture { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_object(&self, oid: &ObjectId, payload: &[u8]) {
        let path = self
            .dir
            .path()
            .join(".git")
            .join("objects")
            .join(oid.to_path());
        std::fs::create_dir_all(path.parent().expect("object path has a parent"))
            .expect("Failed to create object dir");

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(payload).expect("Failed to compress");
        std::fs::write(path, encoder.finish().expect("Failed to compress"))
            .expect("Failed to write object");
    }

    /// Store a framed commit under `oid` with the given first parent.
    pub fn commit(&self, oid: &ObjectId, parent: Option<&ObjectId>, timestamp: i64) {
        let parents = parent.into_iter().collect::<Vec<_>>();
        self.merge_commit(oid, &parents, timestamp);
    }

    pub fn merge_commit(&self, oid: &ObjectId, parents: &[&ObjectId], timestamp: i64) {
        let body = commit_body(parents, timestamp);
        let payload = format!("commit {}\0{}", body.len(), body);
        self.write_object(oid, payload.as_bytes());
    }

    pub fn set_branch(&self, name: &str, oid: &ObjectId) {
        let path = self.dir.path().join(".git").join("refs").join("heads").join(name);
        std::fs::create_dir_all(path.parent().expect("ref path has a parent"))
            .expect("Failed to create ref dir");
        std::fs::write(path, format!("{oid}\n")).expect("Failed to write ref");
    }

    pub fn repository(&self) -> Repository {
        Repository::open(self.dir.path(), Box::new(std::io::sink()))
            .expect("Failed to open fixture repository")
    }

    /// Repository whose writer output can be inspected afterwards.
    pub fn repository_with_output(&self) -> (Repository, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let repository = Repository::open(self.dir.path(), Box::new(buffer.clone()))
            .expect("Failed to open fixture repository");

        (repository, buffer)
    }
}

#[derive(Clone, Default)]
pub struct SharedBuffer(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is utf-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
