use assert_fs::TempDir;
use fake::Fake;
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use rstest::fixture;
use sha1::{Digest, Sha1};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Repository laid out the way `git init` leaves it, with objects written as
/// real zlib-compressed, SHA-1 addressed loose objects.
pub struct TestRepo {
    dir: TempDir,
}

#[fixture]
pub fn test_repo() -> TestRepo {
    TestRepo::new()
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let git_dir = dir.path().join(".git");

        for sub_dir in ["objects", "refs/heads", "refs/tags"] {
            std::fs::create_dir_all(git_dir.join(sub_dir))
                .unwrap_or_else(|e| panic!("Failed to create {sub_dir}: {e}"));
        }
        std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n")
            .expect("Failed to write HEAD");

        TestRepo { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git_dir(&self) -> PathBuf {
        self.dir.path().join(".git")
    }

    pub fn object_path(&self, oid: &str) -> PathBuf {
        self.git_dir().join("objects").join(&oid[..2]).join(&oid[2..])
    }

    /// Store a framed object and return its id.
    pub fn write_object(&self, object_type: &str, body: &[u8]) -> String {
        let mut payload = format!("{object_type} {}\0", body.len()).into_bytes();
        payload.extend_from_slice(body);

        let mut hasher = Sha1::new();
        hasher.update(&payload);
        let oid = format!("{:x}", hasher.finalize());

        self.write_raw_object(&oid, &payload);
        oid
    }

    /// Store `payload` compressed under an arbitrary id.
    pub fn write_raw_object(&self, oid: &str, payload: &[u8]) {
        let path = self.object_path(oid);
        std::fs::create_dir_all(path.parent().expect("object path has a parent"))
            .expect("Failed to create object dir");

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(payload).expect("Failed to compress object");
        std::fs::write(&path, encoder.finish().expect("Failed to compress object"))
            .unwrap_or_else(|e| panic!("Failed to write object {path:?}: {e}"));
    }

    pub fn commit(&self, parents: &[&str], timestamp: i64, message: &str) -> String {
        let name: String = Name().fake();
        let email: String = FreeEmail().fake();
        let tree = self.write_object("tree", b"");

        let mut lines = vec![format!("tree {tree}")];
        lines.extend(parents.iter().map(|parent| format!("parent {parent}")));
        lines.push(format!("author {name} <{email}> {timestamp} +0000"));
        lines.push(format!("committer {name} <{email}> {timestamp} +0000"));
        lines.push(String::new());
        lines.push(message.to_string());

        self.write_object("commit", (lines.join("\n") + "\n").as_bytes())
    }

    /// Linear history with one commit per timestamp, oldest first.
    /// Returns the ids in the same order and points `main` at the last one.
    pub fn linear_history(&self, timestamps: &[i64]) -> Vec<String> {
        let mut oids: Vec<String> = Vec::new();

        for (index, timestamp) in timestamps.iter().enumerate() {
            let parents = oids.last().map(|p| vec![p.as_str()]).unwrap_or_default();
            let oid = self.commit(&parents, *timestamp, &format!("Commit {}", index + 1));
            oids.push(oid);
        }

        if let Some(tip) = oids.last() {
            self.set_ref("refs/heads/main", tip);
        }
        oids
    }

    pub fn set_ref(&self, name: &str, content: &str) {
        let path = self.git_dir().join(name);
        std::fs::create_dir_all(path.parent().expect("ref path has a parent"))
            .expect("Failed to create ref dir");
        std::fs::write(path, format!("{content}\n")).expect("Failed to write ref");
    }

    pub fn write_config(&self, output: &Path, commit_date: &str) -> PathBuf {
        let config = serde_json::json!({
            "repo_path": self.path(),
            "output_image_path": output,
            "commit_date": commit_date,
        });
        let path = self.path().join("config.json");
        std::fs::write(&path, config.to_string()).expect("Failed to write config");
        path
    }
}
