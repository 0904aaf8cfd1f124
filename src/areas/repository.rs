use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::errors::{Error, Result};
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Handle on a git directory, passed explicitly to every operation.
pub struct Repository {
    path: Box<Path>,
    git_dir: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    refs: Refs,
}

impl Repository {
    /// Open a repository from either a work tree containing `.git/` or a
    /// bare git directory.
    pub fn open(path: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let path = path.as_ref();
        let path = path.canonicalize().map_err(|_| Error::RepositoryNotFound {
            path: path.to_path_buf(),
        })?;

        let git_dir = [path.join(".git"), path.clone()]
            .into_iter()
            .find(|candidate| Self::is_git_dir(candidate))
            .ok_or_else(|| Error::RepositoryNotFound { path: path.clone() })?;

        tracing::debug!(git_dir = %git_dir.display(), "opened repository");

        let database = Database::new(git_dir.join("objects").into_boxed_path());
        let refs = Refs::new(git_dir.clone().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            git_dir: git_dir.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            refs,
        })
    }

    fn is_git_dir(path: &Path) -> bool {
        path.join("HEAD").is_file() && path.join("objects").is_dir()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
