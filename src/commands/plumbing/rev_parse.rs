use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::io::Write;

impl Repository {
    /// Resolve `name` (HEAD when `None`) and print the object id.
    pub fn rev_parse(&self, name: Option<&str>) -> Result<ObjectId> {
        let object_id = self.refs().resolve(name)?;
        writeln!(self.writer(), "{object_id}")?;

        Ok(object_id)
    }
}
