use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use std::io::{Cursor, Read, Write};

impl Repository {
    /// Print the body of an object, without its `<type> <size>\0` framing.
    pub fn cat_file(&self, object_id: &str) -> Result<()> {
        let object_id = ObjectId::try_parse(object_id)?;

        // read object file
        let object_data = self.database().load(&object_id)?;
        let mut object_reader = Cursor::new(object_data);
        ObjectType::parse_object_header(&mut object_reader).map_err(|e| {
            Error::CorruptObject {
                oid: object_id.to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut body = Vec::new();
        object_reader.read_to_end(&mut body)?;
        self.writer().write_all(&body)?;

        Ok(())
    }
}
