use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

/// `<type> <size>\0` prefix of a loose object payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHeader {
    pub object_type: ObjectType,
    pub size: usize,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Parse the framing header and leave the reader positioned on the body.
    ///
    /// Returns `Ok(None)` without consuming anything when the payload does not
    /// start with a known `<type> <size>\0` header (a bare body).
    pub fn parse_object_header(
        data_reader: &mut impl BufRead,
    ) -> anyhow::Result<Option<ObjectHeader>> {
        let buffer = data_reader.fill_buf()?;

        let Some(nul) = buffer.iter().position(|&b| b == b'\0') else {
            return Ok(None);
        };
        let Ok(header) = std::str::from_utf8(&buffer[..nul]) else {
            return Ok(None);
        };
        let Some((object_type, size)) = header.split_once(' ') else {
            return Ok(None);
        };
        let (Ok(object_type), Ok(size)) =
            (ObjectType::try_from(object_type), size.parse::<usize>())
        else {
            return Ok(None);
        };

        data_reader.consume(nul + 1);

        Ok(Some(ObjectHeader { object_type, size }))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            "tag" => Ok(ObjectType::Tag),
            _ => Err(anyhow::anyhow!("Invalid object type {value}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
