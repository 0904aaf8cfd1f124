//! Git object types and decoding
//!
//! Objects are addressed by the SHA-1 hash of their framed payload
//! (`<type> <size>\0<content>`). Only commits are decoded; blobs, trees and
//! tags are recognised by their framing header but never parsed.

pub mod commit;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated hash used for display
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
