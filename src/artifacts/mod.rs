//! Git data structures and algorithms
//!
//! - `graph`: Commit graph construction and rendering
//! - `log`: Commit history traversal and filtering
//! - `objects`: Object ids and commit decoding

pub mod graph;
pub mod log;
pub mod objects;
