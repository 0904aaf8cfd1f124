//! Core repository components
//!
//! - `database`: Loose object store reader
//! - `refs`: Reference resolution (HEAD, branches, tags, packed refs)
//! - `repository`: Repository handle tying the two together

pub mod database;
pub mod refs;
pub mod repository;
