//! Plumbing commands (low-level Git operations)
//!
//! ## Commands
//!
//! - `cat-file`: Print the inflated body of an object
//! - `rev-parse`: Resolve a reference name to an object id

pub mod cat_file;
pub mod rev_parse;
