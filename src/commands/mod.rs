//! Command implementations
//!
//! Commands are `impl Repository` blocks, split the way git splits them:
//!
//! - `plumbing`: Low-level object and reference inspection (cat-file, rev-parse)
//! - `porcelain`: User-facing history views (log, render)

pub mod plumbing;
pub mod porcelain;
