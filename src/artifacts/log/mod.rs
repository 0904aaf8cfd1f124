//! Commit history traversal
//!
//! `rev_list` walks first-parent history from a starting commit, guarding
//! against cycles and treating unreadable ancestors as the end of history.

pub mod rev_list;
