//! Commit ancestry graphs
//!
//! - `commit_graph`: builds the node/edge set from a list of commits
//! - `renderer`: writes a graph out as DOT text or a Graphviz image

pub mod commit_graph;
pub mod renderer;
