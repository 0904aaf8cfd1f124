use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt;

const LABEL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DOT_HEADER: &str =
    "digraph commits {\n    rankdir=TB;\n    node [shape=box, fontname=\"monospace\"];\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: ObjectId,
    pub label: String,
    pub timestamp: i64,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Child to first parent
    Parent,
    /// Merge commit to one of its second or later parents
    Merge,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Parent => write!(f, "parent"),
            EdgeKind::Merge => write!(f, "merge"),
        }
    }
}

/// Directed edge from a child commit to one of its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<'g> {
    pub from: &'g ObjectId,
    pub to: &'g ObjectId,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphOptions {
    /// Also draw edges to second and later parents of merge commits
    pub merge_edges: bool,
}

/// Induced subgraph of the commit ancestry over a set of commits
///
/// Node indices follow the order of the input list; edges to commits outside
/// the set are dropped.
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    graph: DiGraph<Node, EdgeKind>,
    index: HashMap<ObjectId, NodeIndex>,
}

impl CommitGraph {
    pub fn build(commits: &[Commit]) -> Self {
        Self::build_with(commits, GraphOptions::default())
    }

    pub fn build_with(commits: &[Commit], options: GraphOptions) -> Self {
        let mut commit_graph = CommitGraph::default();

        let mut added = Vec::with_capacity(commits.len());
        for commit in commits {
            if commit_graph.index.contains_key(commit.oid()) {
                continue;
            }

            let node = commit_graph.graph.add_node(Node {
                id: commit.oid().clone(),
                label: Self::label(added.len() + 1, commit),
                timestamp: commit.committer_timestamp(),
            });
            commit_graph.index.insert(commit.oid().clone(), node);
            added.push((node, commit));
        }

        for (node, commit) in added {
            if let Some(parent) = commit.parent() {
                commit_graph.link(node, parent, EdgeKind::Parent);
            }

            if options.merge_edges {
                for parent in commit.merge_parents() {
                    commit_graph.link(node, parent, EdgeKind::Merge);
                }
            }
        }

        commit_graph
    }

    fn link(&mut self, child: NodeIndex, parent: &ObjectId, kind: EdgeKind) {
        if let Some(&parent) = self.index.get(parent) {
            self.graph.add_edge(child, parent, kind);
        }
    }

    fn label(number: usize, commit: &Commit) -> String {
        let date = chrono::DateTime::from_timestamp(commit.committer_timestamp(), 0)
            .map(|date| date.format(LABEL_DATE_FORMAT).to_string())
            .unwrap_or_else(|| commit.committer_timestamp().to_string());

        format!("Commit {number}\n{}\n{date}", commit.oid().to_short_oid())
    }

    pub fn node(&self, id: &ObjectId) -> Option<&Node> {
        self.index.get(id).map(|&index| &self.graph[index])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.graph.edge_references().map(|edge| Edge {
            from: &self.graph[edge.source()].id,
            to: &self.graph[edge.target()].id,
            kind: *edge.weight(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Graphviz DOT description of the graph
    ///
    /// Line breaks in labels are emitted as left-justified `\l` breaks.
    pub fn to_dot(&self) -> String {
        format!(
            "{DOT_HEADER}{}}}\n",
            Dot::with_attr_getters(
                &self.graph,
                &[Config::EdgeNoLabel, Config::GraphContentOnly],
                &|_, edge| match edge.weight() {
                    EdgeKind::Parent => String::new(),
                    EdgeKind::Merge => "style=dashed".to_string(),
                },
                &|_, _| String::new(),
            )
        )
    }
}
