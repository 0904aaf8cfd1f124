use crate::areas::refs::SymRefName;
use crate::areas::repository::Repository;
use crate::artifacts::graph::commit_graph::{CommitGraph, GraphOptions};
use crate::artifacts::graph::renderer::GraphRenderer;
use crate::artifacts::log::rev_list::WalkOptions;
use crate::errors::Result;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub reference: Option<String>,
    pub output_path: PathBuf,
    pub walk: WalkOptions,
    pub graph: GraphOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub traversed: usize,
    pub nodes: usize,
    pub edges: usize,
}

impl Repository {
    /// Walk the history behind `opts.reference`, keep the commits on or after
    /// `opts.walk.since`, and hand the resulting graph to `renderer`.
    pub fn render(
        &self,
        opts: &RenderOptions,
        renderer: &dyn GraphRenderer,
    ) -> Result<RenderSummary> {
        let history = self.history(opts.reference.as_deref(), opts.walk)?;
        let graph = CommitGraph::build_with(&history.commits, opts.graph);
        if graph.is_empty() {
            tracing::warn!(
                since = opts.walk.since,
                traversed = history.traversed,
                "no commits on or after the requested date"
            );
        }

        renderer.render(&graph, &opts.output_path)?;

        let summary = RenderSummary {
            traversed: history.traversed,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        };
        let start = self
            .refs()
            .current_ref(opts.reference.clone().map(SymRefName::new))
            .map(|name| name.short_name().to_string())
            .unwrap_or_default();
        tracing::info!(
            reference = %start,
            output = %opts.output_path.display(),
            traversed = summary.traversed,
            nodes = summary.nodes,
            edges = summary.edges,
            "rendered commit graph"
        );

        writeln!(
            self.writer(),
            "Rendered {} commits ({} edges) to {}",
            summary.nodes,
            summary.edges,
            opts.output_path.display()
        )?;

        Ok(summary)
    }
}
