//! Turning a [`CommitGraph`] into a file
//!
//! Layout is left to Graphviz: the graph is handed over as DOT text, either
//! written out as-is or piped through the `dot` program.

use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::errors::{Error, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Graphviz executable used for image output
pub const GRAPHVIZ_PROGRAM: &str = "dot";

/// Output format when the target path has no extension
pub const DEFAULT_IMAGE_FORMAT: &str = "png";

/// Extensions written as plain DOT text
const DOT_EXTENSIONS: [&str; 2] = ["dot", "gv"];

pub trait GraphRenderer {
    fn render(&self, graph: &CommitGraph, path: &Path) -> Result<()>;
}

/// Pick a renderer from the output file extension.
pub fn renderer_for(path: &Path) -> Box<dyn GraphRenderer> {
    match extension(path) {
        Some(ext) if DOT_EXTENSIONS.contains(&ext.as_str()) => Box::new(DotFileRenderer),
        _ => Box::new(GraphvizRenderer::for_path(path)),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn render_failed(path: &Path, reason: impl Into<String>) -> Error {
    Error::RenderFailed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Writes the DOT description itself
#[derive(Debug, Clone, Copy, Default)]
pub struct DotFileRenderer;

impl GraphRenderer for DotFileRenderer {
    fn render(&self, graph: &CommitGraph, path: &Path) -> Result<()> {
        std::fs::write(path, graph.to_dot()).map_err(|e| render_failed(path, e.to_string()))
    }
}

/// Pipes the DOT description through Graphviz
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
    format: String,
}

impl GraphvizRenderer {
    pub fn new(format: impl Into<String>) -> Self {
        GraphvizRenderer {
            program: GRAPHVIZ_PROGRAM.to_string(),
            format: format.into(),
        }
    }

    /// Output format taken from the file extension (`graph.svg` -> `svg`)
    pub fn for_path(path: &Path) -> Self {
        Self::new(extension(path).unwrap_or_else(|| DEFAULT_IMAGE_FORMAT.to_string()))
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, graph: &CommitGraph, path: &Path) -> Result<()> {
        tracing::debug!(program = %self.program, format = %self.format, "running graphviz");

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| render_failed(path, format!("unable to run {}: {e}", self.program)))?;

        // stdin is dropped before waiting so the child sees EOF
        let fed = child
            .stdin
            .take()
            .map(|mut stdin| stdin.write_all(graph.to_dot().as_bytes()))
            .transpose();

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(render_failed(
                path,
                format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        fed.map_err(|e| render_failed(path, format!("unable to feed {}: {e}", self.program)))?;

        Ok(())
    }
}
