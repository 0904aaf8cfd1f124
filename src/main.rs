use anyhow::{Context, Result};
use bitgraph::areas::repository::Repository;
use bitgraph::artifacts::graph::commit_graph::GraphOptions;
use bitgraph::artifacts::graph::renderer::renderer_for;
use bitgraph::artifacts::log::rev_list::WalkOptions;
use bitgraph::commands::porcelain::log::LogOptions;
use bitgraph::commands::porcelain::render::RenderOptions;
use bitgraph::config::{CommitDate, Config};
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bitgraph",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Draw the commit ancestry of a git repository",
    long_about = "Reads loose commit objects straight from a repository's object store, \
    walks the history behind a reference and renders the commits made on or after \
    a given date as a directed graph.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "render",
        about = "Render the commit graph to an image",
        long_about = "This command walks the history behind a reference and renders the commits \
        made on or after the given date. Settings come from a JSON config file and/or flags; \
        flags win. Output paths ending in .dot or .gv get DOT text, anything else goes \
        through Graphviz."
    )]
    Render {
        #[arg(
            short,
            long,
            help = "JSON config file with repo_path, output_image_path and commit_date"
        )]
        config: Option<PathBuf>,
        #[arg(long, help = "The path to the repository")]
        repo: Option<PathBuf>,
        #[arg(short, long, help = "Where to write the rendered graph")]
        output: Option<PathBuf>,
        #[arg(short, long, help = "Only keep commits made on or after this date (YYYY-MM-DD)")]
        since: Option<CommitDate>,
        #[arg(short = 'r', long = "ref", help = "The reference to start from (defaults to HEAD)")]
        reference: Option<String>,
        #[arg(long, help = "Stop after walking this many commits")]
        max_depth: Option<NonZeroUsize>,
        #[arg(long, help = "Check every object against its hash while walking")]
        verify: bool,
        #[arg(long, help = "Also draw edges to the other parents of merge commits")]
        merge_edges: bool,
    },
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command lists the first-parent history of the current repository, \
        most recent first."
    )]
    Log {
        #[arg(index = 1, help = "The reference to start from (defaults to HEAD)")]
        reference: Option<String>,
        #[arg(short, long, help = "Only show commits made on or after this date (YYYY-MM-DD)")]
        since: Option<CommitDate>,
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "rev-parse",
        about = "Print the object id a reference points at"
    )]
    RevParse {
        #[arg(index = 1, help = "The reference to resolve (defaults to HEAD)")]
        reference: Option<String>,
    },
}

fn open_current_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Ok(Repository::open(&pwd, Box::new(std::io::stdout()))?)
}

#[allow(clippy::too_many_arguments)]
fn render(
    config: Option<PathBuf>,
    repo: Option<PathBuf>,
    output: Option<PathBuf>,
    since: Option<CommitDate>,
    reference: Option<String>,
    max_depth: Option<NonZeroUsize>,
    verify: bool,
    merge_edges: bool,
) -> Result<()> {
    let config = config.as_deref().map(Config::load).transpose()?;

    let repo = repo
        .or_else(|| config.as_ref().map(|c| c.repo_path.clone()))
        .context("no repository given: pass --repo or a config file with repo_path")?;
    let output_path = output
        .or_else(|| config.as_ref().map(|c| c.output_image_path.clone()))
        .context("no output given: pass --output or a config file with output_image_path")?;
    let since = since
        .or_else(|| config.as_ref().map(|c| c.commit_date))
        .context("no date given: pass --since or a config file with commit_date")?;

    let opts = RenderOptions {
        reference: reference.or_else(|| config.as_ref().and_then(|c| c.reference.clone())),
        walk: WalkOptions {
            since: since.timestamp(),
            max_depth: max_depth.or_else(|| config.as_ref().and_then(|c| c.max_depth)),
            verify_hashes: verify || config.as_ref().is_some_and(|c| c.verify_hashes),
        },
        graph: GraphOptions {
            merge_edges: merge_edges || config.as_ref().is_some_and(|c| c.merge_edges),
        },
        output_path,
    };

    let repository = Repository::open(&repo, Box::new(std::io::stdout()))
        .with_context(|| format!("Unable to open repository {}", repo.display()))?;
    let renderer = renderer_for(&opts.output_path);
    repository.render(&opts, renderer.as_ref())?;

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config,
            repo,
            output,
            since,
            reference,
            max_depth,
            verify,
            merge_edges,
        } => render(
            config,
            repo,
            output,
            since,
            reference,
            max_depth,
            verify,
            merge_edges,
        )?,
        Commands::Log {
            reference,
            since,
            oneline,
        } => {
            let repository = open_current_repository()?;
            let opts = LogOptions {
                reference,
                walk: WalkOptions::since(since.map(|s| s.timestamp()).unwrap_or_default()),
                oneline,
            };

            repository.log(&opts)?;
        }
        Commands::CatFile { sha } => {
            let repository = open_current_repository()?;

            repository.cat_file(&sha)?
        }
        Commands::RevParse { reference } => {
            let repository = open_current_repository()?;

            repository.rev_parse(reference.as_deref())?;
        }
    }

    Ok(())
}
