use anyhow::Result;
use bigpicture_core::{emit, DupeAnalysis, Settings, SettingsOverrides};
use clap::Parser;
use graph::{minimal_prefix_length, reduce, DotRenderer, GitWalker};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "BIGPICTURE_LOG";

#[derive(Parser, Debug)]
#[command(name = "git-big-picture")]
#[command(version, about = "Visualize the big picture of a Git repository's history", long_about = None)]
struct Cli {
    /// Path to the repository
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Show every commit, labeled by its subject
    #[arg(short, long)]
    all: bool,

    /// Keep commits pointed to by branches
    #[arg(short, long, overrides_with = "no_branches")]
    branches: bool,
    #[arg(long, overrides_with = "branches")]
    no_branches: bool,

    /// Keep commits pointed to by tags
    #[arg(short, long, overrides_with = "no_tags")]
    tags: bool,
    #[arg(long, overrides_with = "tags")]
    no_tags: bool,

    /// Keep commits without parents
    #[arg(short, long, overrides_with = "no_roots")]
    roots: bool,
    #[arg(long, overrides_with = "roots")]
    no_roots: bool,

    /// Keep commits with more than one parent
    #[arg(short, long, overrides_with = "no_merges")]
    merges: bool,
    #[arg(long, overrides_with = "merges")]
    no_merges: bool,

    /// Keep commits with more than one child
    #[arg(short = 'B', long, overrides_with = "no_bifurcations")]
    bifurcations: bool,
    #[arg(long, overrides_with = "bifurcations")]
    no_bifurcations: bool,

    /// Treat remote-tracking branches as branches
    #[arg(long, overrides_with = "no_remotes")]
    remotes: bool,
    #[arg(long, overrides_with = "remotes")]
    no_remotes: bool,

    /// Always keep this revision (repeatable)
    #[arg(short, long, value_name = "REV")]
    include: Vec<String>,

    /// Show abbreviated commit IDs next to ref names
    #[arg(short = 'H', long)]
    hashes: bool,

    /// Emphasize commits whose change appears on several branches
    #[arg(short, long)]
    dupes: bool,

    /// Image format passed to the processor
    #[arg(short, long)]
    format: Option<String>,

    /// Graphviz program used for layout
    #[arg(short, long)]
    processor: Option<String>,

    /// Open the image in this viewer
    #[arg(short, long)]
    viewer: Option<String>,

    /// Write output to this file
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Output Graphviz source instead of an image
    #[arg(short, long)]
    graphviz: bool,

    /// Seconds to keep the temporary image after the viewer exits
    #[arg(short, long, value_name = "SECONDS")]
    wait: Option<u64>,

    /// Seconds the processor may run before it is killed
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

impl Cli {
    fn overrides(self) -> SettingsOverrides {
        SettingsOverrides {
            branches: flag(self.branches, self.no_branches),
            tags: flag(self.tags, self.no_tags),
            roots: flag(self.roots, self.no_roots),
            merges: flag(self.merges, self.no_merges),
            bifurcations: flag(self.bifurcations, self.no_bifurcations),
            remotes: flag(self.remotes, self.no_remotes),
            all: self.all.then_some(true),
            include: self.include,
            hashes: self.hashes.then_some(true),
            dupes: self.dupes.then_some(true),
            format: self.format,
            processor: self.processor,
            viewer: self.viewer,
            outfile: self.outfile,
            graphviz: self.graphviz.then_some(true),
            wait_secs: self.wait,
            timeout_secs: self.timeout,
        }
    }
}

/// Collapse a `--x`/`--no-x` pair into an override
fn flag(enabled: bool, disabled: bool) -> Option<bool> {
    match (enabled, disabled) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let walker = GitWalker::new(Some(cli.path.as_path()))?;
    let mut settings = Settings::from_git_config(&walker.repository().config()?)?;
    settings.apply(cli.overrides());
    let walker = walker.remotes(settings.remotes);

    let (full, subjects) = walker.collect()?.into_graph()?;

    let included = settings
        .include
        .iter()
        .map(|rev| walker.resolve(rev))
        .collect::<Result<Vec<_>>>()?;
    let interesting = settings.filter().include(included).interesting(&full);
    if interesting.is_empty() {
        warn!("the selected filters match no commits; the graph will be empty");
    }

    let reduced = reduce(&full, &interesting)?;
    info!(
        commits = full.node_count(),
        kept = reduced.node_count(),
        edges = reduced.edge_count(),
        "reduced history"
    );

    // Abbreviations must stay unique across the whole history, not just the
    // commits that survive reduction.
    let prefix_len = minimal_prefix_length(&full);
    debug!(prefix_len, "chose abbreviation length");

    let weights = if settings.dupes {
        if !settings.all {
            warn!("--dupes only changes the output together with --all");
        }
        Some(DupeAnalysis::new(walker.repository()).weights(full.commits())?)
    } else {
        None
    };

    let dot = DotRenderer::new(prefix_len)
        .show_hashes(settings.hashes)
        .full_history(settings.all)
        .subjects(&subjects)
        .weights(weights.as_ref())
        .render(&reduced);

    emit(&dot, &settings)
}
