use anyhow::{Context, Result};
use git2::{Config, ErrorCode};
use graph::CommitFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Git configuration section holding persistent defaults
pub const SECTION: &str = "bigpicture";

/// Resolved settings: built-in defaults, overlaid by git configuration,
/// overlaid by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    // Selection
    pub branches: bool,
    pub tags: bool,
    pub roots: bool,
    pub merges: bool,
    pub bifurcations: bool,
    pub remotes: bool,
    pub all: bool,
    pub include: Vec<String>,

    // Labels
    pub hashes: bool,
    pub dupes: bool,

    // Output
    pub format: String,
    pub processor: String,
    pub viewer: Option<String>,
    pub outfile: Option<PathBuf>,
    pub graphviz: bool,
    pub wait_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            branches: true,
            tags: true,
            roots: true,
            merges: true,
            bifurcations: true,
            remotes: true,
            all: false,
            include: Vec::new(),
            hashes: false,
            dupes: false,
            format: "svg".to_string(),
            processor: "dot".to_string(),
            viewer: None,
            outfile: None,
            graphviz: false,
            wait_secs: 0,
            timeout_secs: 60,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub branches: Option<bool>,
    pub tags: Option<bool>,
    pub roots: Option<bool>,
    pub merges: Option<bool>,
    pub bifurcations: Option<bool>,
    pub remotes: Option<bool>,
    pub all: Option<bool>,
    pub include: Vec<String>,
    pub hashes: Option<bool>,
    pub dupes: Option<bool>,
    pub format: Option<String>,
    pub processor: Option<String>,
    pub viewer: Option<String>,
    pub outfile: Option<PathBuf>,
    pub graphviz: Option<bool>,
    pub wait_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

/// Where the rendered graph goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// `dot` text on standard output
    Stdout,
    /// `dot` text written to a file
    DotFile(PathBuf),
    /// Image rendered by the processor into a file
    Image(PathBuf),
    /// Image rendered into a temporary file and opened in a viewer
    Viewer(String),
}

impl Settings {
    /// Defaults overlaid with the `bigpicture.*` keys of a git configuration
    pub fn from_git_config(config: &Config) -> Result<Self> {
        let mut settings = Self::default();

        let flags: [(&str, &mut bool); 9] = [
            ("branches", &mut settings.branches),
            ("tags", &mut settings.tags),
            ("roots", &mut settings.roots),
            ("merges", &mut settings.merges),
            ("bifurcations", &mut settings.bifurcations),
            ("remotes", &mut settings.remotes),
            ("all", &mut settings.all),
            ("hashes", &mut settings.hashes),
            ("dupes", &mut settings.dupes),
        ];
        for (name, slot) in flags {
            let full_key = key(name);
            if let Some(value) = lookup(config.get_bool(&full_key), &full_key)? {
                *slot = value;
            }
        }

        if let Some(format) = lookup(config.get_string(&key("format")), &key("format"))? {
            settings.format = format;
        }
        if let Some(processor) = lookup(config.get_string(&key("processor")), &key("processor"))? {
            settings.processor = processor;
        }
        settings.viewer = lookup(config.get_string(&key("viewer")), &key("viewer"))?;

        if let Some(wait) = lookup_secs(config, "wait")? {
            settings.wait_secs = wait;
        }
        if let Some(timeout) = lookup_secs(config, "timeout")? {
            settings.timeout_secs = timeout;
        }

        Ok(settings)
    }

    /// Overlay command-line values
    pub fn apply(&mut self, overrides: SettingsOverrides) {
        let SettingsOverrides {
            branches,
            tags,
            roots,
            merges,
            bifurcations,
            remotes,
            all,
            include,
            hashes,
            dupes,
            format,
            processor,
            viewer,
            outfile,
            graphviz,
            wait_secs,
            timeout_secs,
        } = overrides;

        overlay(&mut self.branches, branches);
        overlay(&mut self.tags, tags);
        overlay(&mut self.roots, roots);
        overlay(&mut self.merges, merges);
        overlay(&mut self.bifurcations, bifurcations);
        overlay(&mut self.remotes, remotes);
        overlay(&mut self.all, all);
        overlay(&mut self.hashes, hashes);
        overlay(&mut self.dupes, dupes);
        overlay(&mut self.format, format);
        overlay(&mut self.processor, processor);
        overlay(&mut self.graphviz, graphviz);
        overlay(&mut self.wait_secs, wait_secs);
        overlay(&mut self.timeout_secs, timeout_secs);

        if viewer.is_some() {
            self.viewer = viewer;
        }
        if outfile.is_some() {
            self.outfile = outfile;
        }
        self.include.extend(include);
    }

    /// Selection filter for these settings, before extra commits are added
    pub fn filter(&self) -> CommitFilter {
        CommitFilter::none()
            .branches(self.branches)
            .tags(self.tags)
            .roots(self.roots)
            .merges(self.merges)
            .bifurcations(self.bifurcations)
            .all(self.all)
    }

    pub fn destination(&self) -> Destination {
        match (&self.outfile, self.graphviz, &self.viewer) {
            (Some(path), true, _) => Destination::DotFile(path.clone()),
            (None, true, _) => Destination::Stdout,
            (Some(path), false, _) => Destination::Image(path.clone()),
            (None, false, Some(viewer)) => Destination::Viewer(viewer.clone()),
            (None, false, None) => Destination::Stdout,
        }
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn key(name: &str) -> String {
    format!("{}.{}", SECTION, name)
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Treat a missing key as `None`, anything else that failed as an error
fn lookup<T>(result: Result<T, git2::Error>, key: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Invalid value for config key '{}'", key)),
    }
}

fn lookup_secs(config: &Config, name: &str) -> Result<Option<u64>> {
    let full_key = key(name);
    lookup(config.get_i64(&full_key), &full_key)?
        .map(|secs| {
            u64::try_from(secs)
                .with_context(|| format!("Config key '{}' must not be negative", full_key))
        })
        .transpose()
}
