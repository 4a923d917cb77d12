use crate::config::{Destination, Settings};
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failures of the external programs the graph is handed to
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("'{program}' could not be started; is it installed and on PATH?")]
    NotFound { program: String },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("'{program}' did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The Graphviz layout program turning `dot` text into an image
#[derive(Debug, Clone)]
pub struct Processor {
    program: String,
    format: String,
    timeout: Duration,
}

impl Processor {
    pub fn new(program: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            format: format.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.processor.clone(), settings.format.clone()).timeout(settings.timeout())
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render `dot` text into `target` as `<program> -T<format> -o <target> <input>`
    pub fn render(&self, dot: &str, target: &Path) -> Result<(), OutputError> {
        let mut input = tempfile::Builder::new()
            .prefix("git-big-picture-")
            .suffix(".dot")
            .tempfile()?;
        input.write_all(dot.as_bytes())?;
        input.flush()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(input.path(), target))
    }

    async fn run(&self, input: &Path, target: &Path) -> Result<(), OutputError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(target)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        debug!(?command, "running processor");

        let child = command.spawn().map_err(|err| spawn_error(err, &self.program))?;

        // Dropping the output future on expiry kills the child
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(program = %self.program, timeout = ?self.timeout, "processor timed out, killing it");
                return Err(OutputError::Timeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
        };

        if output.status.success() {
            return Ok(());
        }

        Err(OutputError::Failed {
            program: self.program.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Open `image` in `viewer` and wait for it to exit, then keep the file
/// around for `linger` longer for viewers that detach.
///
/// `viewer` may carry arguments, separated by whitespace.
pub fn view(viewer: &str, image: &Path, linger: Duration) -> Result<(), OutputError> {
    let mut parts = viewer.split_whitespace();
    let program = parts.next().unwrap_or(viewer);

    let mut command = Command::new(program);
    command.args(parts).arg(image).stdin(Stdio::null());
    debug!(?command, "starting viewer");

    let status = command
        .spawn()
        .map_err(|err| spawn_error(err, program))?
        .wait()?;
    if !status.success() {
        return Err(OutputError::Failed {
            program: program.to_string(),
            status,
            stderr: String::new(),
        });
    }

    if !linger.is_zero() {
        thread::sleep(linger);
    }
    Ok(())
}

pub fn write_dot(dot: &str, path: &Path) -> Result<()> {
    fs::write(path, dot).with_context(|| format!("Failed to write {}", path.display()))
}

/// Send the rendered graph wherever the settings point
pub fn emit(dot: &str, settings: &Settings) -> Result<()> {
    match settings.destination() {
        Destination::Stdout => {
            io::stdout().write_all(dot.as_bytes())?;
        }
        Destination::DotFile(path) => {
            write_dot(dot, &path)?;
            info!(path = %path.display(), "wrote graphviz source");
        }
        Destination::Image(path) => {
            Processor::from_settings(settings)
                .render(dot, &path)
                .with_context(|| format!("Failed to render {}", path.display()))?;
            info!(path = %path.display(), "wrote image");
        }
        Destination::Viewer(viewer) => {
            let image = tempfile::Builder::new()
                .prefix("git-big-picture-")
                .suffix(&format!(".{}", settings.format))
                .tempfile()?;
            Processor::from_settings(settings).render(dot, image.path())?;
            view(&viewer, image.path(), settings.wait())?;
        }
    }

    Ok(())
}

fn spawn_error(err: io::Error, program: &str) -> OutputError {
    match err.kind() {
        io::ErrorKind::NotFound => OutputError::NotFound {
            program: program.to_string(),
        },
        _ => OutputError::Io(err),
    }
}
