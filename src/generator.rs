use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::{GeneratorSettings, RetrySettings};

/// A generated ebook on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("`{0}` not found on PATH")]
    ToolNotFound(String),

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Failed { program: String, code: Option<i32> },

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("no ebook was written to {}", .0.display())]
    MissingArtifact(PathBuf),
}

impl GenerationError {
    /// Whether another attempt could succeed. Only failures that plausibly
    /// come from the network qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Failed { .. } | GenerationError::Timeout(_))
    }
}

/// Fetches a story's chapters and compiles them into an ebook at `output`
#[allow(async_fn_in_trait)]
pub trait EbookGenerator {
    async fn generate(
        &self,
        link: &str,
        title: &str,
        output: &Path,
    ) -> Result<Artifact, GenerationError>;
}

impl<G: EbookGenerator> EbookGenerator for &G {
    async fn generate(
        &self,
        link: &str,
        title: &str,
        output: &Path,
    ) -> Result<Artifact, GenerationError> {
        (**self).generate(link, title, output).await
    }
}

/// Generates ebooks by running an external converter program
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(settings: &GeneratorSettings) -> Self {
        Self {
            program: settings.program.clone(),
            args: settings.args.clone(),
        }
    }

    /// Fill the `{link}`, `{title}` and `{file}` placeholders of the argument template
    pub fn render_args(&self, link: &str, title: &str, output: &Path) -> Vec<String> {
        let file = output.display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{link}", link)
                    .replace("{title}", title)
                    .replace("{file}", &file)
            })
            .collect()
    }
}

impl EbookGenerator for CommandGenerator {
    async fn generate(
        &self,
        link: &str,
        title: &str,
        output: &Path,
    ) -> Result<Artifact, GenerationError> {
        let program = which::which(&self.program)
            .map_err(|_| GenerationError::ToolNotFound(self.program.clone()))?;

        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|source| GenerationError::Io {
                path: parent.clone(),
                source,
            })?;

        // The converter writes into a staging dir on the same filesystem so a
        // run that exits cleanly without output cannot pass off the old ebook
        let staging = tempfile::Builder::new()
            .prefix(".redditshelf-")
            .tempdir_in(&parent)
            .map_err(|source| GenerationError::Io {
                path: parent.clone(),
                source,
            })?;
        let staged = staging
            .path()
            .join(output.file_name().unwrap_or(output.as_os_str()));

        let args = self.render_args(link, title, &staged);
        debug!(program = %program.display(), ?args, "running ebook generator");

        let status = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| GenerationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(GenerationError::Failed {
                program: self.program.clone(),
                code: status.code(),
            });
        }

        if artifact_at(&staged).await.is_err() {
            return Err(GenerationError::MissingArtifact(output.to_path_buf()));
        }
        tokio::fs::rename(&staged, output)
            .await
            .map_err(|source| GenerationError::Io {
                path: output.to_path_buf(),
                source,
            })?;

        artifact_at(output).await
    }
}

/// Describe the file at `path`, failing if nothing was written there
pub async fn artifact_at(path: &Path) -> Result<Artifact, GenerationError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Artifact {
            path: path.to_path_buf(),
            size: meta.len(),
        }),
        _ => Err(GenerationError::MissingArtifact(path.to_path_buf())),
    }
}

/// Bounds on a single story's generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Delay before the first retry; doubles after each retry
    pub backoff: Duration,
    /// Limit for a single attempt
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn from_settings(generator: &GeneratorSettings, retry: &RetrySettings) -> Self {
        Self {
            attempts: retry.attempts,
            backoff: Duration::from_millis(retry.backoff_ms),
            timeout: Duration::from_secs(generator.timeout),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&GeneratorSettings::default(), &RetrySettings::default())
    }
}

/// Run `generator`, bounding every attempt by the policy timeout and retrying
/// retryable failures with exponential backoff.
pub async fn generate_with_retry<G: EbookGenerator>(
    generator: &G,
    policy: &RetryPolicy,
    link: &str,
    title: &str,
    output: &Path,
) -> Result<Artifact, GenerationError> {
    let attempts = policy.attempts.max(1);
    let mut delay = policy.backoff;
    let mut attempt = 1;

    loop {
        let result = match timeout(policy.timeout, generator.generate(link, title, output)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(policy.timeout)),
        };

        match result {
            Ok(artifact) => return Ok(artifact),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(
                    title,
                    attempt,
                    attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "generation failed, retrying"
                );
                sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
