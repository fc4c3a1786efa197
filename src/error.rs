use std::path::PathBuf;
use thiserror::Error;

use crate::generator::GenerationError;

/// Exit code for fatal precondition failures
pub const EXIT_PRECONDITION: u8 = 2;
/// Exit code for everything else that went wrong
pub const EXIT_FAILURE: u8 = 1;

/// Errors raised while reading or mutating the shelf
#[derive(Debug, Error)]
pub enum ShelfError {
    /// The shelf file has not been created yet.
    #[error("no config file found at {}; run `redditshelf init` first", .0.display())]
    ConfigNotFound(PathBuf),

    /// `init` was asked to overwrite an existing shelf without `--force`.
    #[error("config file already exists at {}; use --force to overwrite it", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The platform config directory could not be determined.
    #[error("could not determine the platform config directory; pass --config-dir")]
    NoConfigDir,

    #[error("folder not found: {}; make sure it is an existing folder", .0.display())]
    InvalidFolder(PathBuf),

    #[error("not a valid index or title not found: {0}")]
    StoryNotFound(String),

    #[error("failed to generate \"{title}\": {source}")]
    Generation {
        title: String,
        #[source]
        source: GenerationError,
    },

    #[error("{failed} of {total} stories failed to update")]
    PartialUpdate { failed: usize, total: usize },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize shelf: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ShelfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShelfError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code this error should terminate with
    pub fn exit_code(&self) -> u8 {
        match self {
            ShelfError::ConfigNotFound(_)
            | ShelfError::AlreadyInitialized(_)
            | ShelfError::NoConfigDir
            | ShelfError::InvalidFolder(_)
            | ShelfError::StoryNotFound(_) => EXIT_PRECONDITION,
            ShelfError::Generation { .. }
            | ShelfError::PartialUpdate { .. }
            | ShelfError::Io { .. }
            | ShelfError::Parse { .. }
            | ShelfError::Serialize(_) => EXIT_FAILURE,
        }
    }
}

/// Map an error coming out of a command to the process exit code
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ShelfError>())
        .map_or(EXIT_FAILURE, ShelfError::exit_code)
}

pub type Result<T> = std::result::Result<T, ShelfError>;
