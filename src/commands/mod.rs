pub mod add;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod set_folder;
pub mod update;
pub mod version;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{Settings, ShelfPaths};
use crate::error::ShelfError;
use crate::generator::CommandGenerator;
use crate::service::StoryService;
use crate::shelf::ShelfStore;

/// Build the service every shelf command runs against.
/// Fails if `init` has not been run yet.
pub fn open(paths: &ShelfPaths) -> Result<StoryService<CommandGenerator>> {
    let store = ShelfStore::new(paths.shelf_file());
    if !store.exists() {
        return Err(ShelfError::ConfigNotFound(store.path().to_path_buf()).into());
    }

    let settings = Settings::load(&paths.settings_file())?;

    Ok(StoryService::new(
        store,
        CommandGenerator::new(&settings.generator),
        settings.retry_policy(),
    ))
}

/// Anchor a user supplied path at the current directory
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(cwd.join(path))
}
