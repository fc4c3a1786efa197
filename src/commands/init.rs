use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use std::fs;
use std::path::PathBuf;

use crate::config::ShelfPaths;
use crate::shelf::{Shelf, ShelfStore};
use crate::templates;

/// Run the init command - create the shelf and settings files
pub fn run(paths: &ShelfPaths, force: bool) -> Result<()> {
    let store = ShelfStore::new(paths.shelf_file());
    let today = Local::now().date_naive();

    let destination = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    store.initialize(force, &Shelf::new(destination.clone(), today))?;

    let settings_path = paths.settings_file();
    if force || !settings_path.exists() {
        let content = templates::SETTINGS_TEMPLATE.replace("{created}", &today.to_string());
        fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
    }

    println!("{} Initialized {}", "✓".green(), store.path().display());
    println!();
    println!("Ebooks will be saved to {}", destination.display().to_string().cyan());
    println!();
    println!("Next steps:");
    println!("  1. Run {} to choose another folder", "redditshelf set-folder <folder>".cyan());
    println!("  2. Review {} for the ebook generator", settings_path.display());
    println!("  3. Run {} to track a story", "redditshelf add <link>".cyan());

    Ok(())
}
