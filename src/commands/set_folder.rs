use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::generator::EbookGenerator;
use crate::service::StoryService;

/// Run the set-folder command - point the shelf at another destination folder
pub fn run<G: EbookGenerator>(service: &StoryService<G>, folder: &Path) -> Result<()> {
    let change = service.set_destination_folder(folder)?;

    println!(
        "{} {} is set as new destination",
        "✓".green(),
        change.current.display().to_string().cyan()
    );
    if change.repointed > 0 {
        println!(
            "  {} stories moved over from {}; files on disk were not moved",
            change.repointed,
            change.previous.display()
        );
    }

    Ok(())
}
