use anyhow::Result;
use colored::*;

use crate::generator::EbookGenerator;
use crate::service::StoryService;
use crate::story::Identifier;

/// Run the delete command - drop a story and its ebook
pub fn run<G: EbookGenerator>(service: &StoryService<G>, story: &str) -> Result<()> {
    let deleted = service.delete(&Identifier::parse(story))?;

    println!(
        "{} [{}] \"{}\" has been deleted",
        "✓".green(),
        deleted.index,
        deleted.record.title
    );
    if !deleted.artifact_removed {
        println!(
            "  {} no ebook found at {}",
            "!".yellow(),
            deleted.record.file_path.display()
        );
    }

    Ok(())
}
