use anyhow::Result;
use colored::*;

use crate::generator::EbookGenerator;
use crate::service::{EditOutcome, StoryEdit, StoryService};
use crate::story::Identifier;

/// Run the edit command - change a story and regenerate its ebook
pub async fn run<G: EbookGenerator>(
    service: &StoryService<G>,
    story: &str,
    mut changes: StoryEdit,
) -> Result<()> {
    if let Some(dest) = changes.dest.take() {
        changes.dest = Some(super::absolute(&dest)?);
    }

    match service.edit(&Identifier::parse(story), changes).await? {
        EditOutcome::Unchanged => {
            println!(
                "{} Nothing to change. Pass --title, --dest or --link.",
                "!".yellow()
            );
        }
        EditOutcome::Updated {
            index,
            record,
            artifact,
            removed,
        } => {
            println!("{} [{}] \"{}\" has been updated", "✓".green(), index, record.title);
            println!("  > {}", artifact.path.display());
            if let Some(old) = removed {
                println!("  removed {}", old.display());
            }
        }
    }

    Ok(())
}
