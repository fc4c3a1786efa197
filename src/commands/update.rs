use anyhow::Result;
use colored::*;

use crate::error::ShelfError;
use crate::generator::EbookGenerator;
use crate::service::StoryService;

/// Run the update command - regenerate every tracked ebook
pub async fn run<G: EbookGenerator>(service: &StoryService<G>) -> Result<()> {
    let report = service.update_all().await?;

    if report.total == 0 {
        println!("Nothing to update. Run {} to add a story.", "redditshelf add <link>".cyan());
        return Ok(());
    }

    for title in &report.refreshed {
        println!("{} {}", "✓".green(), title);
    }

    if report.is_complete() {
        println!();
        println!(
            "Updated {} stories, last update is now {}",
            report.total,
            report.last_update.to_string().green()
        );
        return Ok(());
    }

    eprintln!();
    eprintln!("{}", "Some stories failed to update:".red().bold());
    for failure in &report.failures {
        eprintln!("  {} [{}] {}: {}", "✗".red(), failure.index, failure.title, failure.error);
    }
    eprintln!();
    eprintln!("Last update stays at {}", report.last_update.to_string().yellow());

    Err(ShelfError::PartialUpdate {
        failed: report.failures.len(),
        total: report.total,
    }
    .into())
}
