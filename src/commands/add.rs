use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use crate::generator::EbookGenerator;
use crate::service::StoryService;

/// Run the add command - track a new story and generate its ebook
pub async fn run<G: EbookGenerator>(
    service: &StoryService<G>,
    link: &str,
    title: Option<&str>,
    output: Option<PathBuf>,
) -> Result<()> {
    let output = output.as_deref().map(super::absolute).transpose()?;

    let added = service.add(link, title, output.as_deref()).await?;

    println!(
        "{} {} has been added as [{}]",
        "✓".green(),
        added.record.title.bold(),
        added.index
    );
    println!("  > {} ({} bytes)", added.artifact.path.display(), added.artifact.size);

    Ok(())
}
