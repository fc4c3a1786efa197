use anyhow::Result;
use colored::*;

use crate::generator::EbookGenerator;
use crate::service::StoryService;
use crate::shelf::Shelf;
use crate::templates;

/// Run the list command - show every tracked story
pub fn run<G: EbookGenerator>(service: &StoryService<G>) -> Result<()> {
    let shelf = service.list()?;
    print!("{}", render(&shelf));
    Ok(())
}

/// The banner followed by one entry per story
pub fn render(shelf: &Shelf) -> String {
    let mut out = templates::LIST_HEADER.replace("{date}", &shelf.last_update.to_string());
    out.push('\n');

    if shelf.stories.is_empty() {
        out.push_str(&format!(
            "No stories yet. Run {} to add one.\n",
            "redditshelf add <link>".cyan()
        ));
        return out;
    }

    for (index, story) in shelf.stories.iter().enumerate() {
        out.push_str(&format!(
            "[{}] \"{}\"\n\t> {}\n",
            index.to_string().bold(),
            story.title,
            story.file_path.display()
        ));
    }

    out
}
