use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redditshelf")]
#[command(author = "Alexander Phi. Goetz")]
#[command(version)]
#[command(about = "Organize serialized reddit stories as ebooks")]
#[command(long_about = "redditshelf keeps a shelf of serialized reddit stories and the \
ebooks generated from them. Add a story by the link to any of its chapters, then run \
`redditshelf update` to regenerate every ebook with the latest chapters.")]
pub struct Cli {
    /// Directory holding redditshelf.json and settings.toml
    #[arg(long, global = true, env = "REDDITSHELF_HOME", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Log more details to stderr (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the shelf and settings files
    Init {
        /// Overwrite an existing shelf
        #[arg(short, long)]
        force: bool,
    },

    /// Show a list of all tracked stories
    List,

    /// Regenerate the ebooks of all tracked stories
    Update,

    /// Set the folder new ebooks are saved to
    SetFolder {
        /// An existing folder
        folder: PathBuf,
    },

    /// Add a new story to the shelf and generate its ebook
    Add {
        /// Link to any chapter of the story
        link: String,

        /// Title for the story. Defaults to the capitalized link name
        #[arg(short, long)]
        title: Option<String>,

        /// Where the ebook should be stored
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Change a story and regenerate its ebook. STORY is either the index or the title
    Edit {
        story: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New ebook location; the old file is removed
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// New link to any chapter of the story
        #[arg(short, long)]
        link: Option<String>,
    },

    /// Delete a story from the shelf along with its ebook. STORY is either the index or the title
    Delete { story: String },

    /// Show version information
    Version,
}
