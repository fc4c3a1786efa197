use anyhow::Result;
use clap::Parser;
use colored::*;
use std::process::ExitCode;

use redditshelf::cli::{Cli, Commands};
use redditshelf::commands;
use redditshelf::config::ShelfPaths;
use redditshelf::error::exit_code;
use redditshelf::logging;
use redditshelf::service::StoryEdit;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config_dir,
        command,
        ..
    } = cli;
    let paths = || ShelfPaths::resolve(config_dir.clone());

    match command {
        Commands::Version => commands::version::run(),
        Commands::Init { force } => commands::init::run(&paths()?, force),
        Commands::List => commands::list::run(&commands::open(&paths()?)?),
        Commands::Update => commands::update::run(&commands::open(&paths()?)?).await,
        Commands::SetFolder { folder } => {
            commands::set_folder::run(&commands::open(&paths()?)?, &folder)
        }
        Commands::Add {
            link,
            title,
            output,
        } => {
            let service = commands::open(&paths()?)?;
            commands::add::run(&service, &link, title.as_deref(), output).await
        }
        Commands::Edit {
            story,
            title,
            dest,
            link,
        } => {
            let changes = StoryEdit { title, dest, link };
            commands::edit::run(&commands::open(&paths()?)?, &story, changes).await
        }
        Commands::Delete { story } => commands::delete::run(&commands::open(&paths()?)?, &story),
    }
}
