mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pdfslice::settings::FileSettingsStore;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = match cli.config {
        Some(path) => FileSettingsStore::new(path),
        None => FileSettingsStore::default_location(),
    };

    match cli.command {
        Commands::Extract {
            path,
            pages,
            output_dir,
            format,
            no_save,
        } => {
            let options = commands::extract::ExtractOptions {
                output_dir,
                format,
                remember: !no_save,
            };
            commands::extract::run(&store, &path, &pages, &options).await?;
        }
        Commands::Interactive => {
            commands::interactive::run(&store).await?;
        }
        Commands::Settings => {
            commands::settings::run(&store)?;
        }
    }

    Ok(())
}
