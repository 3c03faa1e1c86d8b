mod fetch;
mod render;
mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fetch::FetchCommands;
use render::RenderCommands;

#[derive(Debug, Parser)]
#[command(name = "dealreel")]
#[command(about = "Collect Amazon deals and render them for publishing")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch raw records from a source and write a deal snapshot
    Fetch {
        #[command(subcommand)]
        command: FetchCommands,
    },
    /// Print the deals held in a snapshot
    Show {
        /// Snapshot to read (defaults to the configured snapshot path)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Render a snapshot into a publishable artifact
    Render {
        #[command(subcommand)]
        command: RenderCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = dealreel_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Fetch { command }) => fetch::run_fetch(&config, command).await?,
        Some(Commands::Show { snapshot }) => show::run_show(&config, snapshot.as_deref())?,
        Some(Commands::Render { command }) => render::run_render(&config, command)?,
        None => println!("dealreel: no command given; run with --help for usage"),
    }

    Ok(())
}
