//! Render command handlers. Every artifact is built from a saved snapshot.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dealreel_core::{AppConfig, DealSnapshot};
use dealreel_render::{build_metadata, load_layout, plan_slides, render_html, SlideLayout};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Snapshot to render (defaults to DEALREEL_SNAPSHOT_PATH)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// File to write the artifact to
    #[arg(long)]
    pub output: PathBuf,
}

/// Sub-commands available under `render`.
#[derive(Debug, Subcommand)]
pub enum RenderCommands {
    /// Static HTML deals page
    Html {
        #[command(flatten)]
        io: RenderArgs,
    },
    /// JSON slide plan for the video encoder
    Slides {
        #[command(flatten)]
        io: RenderArgs,

        /// YAML file overriding the built-in slide layout
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// JSON upload metadata (title, description, tags)
    Metadata {
        #[command(flatten)]
        io: RenderArgs,

        /// Publish date shown in the title (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub(crate) fn run_render(config: &AppConfig, command: RenderCommands) -> anyhow::Result<()> {
    match command {
        RenderCommands::Html { io } => {
            let Some(snapshot) = load_renderable(config, &io)? else {
                return Ok(());
            };
            write(&io, &render_html(&snapshot))
        }
        RenderCommands::Slides { io, layout } => {
            let Some(snapshot) = load_renderable(config, &io)? else {
                return Ok(());
            };
            let layout = match layout {
                Some(path) => load_layout(&path)?,
                None => SlideLayout::default(),
            };
            let plan = plan_slides(&snapshot, &layout);
            println!(
                "{} slides, {}s total",
                plan.slides.len(),
                plan.total_duration_secs
            );
            write(&io, &dealreel_render::to_json(&plan)?)
        }
        RenderCommands::Metadata { io, date } => {
            let Some(snapshot) = load_renderable(config, &io)? else {
                return Ok(());
            };
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let metadata = build_metadata(&snapshot, date);
            println!("title: {}", metadata.title);
            write(&io, &dealreel_render::to_json(&metadata)?)
        }
    }
}

/// Loads the snapshot, or returns `None` when it has no deals to render.
fn load_renderable(config: &AppConfig, io: &RenderArgs) -> anyhow::Result<Option<DealSnapshot>> {
    let path = io.snapshot.as_deref().unwrap_or(&config.snapshot_path);
    let snapshot = dealreel_core::load_snapshot(path)?;
    if snapshot.is_empty() {
        tracing::warn!(path = %path.display(), "snapshot has no deals; nothing rendered");
        println!("no deals in {}; {} not written", path.display(), io.output.display());
        return Ok(None);
    }
    Ok(Some(snapshot))
}

fn write(io: &RenderArgs, contents: &str) -> anyhow::Result<()> {
    dealreel_render::write_artifact(&io.output, contents)?;
    println!("wrote {}", io.output.display());
    Ok(())
}
