//! Command-line interface for mangashelf.
//!
//! Provides commands for viewing a title, saving it to the library,
//! and listing or pruning saved titles.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::MangaDexGateway;
use crate::config::{self, ResolvedConfig};
use crate::core::Aggregator;
use crate::domain::DetailView;
use crate::library::{JsonLibraryStore, LibraryStore};
use crate::view::{ViewController, ViewState};

/// mangashelf - MangaDex title details and a local library
#[derive(Parser, Debug)]
#[command(name = "mangashelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the details of a title
    Show {
        /// MangaDex manga ID
        id: String,

        /// Maximum number of chapters to list
        #[arg(short, long)]
        chapters: Option<usize>,
    },

    /// Add a title to the library, or remove it if already saved
    Toggle {
        /// MangaDex manga ID
        id: String,
    },

    /// List saved titles
    Library {
        /// Maximum number of titles to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Remove a title from the library without fetching it
    Remove {
        /// MangaDex manga ID
        id: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Show { id, chapters } => show_title(&id, chapters).await,
            Commands::Toggle { id } => toggle_title(&id).await,
            Commands::Library { limit } => list_library(limit).await,
            Commands::Remove { id } => remove_title(&id).await,
            Commands::Config => show_config(),
        }
    }
}

/// Library store at the configured location
fn open_library(cfg: &ResolvedConfig) -> Arc<dyn LibraryStore> {
    Arc::new(JsonLibraryStore::new(cfg.library.clone()))
}

/// Wire up a view controller from configuration
fn build_controller() -> Result<ViewController> {
    let cfg = config::config()?;
    let library = open_library(cfg);

    let gateway =
        MangaDexGateway::new(&cfg.remote).context("Failed to create MangaDex client")?;
    let aggregator = Arc::new(Aggregator::new(
        Arc::new(gateway),
        library.clone(),
        cfg.remote.asset_host.clone(),
    ));

    Ok(ViewController::new(aggregator, library))
}

/// Activate the controller and wait for the loaded view
async fn load_view(controller: &ViewController, id: &str) -> Result<DetailView> {
    controller.activate(id).await;

    match controller.snapshot().state {
        ViewState::Loaded(view) => Ok(*view),
        ViewState::NotFound => anyhow::bail!("Manga not found: {}", id),
        state => anyhow::bail!("Unexpected view state for {}: {:?}", id, state),
    }
}

/// Show a title
async fn show_title(id: &str, chapter_limit: Option<usize>) -> Result<()> {
    let controller = build_controller()?;
    let view = load_view(&controller, id).await?;

    print_detail(&view, chapter_limit);

    Ok(())
}

/// Print a detail view
fn print_detail(view: &DetailView, chapter_limit: Option<usize>) {
    let fields = &view.fields;

    println!("{}", fields.title);
    if let Some(alt_title) = &fields.alt_title {
        println!("{}", alt_title);
    }
    println!();
    println!("{}", fields.description);
    println!();
    println!("{}, {}, {}", view.creator, fields.status, fields.year);
    println!("Genres: {}", fields.genres);
    match &view.cover_url {
        Some(url) => println!("Cover: {}", url),
        None => println!("No poster available"),
    }
    println!(
        "Library: {}",
        if view.is_saved { "Added" } else { "Not added" }
    );

    println!("\nChapters");
    println!("{}", "-".repeat(60));

    if view.feed.is_empty() {
        println!("No chapters available");
        return;
    }

    let limit = chapter_limit.unwrap_or(view.feed.len());
    for entry in view.feed.iter().take(limit) {
        println!("{:<40} {}", entry.label(), entry.id);
    }

    if limit < view.feed.len() {
        println!("... and {} more", view.feed.len() - limit);
    }
}

/// Toggle a title's saved state
async fn toggle_title(id: &str) -> Result<()> {
    let controller = build_controller()?;
    let view = load_view(&controller, id).await?;

    let saved = controller
        .toggle_save()
        .await
        .with_context(|| format!("Failed to update library for {}", id))?;

    if saved {
        eprintln!("Added to library: {}", view.fields.title);
        eprintln!("   Chapters: {}", view.chapter_count());
    } else {
        eprintln!("Removed from library: {}", view.fields.title);
    }

    Ok(())
}

/// List saved titles
async fn list_library(limit: usize) -> Result<()> {
    let cfg = config::config()?;
    let entries = open_library(cfg)
        .entries()
        .await
        .context("Failed to read library")?;

    if entries.is_empty() {
        println!("Library is empty. Use 'mangashelf toggle <id>' to add titles.");
        return Ok(());
    }

    println!("{:<38} {:<8} {:<40}", "ID", "CHAPTERS", "TITLE");
    println!("{}", "-".repeat(88));

    for entry in entries.iter().take(limit) {
        let title_truncated = if entry.title.chars().count() > 37 {
            format!("{}...", entry.title.chars().take(37).collect::<String>())
        } else {
            entry.title.clone()
        };
        println!(
            "{:<38} {:<8} {:<40}",
            entry.id, entry.chapter_count, title_truncated
        );
    }

    println!("\nTotal: {} titles", entries.len());

    Ok(())
}

/// Remove a title directly
async fn remove_title(id: &str) -> Result<()> {
    let cfg = config::config()?;
    let removed = open_library(cfg)
        .remove(id)
        .await
        .with_context(|| format!("Failed to remove {} from library", id))?;

    if removed {
        eprintln!("Removed from library: {}", id);
    } else {
        eprintln!("Not in library: {}", id);
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Library: {}", cfg.library.display());
    println!();
    println!("Remote:");
    println!("  API:           {}", cfg.remote.api_url);
    println!("  Asset host:    {}", cfg.remote.asset_host);
    println!("  User agent:    {}", cfg.remote.user_agent);
    println!("  Feed limit:    {}", cfg.remote.feed_limit);
    println!("  Feed language: {}", cfg.remote.feed_language);

    Ok(())
}
