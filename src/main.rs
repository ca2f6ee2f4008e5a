mod config;
mod error;
mod favorites;
mod filters;
mod map;
mod models;
mod page;
mod render;
mod repl;
mod sort;
mod sources;

use anyhow::Context;
use clap::Parser;
use config::Cli;
use page::{CommitOutcome, Page};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values from .env never override the real environment
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    info!("🏠 Property Search");

    let source = cli.source()?;
    let mut page = Page::new(cli.capabilities(), Box::new(cli.map_backend()));
    page.set_sort_key(cli.sort_key());
    page.set_filters(cli.filters());
    page.set_view_mode(cli.view);

    if cli.interactive {
        return repl::run(&mut page, source).await;
    }

    if let CommitOutcome::Loaded(count) = page.load(source.as_ref()).await {
        info!("✅ {} properties available", count);
    }

    if !cli.favorites.is_empty() && !page.mark_favorites(&cli.favorites) {
        warn!("Favorites are disabled, ignoring --favorite {:?}", cli.favorites);
    }
    if let Some(id) = cli.details {
        if page.select(id).is_none() {
            warn!("No listing with id {}", id);
        }
    }

    print!("{}", render::render_page(&page));

    if let Some(path) = &cli.export {
        let json = serde_json::to_string_pretty(&page.visible())?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved {} listings to {}", page.visible().len(), path.display());
    }

    page.unmount();
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
