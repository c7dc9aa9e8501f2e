use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_app::catalog::{Catalog, CATALOG_PATH};
use libris_db::InMemoryStore;
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris", version, about = "Libris library catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Load the demo catalog before serving
        #[arg(long)]
        seed: bool,
    },
    /// Print every catalog route
    Routes,
    /// Build the demo catalog in memory and print what it contains
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    let command = cli.command.unwrap_or(Command::Serve { seed: false });
    tracing::debug!(?command, "running command");

    match command {
        Command::Serve { seed } => {
            settings.store.seed_on_start |= seed;
            libris_app::serve(settings).await
        }
        Command::Routes => {
            print_routes();
            Ok(())
        }
        Command::Seed => seed().await,
    }
}

fn print_routes() {
    let catalog = Catalog::new(Arc::new(InMemoryStore::new()));
    let registry = libris_app::modules::registry(&catalog);

    println!("GET     /healthz");
    println!("GET     /  -> {CATALOG_PATH}");
    for (module, endpoint) in registry.endpoints() {
        let path = format!("{CATALOG_PATH}{}", endpoint.path);
        let path = path.strip_suffix('/').unwrap_or(&path);
        println!(
            "{:<7} {:<36} {:<15} {}",
            endpoint.method, path, module, endpoint.summary
        );
    }
}

async fn seed() -> anyhow::Result<()> {
    let catalog = Catalog::new(Arc::new(InMemoryStore::new()));
    let summary = libris_app::seed::seed(&catalog)
        .await
        .context("failed to seed demo catalog")?;

    println!("authors:        {}", summary.authors);
    println!("genres:         {}", summary.genres);
    println!("books:          {}", summary.books);
    println!("book instances: {}", summary.book_instances);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["libris"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["libris", "serve", "--seed"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve { seed: true })));
    }
}
