//! Print title suggestions for one or more prefixes.
//!
//! ```text
//! movie-suggest --movies tmdb_5000_movies.csv --credits tmdb_5000_credits.csv harry "star w"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use movie_catalog::{Config, MovieCatalog};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "movie-suggest", about = "Autocomplete movie titles from the TMDB dataset")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Movies CSV file (overrides the config)
    #[arg(long)]
    movies: Option<PathBuf>,

    /// Credits CSV file (overrides the config)
    #[arg(long)]
    credits: Option<PathBuf>,

    /// Maximum suggestions per prefix (overrides the config)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Also print how many titles start with each prefix
    #[arg(long)]
    count: bool,

    /// Prefixes to complete
    #[arg(required = true)]
    prefixes: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(movies) = args.movies {
        config.movies_path = movies;
    }
    if let Some(credits) = args.credits {
        config.credits_path = credits;
    }
    if let Some(limit) = args.limit {
        config.suggestion_limit = limit;
    }

    let catalog = MovieCatalog::load(config).context("failed to load the movie dataset")?;

    for prefix in &args.prefixes {
        if args.count {
            println!("{} ({} titles)", prefix, catalog.count_with_prefix(prefix));
        } else {
            println!("{}", prefix);
        }
        for suggestion in catalog.suggest(prefix) {
            println!("  - {}", suggestion.label);
        }
    }

    Ok(())
}
