//! # movie-catalog
//!
//! Movie records for the movie name game, loaded from the TMDB-style CSV
//! files, with title autocomplete backed by a [`title_trie::PrefixIndex`].
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use movie_catalog::{Config, Movie, MovieCatalog, MovieId};
//!
//! let mut movies = BTreeMap::new();
//! movies.insert(MovieId(1), Movie::new("Heat", 1995));
//! movies.insert(MovieId(2), Movie::new("Heathers", 1989));
//! movies.insert(MovieId(3), Movie::new("Up", 2009));
//!
//! let catalog = MovieCatalog::new(movies, Config::default());
//! let labels: Vec<String> = catalog
//!     .suggest("hea")
//!     .into_iter()
//!     .map(|s| s.label)
//!     .collect();
//! assert_eq!(labels, ["Heat (1995)", "Heathers (1989)"]);
//! ```

#![warn(missing_docs)]

pub mod clean;
mod config;
mod connection;
mod error;
pub mod import;
mod movie;

pub use config::Config;
pub use connection::{Connection, UnknownConnection};
pub use error::{CatalogError, Result};
pub use movie::{Listing, Movie, MovieId};

use std::collections::BTreeMap;

use title_trie::{BuildReport, PrefixIndex};
use tracing::info;

/// One line of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The suggested movie.
    pub id: MovieId,
    /// Its title as stored.
    pub title: String,
    /// Display label, `Title (Year)`.
    pub label: String,
}

/// All movies of a session and the title index over them.
///
/// Built once at startup and only read afterwards.
pub struct MovieCatalog {
    movies: BTreeMap<MovieId, Movie>,
    titles: PrefixIndex<MovieId>,
    report: BuildReport,
    config: Config,
}

impl MovieCatalog {
    /// Index `movies` by title.
    pub fn new(movies: BTreeMap<MovieId, Movie>, config: Config) -> Self {
        let (titles, report) =
            PrefixIndex::build(movies.iter().map(|(&id, movie)| Listing { id, movie }));
        info!(
            movies = movies.len(),
            indexed = report.inserted,
            skipped = report.skipped_empty + report.skipped_invalid,
            "indexed movie titles"
        );
        Self {
            movies,
            titles,
            report,
            config,
        }
    }

    /// Load the dataset named by `config` and index it.
    pub fn load(config: Config) -> Result<Self> {
        let movies = import::load_dataset(&config.movies_path, &config.credits_path)?;
        Ok(Self::new(movies, config))
    }

    /// Suggestions for what the player has typed so far.
    ///
    /// Surrounding whitespace is ignored and blank input suggests nothing.
    /// At most [`Config::suggestion_limit`] suggestions are returned, in index
    /// order. Titles shared by several movies resolve to the movie inserted
    /// last, which is the one with the highest id.
    pub fn suggest(&self, input: &str) -> Vec<Suggestion> {
        let prefix = input.trim();
        if prefix.is_empty() {
            return Vec::new();
        }

        self.titles
            .suggestions(prefix)
            .filter_map(|entry| {
                let id = *entry.payload();
                let movie = self.movies.get(&id)?;
                Some(Suggestion {
                    id,
                    title: entry.key().to_owned(),
                    label: movie.label(),
                })
            })
            .take(self.config.suggestion_limit)
            .collect()
    }

    /// Number of indexed titles that start with what the player has typed.
    ///
    /// Input is trimmed like [`MovieCatalog::suggest`], and blank input
    /// counts nothing.
    pub fn count_with_prefix(&self, input: &str) -> u32 {
        let prefix = input.trim();
        if prefix.is_empty() {
            return 0;
        }
        self.titles.count_with_prefix(prefix)
    }

    /// The movie with this id.
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// The movie whose title is exactly `title`, ignoring case and
    /// surrounding whitespace.
    pub fn movie_by_title(&self, title: &str) -> Option<(MovieId, &Movie)> {
        let id = *self.titles.get(title.trim())?.payload();
        self.movies.get(&id).map(|movie| (id, movie))
    }

    /// Movies other than `id` that `connection` links to it, ordered by id.
    pub fn connected(&self, id: MovieId, connection: Connection) -> Vec<(MovieId, &Movie)> {
        let Some(movie) = self.movies.get(&id) else {
            return Vec::new();
        };
        self.movies()
            .filter(|&(other_id, other)| other_id != id && connection.connects(movie, other))
            .collect()
    }

    /// Every movie, ordered by id.
    pub fn movies(&self) -> impl Iterator<Item = (MovieId, &Movie)> {
        self.movies.iter().map(|(&id, movie)| (id, movie))
    }

    /// Number of movies held.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Returns `true` if no movies were loaded.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// The title index.
    pub fn index(&self) -> &PrefixIndex<MovieId> {
        &self.titles
    }

    /// What happened when the titles were indexed.
    pub fn build_report(&self) -> BuildReport {
        self.report
    }

    /// The configuration this catalog was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
