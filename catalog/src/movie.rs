//! Movie records.

use std::fmt;
use std::str::FromStr;

use title_trie::IndexRecord;

/// Numeric id of a movie in the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MovieId(pub u32);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(MovieId)
    }
}

/// A movie with its cast and key crew.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Movie {
    /// Display title, already cleaned.
    pub title: String,
    /// Year of theatrical release.
    pub release_year: i32,
    /// Genre names.
    pub genres: Vec<String>,
    /// Billed cast, in billing order.
    pub actors: Vec<String>,
    /// Director, if credited.
    pub director: Option<String>,
    /// Writer, if credited.
    pub writer: Option<String>,
    /// Cinematographer, if credited.
    pub cinematographer: Option<String>,
    /// Composer, if credited.
    pub composer: Option<String>,
}

impl Movie {
    /// A movie with only a title and release year.
    pub fn new(title: impl Into<String>, release_year: i32) -> Self {
        Self {
            title: title.into(),
            release_year,
            ..Self::default()
        }
    }

    /// Label shown in the suggestion list, e.g. `Heat (1995)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.release_year)
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A movie paired with its id, indexed under its title.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    /// Dataset id, stored in the index as the payload.
    pub id: MovieId,
    /// The movie itself.
    pub movie: &'a Movie,
}

impl IndexRecord for Listing<'_> {
    type Payload = MovieId;

    fn title(&self) -> Option<&str> {
        let title = self.movie.title.as_str();
        (!title.trim().is_empty()).then_some(title)
    }

    fn payload(&self) -> MovieId {
        self.id
    }
}
