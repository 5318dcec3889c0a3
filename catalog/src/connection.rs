//! Ways two movies can be linked in the name game.
//!
//! A play is valid when the new movie shares something with the previous
//! one: a person in the same credited role, a cast member, or a genre.
//! Names are compared ignoring case; a missing credit never links.

use std::fmt;
use std::str::FromStr;

use crate::movie::Movie;

/// What a pair of movies can have in common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connection {
    /// At least one cast member in both.
    Actor,
    /// Same director.
    Director,
    /// Same writer.
    Writer,
    /// Same composer.
    Composer,
    /// Same cinematographer.
    Cinematographer,
    /// At least one genre in both.
    Genre,
}

impl Connection {
    /// Every connection, in the order they are tried.
    pub const ALL: [Connection; 6] = [
        Connection::Actor,
        Connection::Director,
        Connection::Writer,
        Connection::Composer,
        Connection::Cinematographer,
        Connection::Genre,
    ];

    /// Display name, e.g. `Director`.
    pub fn name(self) -> &'static str {
        match self {
            Connection::Actor => "Actor",
            Connection::Director => "Director",
            Connection::Writer => "Writer",
            Connection::Composer => "Composer",
            Connection::Cinematographer => "Cinematographer",
            Connection::Genre => "Genre",
        }
    }

    /// Returns `true` if `a` and `b` are linked this way.
    pub fn connects(self, a: &Movie, b: &Movie) -> bool {
        self.shared(a, b).is_some()
    }

    /// The element that links `a` and `b`, if any.
    ///
    /// For a single credit this is `a`'s spelling. For cast and genres it is
    /// the first entry of `b` that also appears in `a`.
    pub fn shared<'m>(self, a: &'m Movie, b: &'m Movie) -> Option<&'m str> {
        match self {
            Connection::Actor => first_common(&a.actors, &b.actors),
            Connection::Genre => first_common(&a.genres, &b.genres),
            Connection::Director => same_credit(&a.director, &b.director),
            Connection::Writer => same_credit(&a.writer, &b.writer),
            Connection::Composer => same_credit(&a.composer, &b.composer),
            Connection::Cinematographer => same_credit(&a.cinematographer, &b.cinematographer),
        }
    }

    /// Every way `a` and `b` are linked, with the shared element.
    pub fn between<'m>(a: &'m Movie, b: &'m Movie) -> Vec<(Connection, &'m str)> {
        Connection::ALL
            .into_iter()
            .filter_map(|connection| connection.shared(a, b).map(|shared| (connection, shared)))
            .collect()
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a connection name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConnection(pub String);

impl fmt::Display for UnknownConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown connection {:?}", self.0)
    }
}

impl std::error::Error for UnknownConnection {}

impl FromStr for Connection {
    type Err = UnknownConnection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Connection::ALL
            .into_iter()
            .find(|c| same_name(c.name(), s))
            .ok_or_else(|| UnknownConnection(s.to_string()))
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn same_credit<'m>(a: &'m Option<String>, b: &'m Option<String>) -> Option<&'m str> {
    match (a, b) {
        (Some(a), Some(b)) if same_name(a, b) => Some(a.as_str()),
        _ => None,
    }
}

fn first_common<'m>(a: &'m [String], b: &'m [String]) -> Option<&'m str> {
    b.iter()
        .find(|name| a.iter().any(|other| same_name(other, name)))
        .map(String::as_str)
}
