//! Insertion errors.

/// Why a string was not added to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The string had no characters.
    Empty,
    /// A character's code point is outside `[0, ALPHABET_SIZE)`.
    InvalidChar {
        /// The offending character.
        ch: char,
        /// Its position, counted in characters.
        position: usize,
    },
}

impl std::fmt::Display for InsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertError::Empty => write!(f, "empty string"),
            InsertError::InvalidChar { ch, position } => write!(
                f,
                "character {:?} (U+{:04X}) at position {} is outside the index alphabet",
                ch, *ch as u32, position
            ),
        }
    }
}

impl std::error::Error for InsertError {}
