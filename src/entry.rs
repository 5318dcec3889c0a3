//! Completed titles and their payloads.

/// A complete inserted string and the payload it was inserted with.
///
/// `key` keeps the exact casing it was inserted with; only the path through the
/// index is case-folded. Entries returned by
/// [`PrefixIndex::suggestions_for`](crate::PrefixIndex::suggestions_for) are
/// owned copies, so nothing done to them reaches back into the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<P> {
    key: String,
    payload: P,
}

impl<P> Entry<P> {
    pub(crate) fn new(key: String, payload: P) -> Self {
        Self { key, payload }
    }

    /// The string as it was inserted.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The payload stored alongside the key.
    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Split the entry into its key and payload.
    pub fn into_parts(self) -> (String, P) {
        (self.key, self.payload)
    }
}
