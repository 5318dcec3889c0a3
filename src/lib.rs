//! # title-trie
//!
//! A case-insensitive prefix index for live title autocomplete.
//!
//! The index has two phases. A [`PrefixIndexBuilder`] accepts insertions and
//! is consumed by [`PrefixIndexBuilder::finish`] into a [`PrefixIndex`], which
//! only answers queries. Once built, an index is never mutated, so shared
//! references can be handed to any number of readers.
//!
//! Lookups fold ASCII and Latin-1 letters to lowercase, while every stored
//! [`Entry`] keeps the original casing for display. Characters outside the
//! 256-code alphabet make an insertion fail as a whole and make a lookup come
//! back empty.
//!
//! ## Example
//!
//! ```rust
//! use title_trie::PrefixIndex;
//!
//! let mut builder = PrefixIndex::builder();
//! builder.insert("Harry Potter and the Chamber of Secrets", 1u32).unwrap();
//! builder.insert("Harry Potter and the Goblet of Fire", 2u32).unwrap();
//! builder.insert("Heat", 3u32).unwrap();
//! let index = builder.finish();
//!
//! assert_eq!(index.count_with_prefix("harry potter"), 2);
//!
//! let titles: Vec<String> = index
//!     .suggestions_for("HARRY POT")
//!     .into_iter()
//!     .map(|entry| entry.key().to_owned())
//!     .collect();
//! assert_eq!(
//!     titles,
//!     [
//!         "Harry Potter and the Chamber of Secrets",
//!         "Harry Potter and the Goblet of Fire",
//!     ]
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod debug;
mod entry;
mod error;
mod node;

pub use entry::Entry;
pub use error::InsertError;
pub use node::ALPHABET_SIZE;

use std::iter::FusedIterator;

use tracing::{debug, warn};

use node::{fold, fold_key, NodeId, TrieNode};

// =============================================================================
// Records
// =============================================================================

/// A record that can be indexed under its title.
pub trait IndexRecord {
    /// Handle stored with the title in the index.
    type Payload;

    /// Display title, or `None` when the record has none.
    fn title(&self) -> Option<&str>;

    /// Handle identifying this record.
    fn payload(&self) -> Self::Payload;
}

impl<S: AsRef<str>, P: Clone> IndexRecord for (S, P) {
    type Payload = P;

    fn title(&self) -> Option<&str> {
        Some(self.0.as_ref())
    }

    fn payload(&self) -> P {
        self.1.clone()
    }
}

/// Outcome of [`PrefixIndex::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Records whose titles were inserted.
    pub inserted: usize,
    /// Records skipped for a missing or empty title.
    pub skipped_empty: usize,
    /// Records skipped for a title with a character outside the alphabet.
    pub skipped_invalid: usize,
}

// =============================================================================
// Build phase
// =============================================================================

/// Accumulates insertions for a [`PrefixIndex`].
pub struct PrefixIndexBuilder<P> {
    nodes: Vec<TrieNode<P>>,
}

impl<P> PrefixIndexBuilder<P> {
    /// Create a builder holding only the root node.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Create a builder with room for `nodes` nodes before reallocating.
    pub fn with_capacity(nodes: usize) -> Self {
        let mut arena = Vec::with_capacity(nodes.max(1));
        arena.push(TrieNode::new());
        Self { nodes: arena }
    }

    /// Number of successful insertions so far, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes[NodeId::ROOT.index()].count as usize
    }

    /// Returns `true` if nothing has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `word` with `payload`.
    ///
    /// The word is validated before the tree is touched, so a rejected word
    /// leaves no trace. Inserting a word that is already present replaces its
    /// entry, keeping the new casing and payload, and still counts as an
    /// insertion for [`PrefixIndex::count_with_prefix`].
    pub fn insert(&mut self, word: &str, payload: P) -> Result<(), InsertError> {
        if word.is_empty() {
            return Err(InsertError::Empty);
        }
        let path = fold_key(word)?;

        let mut id = NodeId::ROOT;
        self.bump(id);
        for &byte in &path {
            id = match self.nodes[id.index()].children.get(byte) {
                Some(child) => child,
                None => {
                    let child = NodeId::from_index(self.nodes.len());
                    self.nodes.push(TrieNode::new());
                    self.nodes[id.index()].children.insert(byte, child);
                    child
                }
            };
            self.bump(id);
        }

        self.nodes[id.index()].entry = Some(Entry::new(word.to_owned(), payload));
        Ok(())
    }

    #[inline]
    fn bump(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.index()];
        node.count = node.count.saturating_add(1);
    }

    /// Freeze the builder into a queryable index.
    pub fn finish(mut self) -> PrefixIndex<P> {
        self.nodes.shrink_to_fit();
        PrefixIndex { nodes: self.nodes }
    }
}

impl<P> Default for PrefixIndexBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Query phase
// =============================================================================

/// An immutable, case-insensitive prefix index over titles.
pub struct PrefixIndex<P> {
    nodes: Vec<TrieNode<P>>,
}

impl<P> PrefixIndex<P> {
    /// Start building a new index.
    pub fn builder() -> PrefixIndexBuilder<P> {
        PrefixIndexBuilder::new()
    }

    /// Build an index from `records` in one pass.
    ///
    /// Records without a title, or whose title has a character outside the
    /// alphabet, are skipped and logged; the batch always completes.
    pub fn build<I, R>(records: I) -> (Self, BuildReport)
    where
        I: IntoIterator<Item = R>,
        R: IndexRecord<Payload = P>,
    {
        let mut builder = PrefixIndexBuilder::new();
        let mut report = BuildReport::default();

        for record in records {
            let Some(title) = record.title() else {
                report.skipped_empty += 1;
                continue;
            };
            match builder.insert(title, record.payload()) {
                Ok(()) => report.inserted += 1,
                Err(InsertError::Empty) => report.skipped_empty += 1,
                Err(err) => {
                    warn!(title, %err, "skipping title");
                    report.skipped_invalid += 1;
                }
            }
        }

        let index = builder.finish();
        debug!(
            inserted = report.inserted,
            skipped_empty = report.skipped_empty,
            skipped_invalid = report.skipped_invalid,
            nodes = index.node_count(),
            "built prefix index"
        );
        (index, report)
    }

    /// Number of successful insertions, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.root().count() as usize
    }

    /// Returns `true` if nothing was inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Approximate bytes held by the index.
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<TrieNode<P>>()
            + self.nodes.iter().map(TrieNode::heap_bytes).sum::<usize>()
    }

    /// The subtree for the empty prefix.
    pub fn root(&self) -> Subtree<'_, P> {
        Subtree {
            nodes: &self.nodes,
            id: NodeId::ROOT,
        }
    }

    /// The subtree reached by following `prefix`, case-insensitively.
    ///
    /// Returns `None` if no inserted string starts with `prefix`, or if
    /// `prefix` has a character outside the alphabet.
    pub fn subtree_for(&self, prefix: &str) -> Option<Subtree<'_, P>> {
        let mut id = NodeId::ROOT;
        for ch in prefix.chars() {
            id = self.nodes[id.index()].children.get(fold(ch)?)?;
        }
        Some(Subtree {
            nodes: &self.nodes,
            id,
        })
    }

    /// Number of insertions whose key starts with `prefix`.
    pub fn count_with_prefix(&self, prefix: &str) -> u32 {
        self.subtree_for(prefix).map_or(0, |subtree| subtree.count())
    }

    /// The entry stored under exactly `key`, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&Entry<P>> {
        self.subtree_for(key)?.entry()
    }

    /// Lazily walk every entry whose key starts with `prefix`.
    ///
    /// Entries come out depth-first, a key before its extensions and siblings
    /// in ascending folded character code. This is not a relevance order.
    pub fn suggestions(&self, prefix: &str) -> Suggestions<'_, P> {
        match self.subtree_for(prefix) {
            Some(subtree) => subtree.suggestions(),
            None => Suggestions {
                nodes: &self.nodes,
                stack: Vec::new(),
            },
        }
    }

    /// Copies of every entry whose key starts with `prefix`, in the order of
    /// [`suggestions`](Self::suggestions). Empty if there are none.
    pub fn suggestions_for(&self, prefix: &str) -> Vec<Entry<P>>
    where
        P: Clone,
    {
        self.suggestions(prefix).cloned().collect()
    }

    /// At most `limit` copies from the front of
    /// [`suggestions_for`](Self::suggestions_for), without walking the rest of
    /// the subtree.
    pub fn top_suggestions(&self, prefix: &str, limit: usize) -> Vec<Entry<P>>
    where
        P: Clone,
    {
        self.suggestions(prefix).take(limit).cloned().collect()
    }
}

impl<P: Clone> Clone for PrefixIndex<P> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
        }
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for PrefixIndex<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.suggestions("").map(|e| (e.key(), e.payload())))
            .finish()
    }
}

/// Read-only view of the node at the end of a prefix.
pub struct Subtree<'a, P> {
    nodes: &'a [TrieNode<P>],
    id: NodeId,
}

impl<'a, P> Subtree<'a, P> {
    #[inline]
    fn node(&self) -> &'a TrieNode<P> {
        &self.nodes[self.id.index()]
    }

    /// Number of insertions whose key passes through this node.
    #[inline]
    pub fn count(&self) -> u32 {
        self.node().count
    }

    /// Returns `true` if some inserted key ends exactly here.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.node().is_terminal()
    }

    /// The entry for the key ending exactly here.
    pub fn entry(&self) -> Option<&'a Entry<P>> {
        self.node().entry.as_ref()
    }

    /// Number of distinct characters that extend this prefix.
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Walk every entry in this subtree, this node's own entry first.
    pub fn suggestions(&self) -> Suggestions<'a, P> {
        Suggestions {
            nodes: self.nodes,
            stack: vec![self.id],
        }
    }
}

impl<P> Clone for Subtree<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Subtree<'_, P> {}

impl<P> std::fmt::Debug for Subtree<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subtree")
            .field("count", &self.count())
            .field("terminal", &self.is_terminal())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Depth-first iterator over entries, returned by
/// [`PrefixIndex::suggestions`] and [`Subtree::suggestions`].
pub struct Suggestions<'a, P> {
    nodes: &'a [TrieNode<P>],
    stack: Vec<NodeId>,
}

impl<'a, P> Iterator for Suggestions<'a, P> {
    type Item = &'a Entry<P>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = &self.nodes[id.index()];
            self.stack
                .extend(node.children.iter().rev().map(|(_, child)| child));
            if let Some(ref entry) = node.entry {
                return Some(entry);
            }
        }
        None
    }
}

impl<P> FusedIterator for Suggestions<'_, P> {}


#[cfg(test)]
mod proptests;
