//! Trie nodes with adaptive child tables.
//!
//! Most title positions branch into only a handful of characters, so a node
//! starts with a small sorted table of `(byte, child)` pairs held inline and is
//! promoted to a direct 256-slot table once its fan-out passes
//! [`SPARSE_MAX_CHILDREN`]. Both layouts iterate children in ascending byte
//! order, which is what fixes the suggestion order.

use smallvec::SmallVec;

use crate::entry::Entry;
use crate::error::InsertError;

/// Number of distinct character codes a node can branch on.
pub const ALPHABET_SIZE: usize = 256;

/// Largest fan-out kept in the sparse layout.
const SPARSE_MAX_CHILDREN: usize = 16;

/// Folded keys at or below this length are kept off the heap.
pub(crate) type FoldedKey = SmallVec<[u8; 64]>;

/// Handle to a node in the index arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    /// Panics if the arena has outgrown 32-bit ids.
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("node arena exceeds u32 ids"))
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Map a character to its child-table slot.
///
/// Returns `None` for characters outside `[0, ALPHABET_SIZE)`. ASCII and
/// Latin-1 uppercase letters fold to their lowercase forms; everything else
/// in range (digits, punctuation, spaces) passes through unchanged.
#[inline]
pub(crate) fn fold(ch: char) -> Option<u8> {
    let byte = u8::try_from(u32::from(ch)).ok()?;
    Some(match byte {
        b'A'..=b'Z' => byte + 0x20,
        // U+00D7 MULTIPLICATION SIGN sits inside the Latin-1 uppercase block.
        0xC0..=0xDE if byte != 0xD7 => byte + 0x20,
        _ => byte,
    })
}

/// Fold every character of `word`, rejecting the whole word on the first
/// out-of-range character.
pub(crate) fn fold_key(word: &str) -> Result<FoldedKey, InsertError> {
    word.chars()
        .enumerate()
        .map(|(position, ch)| fold(ch).ok_or(InsertError::InvalidChar { ch, position }))
        .collect()
}

#[derive(Clone)]
pub(crate) enum Children {
    /// Sorted by byte, at most `SPARSE_MAX_CHILDREN` long.
    Sparse(SmallVec<[(u8, NodeId); 4]>),
    Dense {
        slots: Box<[Option<NodeId>; ALPHABET_SIZE]>,
        len: u16,
    },
}

impl Children {
    fn new() -> Self {
        Children::Sparse(SmallVec::new())
    }

    #[inline]
    pub(crate) fn get(&self, byte: u8) -> Option<NodeId> {
        match self {
            Children::Sparse(pairs) => pairs
                .binary_search_by_key(&byte, |&(b, _)| b)
                .ok()
                .map(|i| pairs[i].1),
            Children::Dense { slots, .. } => slots[byte as usize],
        }
    }

    /// Link `child` under `byte`. The slot must be empty.
    pub(crate) fn insert(&mut self, byte: u8, child: NodeId) {
        if let Children::Sparse(pairs) = self {
            if pairs.len() >= SPARSE_MAX_CHILDREN {
                self.promote();
            }
        }

        match self {
            Children::Sparse(pairs) => {
                let at = match pairs.binary_search_by_key(&byte, |&(b, _)| b) {
                    Ok(_) => unreachable!("child slot {byte} already occupied"),
                    Err(at) => at,
                };
                pairs.insert(at, (byte, child));
            }
            Children::Dense { slots, len } => {
                debug_assert!(slots[byte as usize].is_none());
                slots[byte as usize] = Some(child);
                *len += 1;
            }
        }
    }

    fn promote(&mut self) {
        if let Children::Sparse(pairs) = self {
            let mut slots = Box::new([None; ALPHABET_SIZE]);
            for &(byte, child) in pairs.iter() {
                slots[byte as usize] = Some(child);
            }
            let len = pairs.len() as u16;
            *self = Children::Dense { slots, len };
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Children::Sparse(pairs) => pairs.len(),
            Children::Dense { len, .. } => *len as usize,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_dense(&self) -> bool {
        matches!(self, Children::Dense { .. })
    }

    /// Children in ascending byte order.
    pub(crate) fn iter(&self) -> ChildIter<'_> {
        match self {
            Children::Sparse(pairs) => ChildIter::Sparse(pairs.iter()),
            Children::Dense { slots, .. } => ChildIter::Dense(slots.iter().enumerate()),
        }
    }

    fn heap_bytes(&self) -> usize {
        match self {
            Children::Sparse(pairs) if pairs.spilled() => {
                pairs.capacity() * std::mem::size_of::<(u8, NodeId)>()
            }
            Children::Sparse(_) => 0,
            Children::Dense { .. } => std::mem::size_of::<[Option<NodeId>; ALPHABET_SIZE]>(),
        }
    }
}

pub(crate) enum ChildIter<'a> {
    Sparse(std::slice::Iter<'a, (u8, NodeId)>),
    Dense(std::iter::Enumerate<std::slice::Iter<'a, Option<NodeId>>>),
}

impl Iterator for ChildIter<'_> {
    type Item = (u8, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ChildIter::Sparse(it) => it.next().copied(),
            ChildIter::Dense(it) => it.find_map(|(byte, slot)| slot.map(|id| (byte as u8, id))),
        }
    }
}

impl DoubleEndedIterator for ChildIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self {
            ChildIter::Sparse(it) => it.next_back().copied(),
            ChildIter::Dense(it) => {
                while let Some((byte, slot)) = it.next_back() {
                    if let Some(id) = slot {
                        return Some((byte as u8, *id));
                    }
                }
                None
            }
        }
    }
}

/// A node of the prefix tree.
///
/// `count` is the number of insertions whose path passed through this node,
/// duplicates included. A node is terminal iff it holds an entry.
#[derive(Clone)]
pub(crate) struct TrieNode<P> {
    pub(crate) entry: Option<Entry<P>>,
    pub(crate) count: u32,
    pub(crate) children: Children,
}

impl<P> TrieNode<P> {
    pub(crate) fn new() -> Self {
        Self {
            entry: None,
            count: 0,
            children: Children::new(),
        }
    }

    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.entry.is_some()
    }

    pub(crate) fn heap_bytes(&self) -> usize {
        self.children.heap_bytes() + self.entry.as_ref().map_or(0, |e| e.key().len())
    }
}
