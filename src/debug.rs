//! Structural checks for troubleshooting.

use crate::node::{fold_key, FoldedKey, NodeId};
use crate::PrefixIndex;

impl<P> PrefixIndex<P> {
    /// Check the tree's structural invariants and describe every violation.
    ///
    /// An empty result means the index is consistent: every node is reachable
    /// exactly once, children are strictly ascending, each node's count equals
    /// the insertions ending there plus its children's counts, and each entry's
    /// key folds to the path that reaches it.
    pub fn verify(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<(NodeId, FoldedKey)> = vec![(NodeId::ROOT, FoldedKey::new())];

        if self.nodes[NodeId::ROOT.index()].is_terminal() {
            issues.push("root holds an entry".to_string());
        }

        while let Some((id, path)) = stack.pop() {
            let label = String::from_utf8_lossy(&path).into_owned();
            if std::mem::replace(&mut seen[id.index()], true) {
                issues.push(format!("node {:?} ({:?}) reachable twice", id, label));
                continue;
            }
            let node = &self.nodes[id.index()];

            let mut below = 0u64;
            let mut prev: Option<u8> = None;
            for (byte, child) in node.children.iter() {
                if prev.is_some_and(|p| p >= byte) {
                    issues.push(format!("children of {:?} out of order at {}", label, byte));
                }
                prev = Some(byte);
                below += u64::from(self.nodes[child.index()].count);

                let mut child_path = path.clone();
                child_path.push(byte);
                stack.push((child, child_path));
            }

            let count = u64::from(node.count);
            match &node.entry {
                Some(_) if count <= below => issues.push(format!(
                    "terminal {:?} has count {} but children hold {}",
                    label, count, below
                )),
                None if count != below => issues.push(format!(
                    "non-terminal {:?} has count {} but children hold {}",
                    label, count, below
                )),
                _ => {}
            }

            if id != NodeId::ROOT && count == 0 {
                issues.push(format!("node {:?} has zero count", label));
            }

            if let Some(entry) = &node.entry {
                match fold_key(entry.key()) {
                    Ok(folded) if folded == path => {}
                    Ok(_) => issues.push(format!(
                        "entry {:?} stored under {:?}",
                        entry.key(),
                        label
                    )),
                    Err(err) => issues.push(format!("entry {:?}: {}", entry.key(), err)),
                }
            }
        }

        let unreachable = seen.iter().filter(|s| !**s).count();
        if unreachable > 0 {
            issues.push(format!("{} unreachable nodes", unreachable));
        }

        issues
    }
}
