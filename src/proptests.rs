use super::*;
use crate::node::fold_key;

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Reference model: folded key -> (latest key, latest payload), plus every
/// successful insertion for prefix counting.
#[derive(Default)]
struct Model {
    latest: BTreeMap<Vec<u8>, (String, u32)>,
    inserted: Vec<Vec<u8>>,
}

impl Model {
    fn insert(&mut self, word: &str, payload: u32) -> Result<(), InsertError> {
        if word.is_empty() {
            return Err(InsertError::Empty);
        }
        let folded = fold_key(word)?.to_vec();
        self.inserted.push(folded.clone());
        self.latest.insert(folded, (word.to_string(), payload));
        Ok(())
    }

    fn count(&self, prefix: &[u8]) -> u32 {
        self.inserted.iter().filter(|k| k.starts_with(prefix)).count() as u32
    }

    /// Pre-order over folded bytes is plain lexicographic order on the
    /// folded keys, which is how the BTreeMap is already sorted.
    fn suggestions(&self, prefix: &[u8]) -> Vec<(String, u32)> {
        self.latest
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }
}

fn title_strategy() -> impl Strategy<Value = String> {
    // A small alphabet keeps shared prefixes and case collisions frequent; the
    // odd out-of-range character exercises rejection.
    let ch = prop_oneof![
        20 => prop::sample::select(vec!['a', 'b', 'A', 'B', ' ', '7']),
        2 => prop::sample::select(vec!['é', 'É', ':']),
        1 => Just('ж'),
    ];
    prop::collection::vec(ch, 0..=8).prop_map(|chars| chars.into_iter().collect())
}

fn wide_title_strategy() -> impl Strategy<Value = String> {
    // Full alphabet range so dense child tables show up.
    prop::collection::vec(1u8..=255, 1..=3)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

fn entries(found: Vec<Entry<u32>>) -> Vec<(String, u32)> {
    found.into_iter().map(Entry::into_parts).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(
        words in prop::collection::vec(title_strategy(), 0..=200),
        queries in prop::collection::vec(title_strategy(), 0..=50),
    ) {
        let mut builder = PrefixIndex::builder();
        let mut model = Model::default();

        for (i, word) in words.iter().enumerate() {
            let got = builder.insert(word, i as u32);
            let expected = model.insert(word, i as u32);
            prop_assert_eq!(got, expected);
        }
        let index = builder.finish();
        prop_assert_eq!(index.verify(), Vec::<String>::new());
        prop_assert_eq!(index.len(), model.inserted.len());

        for query in queries.iter().chain(words.iter()) {
            match fold_key(query) {
                Ok(folded) => {
                    prop_assert_eq!(index.count_with_prefix(query), model.count(&folded));
                    prop_assert_eq!(entries(index.suggestions_for(query)), model.suggestions(&folded));
                }
                Err(_) => {
                    prop_assert!(index.subtree_for(query).is_none());
                    prop_assert!(index.suggestions_for(query).is_empty());
                }
            }
        }
    }

    #[test]
    fn prop_round_trip(words in prop::collection::vec(title_strategy(), 1..=100)) {
        let (index, _) = PrefixIndex::build(words.iter().map(|w| (w.as_str(), ())));
        for word in &words {
            if word.is_empty() || fold_key(word).is_err() {
                continue;
            }
            let found = index.suggestions_for(word);
            let folded = fold_key(word).unwrap();
            prop_assert!(found.iter().any(|e| fold_key(e.key()).unwrap() == folded));
            prop_assert!(index.get(&word.to_uppercase()).is_some());
        }
    }

    #[test]
    fn prop_prefix_monotonic(
        words in prop::collection::vec(title_strategy(), 0..=100),
        probe in title_strategy(),
    ) {
        let (index, _) = PrefixIndex::build(words.iter().map(|w| (w.as_str(), 0u8)));
        let chars: Vec<char> = probe.chars().collect();
        for cut in 1..=chars.len() {
            let shorter: String = chars[..cut - 1].iter().collect();
            let longer: String = chars[..cut].iter().collect();
            prop_assert!(index.count_with_prefix(&shorter) >= index.count_with_prefix(&longer));
        }
    }

    #[test]
    fn prop_wide_alphabet(words in prop::collection::vec(wide_title_strategy(), 0..=400)) {
        let mut builder = PrefixIndex::builder();
        let mut model = Model::default();
        for (i, word) in words.iter().enumerate() {
            prop_assert_eq!(builder.insert(word, i as u32), model.insert(word, i as u32));
        }
        let index = builder.finish();
        prop_assert_eq!(index.verify(), Vec::<String>::new());
        prop_assert_eq!(entries(index.suggestions_for("")), model.suggestions(b""));
    }

    #[test]
    fn prop_top_is_prefix_of_all(
        words in prop::collection::vec(title_strategy(), 0..=100),
        prefix in title_strategy(),
        limit in 0usize..10,
    ) {
        let (index, _) = PrefixIndex::build(words.iter().map(|w| (w.as_str(), 1u16)));
        let all = index.suggestions_for(&prefix);
        let top = index.top_suggestions(&prefix, limit);
        prop_assert_eq!(top.len(), all.len().min(limit));
        prop_assert_eq!(&all[..top.len()], &top[..]);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let words = ["a", "B", "c", "aa", "Ab", "ba"];

    for_each_permutation(&words, |perm| {
        let (index, report) = PrefixIndex::build(perm.iter().map(|w| (*w, ())));
        assert_eq!(report.inserted, words.len());
        assert!(index.verify().is_empty());

        // Insertion order never changes what is found or where.
        let keys: Vec<&str> = index.suggestions("").map(Entry::key).collect();
        assert_eq!(keys, ["a", "aa", "Ab", "B", "ba", "c"]);
        assert_eq!(index.count_with_prefix("A"), 3);
        assert_eq!(index.count_with_prefix("b"), 2);
    });
}
