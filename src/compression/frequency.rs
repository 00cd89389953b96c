//! Symbol frequency counting.

use std::collections::btree_map::{self, BTreeMap};

/// Occurrence count of every distinct symbol in a source text.
///
/// Symbols are kept in ascending order so that everything derived from the
/// table (tree shape, codewords, reports) is reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S> {
    weights: BTreeMap<S, u64>,
}

impl<S: Ord> FrequencyTable<S> {
    /// Count how often each symbol occurs in `symbols`.
    pub fn count<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        symbols.into_iter().map(|symbol| (symbol, 1)).collect()
    }

    /// Weight recorded for `symbol`, if it occurs at all.
    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.weights.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights, i.e. the length of the counted text. Saturates at
    /// `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.weights.values().fold(0, |sum, &weight| sum.saturating_add(weight))
    }

    /// Iterate `(symbol, weight)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, u64)> + '_ {
        self.weights.iter().map(|(symbol, &weight)| (symbol, weight))
    }
}

impl<S> Default for FrequencyTable<S> {
    fn default() -> Self {
        FrequencyTable {
            weights: BTreeMap::new(),
        }
    }
}

/// Repeated symbols accumulate their weights.
impl<S: Ord> FromIterator<(S, u64)> for FrequencyTable<S> {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut weights = BTreeMap::new();
        for (symbol, weight) in iter {
            let entry = weights.entry(symbol).or_insert(0u64);
            *entry = entry.saturating_add(weight);
        }
        FrequencyTable { weights }
    }
}

impl<S> IntoIterator for FrequencyTable<S> {
    type Item = (S, u64);
    type IntoIter = btree_map::IntoIter<S, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_characters() {
        let freq = FrequencyTable::count("aabccc".chars());
        assert_eq!(freq.get(&'a'), Some(2));
        assert_eq!(freq.get(&'b'), Some(1));
        assert_eq!(freq.get(&'c'), Some(3));
        assert_eq!(freq.get(&'d'), None);
        assert_eq!(freq.len(), 3);
        assert_eq!(freq.total(), 6);
    }

    #[test]
    fn test_count_bytes() {
        let freq = FrequencyTable::count(b"hello".iter().copied());
        assert_eq!(freq.get(&b'l'), Some(2));
        assert_eq!(freq.len(), 4);
    }

    #[test]
    fn test_empty_input() {
        let freq = FrequencyTable::count("".chars());
        assert!(freq.is_empty());
        assert_eq!(freq.total(), 0);
    }

    #[test]
    fn test_pairs_accumulate_and_sort() {
        let freq: FrequencyTable<char> = [('b', 2), ('a', 1), ('b', 3)].into_iter().collect();
        assert_eq!(freq.get(&'b'), Some(5));
        let symbols: Vec<char> = freq.iter().map(|(s, _)| *s).collect();
        assert_eq!(symbols, vec!['a', 'b']);
    }

    #[test]
    fn test_weights_saturate() {
        let freq: FrequencyTable<char> = [('a', u64::MAX), ('a', 1), ('b', u64::MAX)]
            .into_iter()
            .collect();
        assert_eq!(freq.get(&'a'), Some(u64::MAX));
        assert_eq!(freq.total(), u64::MAX);
    }
}
