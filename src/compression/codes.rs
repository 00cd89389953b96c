//! Codewords and the symbol → codeword table derived from a coding tree.

use super::frequency::FrequencyTable;
use super::tree::{CodingTree, Node};
use crate::error::Error;
use bitvec::prelude::*;
use std::cmp::Reverse;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{self, Debug, Write as _};
use std::str::FromStr;

/// Root-to-leaf path of a symbol: `0` for a left turn, `1` for a right turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Codeword(BitVec<u8, Msb0>);

impl Codeword {
    pub fn new() -> Self {
        Codeword(BitVec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }

    /// Copy of this codeword with one more bit appended.
    pub(crate) fn extended(&self, bit: bool) -> Self {
        let mut next = self.clone();
        next.push(bit);
        next
    }

    /// True when `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        self.len() <= other.len() && other.0[..self.len()] == self.0[..]
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0.iter().by_vals() {
            f.write_char(if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Parses binary strings such as `"0110"`; the empty string is rejected.
impl FromStr for Codeword {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::MalformedCodebook("empty codeword".to_string()));
        }
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::MalformedCodebook(format!(
                    "codeword {s:?} is not a binary string"
                ))),
            })
            .collect()
    }
}

impl FromIterator<bool> for Codeword {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Codeword(iter.into_iter().collect())
    }
}

/// Bijective mapping from symbols to their codewords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S> {
    codes: BTreeMap<S, Codeword>,
}

impl<S> Default for CodeTable<S> {
    fn default() -> Self {
        CodeTable {
            codes: BTreeMap::new(),
        }
    }
}

impl<S: Ord> CodeTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a codeword, returning the one previously assigned to `symbol`.
    pub fn insert(&mut self, symbol: S, codeword: Codeword) -> Option<Codeword> {
        self.codes.insert(symbol, codeword)
    }

    pub fn get(&self, symbol: &S) -> Option<&Codeword> {
        self.codes.get(symbol)
    }

    pub fn contains(&self, symbol: &S) -> bool {
        self.codes.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate `(symbol, codeword)` pairs in ascending symbol order.
    pub fn iter(&self) -> btree_map::Iter<'_, S, Codeword> {
        self.codes.iter()
    }

    /// Length of the longest codeword, zero for an empty table.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(Codeword::len).max().unwrap_or(0)
    }

    /// Check that no codeword is a prefix of another one.
    pub fn is_prefix_free(&self) -> bool {
        let mut words: Vec<String> = self.codes.values().map(Codeword::to_string).collect();
        words.sort_unstable();
        // Sorted lexicographically, a prefix sits right before its extensions.
        words.windows(2).all(|pair| !pair[1].starts_with(&pair[0]))
    }

    /// Number of bits the text counted by `frequencies` encodes to.
    /// Saturates at `u64::MAX`.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable<S>) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, weight)| {
                self.get(symbol)
                    .map(|code| weight.saturating_mul(code.len() as u64))
            })
            .fold(0, u64::saturating_add)
    }

    /// Weighted mean codeword length in bits per symbol.
    pub fn average_length(&self, frequencies: &FrequencyTable<S>) -> f64 {
        match frequencies.total() {
            0 => 0.0,
            total => self.encoded_bit_len(frequencies) as f64 / total as f64,
        }
    }
}

impl<S: Ord + Debug> CodeTable<S> {
    /// Human-readable table of every symbol with its weight and codeword,
    /// heaviest symbols first.
    pub fn report(&self, frequencies: &FrequencyTable<S>) -> String {
        let mut rows: Vec<(&S, u64, &Codeword)> = self
            .iter()
            .map(|(symbol, code)| (symbol, frequencies.get(symbol).unwrap_or(0), code))
            .collect();
        rows.sort_by_key(|&(symbol, weight, _)| (Reverse(weight), symbol));

        let mut out = format!("{:<10}{:>10}  {:<20}{:>6}\n", "Symbol", "Weight", "Code", "Length");
        for (symbol, weight, code) in rows {
            let _ = writeln!(
                out,
                "{:<10}{:>10}  {:<20}{:>6}",
                format!("{symbol:?}"),
                weight,
                code.to_string(),
                code.len()
            );
        }
        out
    }
}

impl<S: Ord> FromIterator<(S, Codeword)> for CodeTable<S> {
    fn from_iter<T: IntoIterator<Item = (S, Codeword)>>(iter: T) -> Self {
        CodeTable {
            codes: iter.into_iter().collect(),
        }
    }
}

impl<'a, S> IntoIterator for &'a CodeTable<S> {
    type Item = (&'a S, &'a Codeword);
    type IntoIter = btree_map::Iter<'a, S, Codeword>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

/// Derive the codeword of every leaf of `tree`.
///
/// The single-leaf tree of a one-symbol alphabet gets the codeword `0`, so
/// every symbol occupies at least one bit of the archive.
pub fn generate_codes<S: Ord + Clone>(tree: &CodingTree<S>) -> CodeTable<S> {
    let mut table = CodeTable::new();
    let mut stack = vec![(tree.root(), Codeword::new())];

    while let Some((id, path)) = stack.pop() {
        match tree.node(id) {
            Node::Leaf { symbol, .. } => {
                let code = if path.is_empty() {
                    Codeword::from_iter([false])
                } else {
                    path
                };
                table.insert(symbol.clone(), code);
            }
            Node::Internal { left, right, .. } => {
                stack.push((*right, path.extended(true)));
                stack.push((*left, path.extended(false)));
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::tree::build_tree;

    fn code(s: &str) -> Codeword {
        s.parse().unwrap()
    }

    fn codes_for(pairs: &[(char, u64)]) -> (FrequencyTable<char>, CodeTable<char>) {
        let freq: FrequencyTable<char> = pairs.iter().copied().collect();
        let tree = build_tree(&freq).unwrap();
        let codes = generate_codes(&tree);
        (freq, codes)
    }

    #[test]
    fn test_codeword_text_form() {
        let c = code("0110");
        assert_eq!(c.len(), 4);
        assert_eq!(c.to_string(), "0110");
        assert!(c.bits()[1]);
        assert!("".parse::<Codeword>().is_err());
        assert!("01a".parse::<Codeword>().is_err());
    }

    #[test]
    fn test_codeword_prefix() {
        assert!(code("01").is_prefix_of(&code("0110")));
        assert!(code("01").is_prefix_of(&code("01")));
        assert!(!code("011").is_prefix_of(&code("01")));
        assert!(!code("10").is_prefix_of(&code("0110")));
    }

    #[test]
    fn test_classic_frequencies() {
        let (freq, codes) = codes_for(&[
            ('a', 5),
            ('b', 9),
            ('c', 12),
            ('d', 13),
            ('e', 16),
            ('f', 45),
        ]);

        let expected = [
            ('a', "1100"),
            ('b', "1101"),
            ('c', "100"),
            ('d', "101"),
            ('e', "111"),
            ('f', "0"),
        ];
        for (symbol, word) in expected {
            assert_eq!(codes.get(&symbol), Some(&code(word)), "symbol {symbol}");
        }

        // Heavier symbols never get longer codewords.
        let mut by_weight: Vec<(u64, usize)> = freq
            .iter()
            .map(|(symbol, weight)| (weight, codes.get(symbol).unwrap().len()))
            .collect();
        by_weight.sort();
        assert!(by_weight.windows(2).all(|pair| pair[0].1 >= pair[1].1));

        assert_eq!(codes.encoded_bit_len(&freq), 224);
        assert!((codes.average_length(&freq) - 2.24).abs() < 1e-9);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let text = "this is an example for huffman encoding";
        let freq = FrequencyTable::count(text.chars());
        let codes = generate_codes(&build_tree(&freq).unwrap());
        assert_eq!(codes.len(), freq.len());
        for ch in text.chars() {
            assert!(codes.contains(&ch), "missing code for {ch:?}");
        }
        assert!(codes.is_prefix_free());

        for (a, code_a) in &codes {
            for (b, code_b) in &codes {
                if a != b {
                    assert!(!code_a.is_prefix_of(code_b), "{a:?} prefixes {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_prefix_check_rejects_overlap() {
        let table: CodeTable<char> = [('a', code("0")), ('b', code("01")), ('c', code("1"))]
            .into_iter()
            .collect();
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_single_leaf_gets_zero() {
        let (_, codes) = codes_for(&[('z', 12)]);
        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get(&'z'), Some(&code("0")));
        assert_eq!(codes.max_len(), 1);
    }

    #[test]
    fn test_report_orders_by_weight() {
        let (freq, codes) = codes_for(&[('a', 4), ('b', 3), ('c', 2)]);
        let report = codes.report(&freq);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Symbol"));
        assert!(lines[1].starts_with("'a'"));
        assert!(lines[2].starts_with("'b'"));
        assert!(lines[3].starts_with("'c'"));
        assert!(lines[3].contains("10"));
    }

    #[test]
    fn test_bit_length_saturates() {
        let (freq, codes) = codes_for(&[('a', u64::MAX), ('b', u64::MAX), ('c', 3)]);
        assert_eq!(codes.encoded_bit_len(&freq), u64::MAX);
        assert!(codes.average_length(&freq) >= 1.0);
    }
}
