//! Bit packing of encoded text and the tree walk that reverses it.
//!
//! Codewords are concatenated most-significant-bit first and the stream is
//! padded with zero bits up to the next byte boundary. The number of filler
//! bits travels next to the bytes (see [`Archive::padding`]); it is not stored
//! inside the byte stream itself.

use super::codes::CodeTable;
use super::tree::{CodingTree, Node};
use crate::compression::Result;
use crate::error::Error;
use bitvec::prelude::*;
use std::fmt::Debug;

/// Packed codeword stream plus the count of filler bits in its last byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    pub bytes: Vec<u8>,
    /// Low-order bits of the final byte to discard on decode, `0..=7`.
    pub padding: u8,
}

impl Archive {
    /// Number of meaningful bits, padding excluded.
    pub fn bit_len(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(usize::from(self.padding))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode this archive with `tree`.
    pub fn decode<S: Clone>(&self, tree: &CodingTree<S>) -> Result<Vec<S>> {
        decompress(&self.bytes, self.padding, tree)
    }
}

/// Encode `text` with `codes` and pack the bits into bytes.
///
/// Fails with [`Error::UnknownSymbol`] on the first symbol without a codeword.
pub fn compress<S, I>(text: I, codes: &CodeTable<S>) -> Result<Archive>
where
    S: Ord + Debug,
    I: IntoIterator<Item = S>,
{
    let mut bits: BitVec<u8, Msb0> = BitVec::new();
    let mut symbols = 0;

    for (position, symbol) in text.into_iter().enumerate() {
        let code = codes.get(&symbol).ok_or_else(|| Error::UnknownSymbol {
            symbol: format!("{symbol:?}"),
            position,
        })?;
        bits.extend_from_bitslice(code.bits());
        symbols += 1;
    }

    let bit_len = bits.len();
    let padding = (8 - bit_len % 8) % 8;
    bits.resize(bit_len + padding, false);

    let archive = Archive {
        bytes: bits.into_vec(),
        padding: padding as u8,
    };
    log::debug!(
        "compressed {} symbols into {} bits ({} bytes, padding {})",
        symbols,
        bit_len,
        archive.bytes.len(),
        archive.padding
    );
    Ok(archive)
}

/// Decode `bytes` by walking `tree`, ignoring the last `padding` bits.
///
/// Returns [`Error::InvalidPadding`] when `padding` exceeds 7 or the archive
/// size, and [`Error::TruncatedArchive`] when the bits run out between the
/// root and a leaf.
pub fn decompress<S: Clone>(bytes: &[u8], padding: u8, tree: &CodingTree<S>) -> Result<Vec<S>> {
    let total = bytes.len() * 8;
    if padding > 7 || usize::from(padding) > total {
        return Err(Error::InvalidPadding {
            padding,
            bit_len: total,
        });
    }
    let bits = &bytes.view_bits::<Msb0>()[..total - usize::from(padding)];
    let bit_len = bits.len();

    let root = tree.root();
    if let Node::Leaf { symbol, .. } = tree.node(root) {
        // One-symbol alphabet: each bit is a whole codeword.
        return Ok(vec![symbol.clone(); bit_len]);
    }

    let mut output = Vec::new();
    let mut current = root;
    let mut codeword_start = 0;

    for (offset, bit) in bits.iter().by_vals().enumerate() {
        let Some(next) = tree.node(current).child(bit) else {
            unreachable!("the walk restarts at the root after every leaf");
        };
        match tree.node(next) {
            Node::Leaf { symbol, .. } => {
                output.push(symbol.clone());
                current = root;
                codeword_start = offset + 1;
            }
            Node::Internal { .. } => current = next,
        }
    }

    if current != root {
        return Err(Error::TruncatedArchive {
            bit_offset: codeword_start,
            bit_len,
        });
    }

    log::debug!("decompressed {} bits into {} symbols", bit_len, output.len());
    Ok(output)
}
