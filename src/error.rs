//! Error type shared by every stage of the Huffman pipeline.

use thiserror::Error;

/// Errors raised while building, applying or restoring a Huffman code.
#[derive(Debug, Error)]
pub enum Error {
    /// The frequency table or codebook contained no symbols.
    #[error("cannot build a coding tree from an empty alphabet")]
    EmptyAlphabet,

    /// The text to compress contains a symbol that has no codeword.
    #[error("symbol {symbol} at position {position} has no codeword")]
    UnknownSymbol { symbol: String, position: usize },

    /// The bitstream ran out while the decoder was still inside the tree.
    #[error("archive ends inside a codeword starting at bit {bit_offset} of {bit_len}")]
    TruncatedArchive { bit_offset: usize, bit_len: usize },

    /// A codeword is a prefix of, extends, or duplicates another codeword.
    #[error("codeword {codeword} conflicts with a previously inserted codeword")]
    ConflictingCode { codeword: String },

    /// A branch of a rebuilt code tree was left with a single child.
    #[error("no codeword starts with {prefix}")]
    IncompleteCode { prefix: String },

    /// The padding value does not fit the archive.
    #[error("padding of {padding} bits is invalid for an archive of {bit_len} bits")]
    InvalidPadding { padding: u8, bit_len: usize },

    /// The persisted codebook is structurally invalid.
    #[error("malformed codebook: {0}")]
    MalformedCodebook(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
