//! Static Huffman compression.
//!
//! The pipeline runs in two directions:
//! - forward: [`FrequencyTable`] → [`build_tree`] → [`generate_codes`] → [`compress`]
//! - reverse: [`Codebook`] → [`rebuild_tree`] → [`decompress`]
//!
//! The forward and reverse halves only share the persisted [`Codebook`], so a
//! tree rebuilt from it in another process decodes the same archives as the
//! tree that produced them.
//!
//! # Examples
//!
//! ```rust
//! use huffpack::compression::{
//!     build_tree, compress, decompress, generate_codes, rebuild_tree, Codebook, FrequencyTable,
//! };
//!
//! let text: Vec<char> = "abracadabra".chars().collect();
//! let frequencies = FrequencyTable::count(text.iter().copied());
//! let tree = build_tree(&frequencies)?;
//! let codes = generate_codes(&tree);
//! let archive = compress(text.iter().copied(), &codes)?;
//!
//! let json = Codebook::new(codes, archive.padding)?.to_json()?;
//! let restored: Codebook<char> = Codebook::from_json(&json)?;
//! let rebuilt = rebuild_tree(restored.codes())?;
//! let decoded = decompress(&archive.bytes, restored.padding(), &rebuilt)?;
//! assert_eq!(decoded, text);
//! # Ok::<(), huffpack::Error>(())
//! ```

use crate::error::Error;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

pub mod codebook;
pub mod codes;
pub mod frequency;
pub mod packing;
pub mod tree;

pub use codebook::{rebuild_tree, Codebook, PADDING_KEY};
pub use codes::{generate_codes, CodeTable, Codeword};
pub use frequency::FrequencyTable;
pub use packing::{compress, decompress, Archive};
pub use tree::{build_tree, CodingTree, Node, NodeId};
