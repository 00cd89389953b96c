pub mod compression;
pub mod error;

pub use compression::{
    build_tree, compress, decompress, generate_codes, rebuild_tree, Archive, CodeTable, Codebook,
    CodingTree, Codeword, FrequencyTable,
};
pub use error::{Error, Result};
