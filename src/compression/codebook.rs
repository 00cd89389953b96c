//! Persisted codebooks and tree reconstruction from codewords alone.
//!
//! A codebook is stored as one JSON object mapping every codeword, written as
//! a binary string, to its symbol, plus the reserved `"padding"` entry of the
//! archive it belongs to:
//!
//! ```json
//! { "0": "a", "10": "c", "11": "b", "padding": 2 }
//! ```
//!
//! Codeword keys only ever contain `0` and `1`, so no symbol can collide with
//! the padding entry.

use super::codes::{CodeTable, Codeword};
use super::packing::Archive;
use super::tree::{CodingTree, Node, NodeId};
use crate::compression::Result;
use crate::error::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::io::{Read, Write};

/// Reserved key holding the padding length of the associated archive.
pub const PADDING_KEY: &str = "padding";

/// Codeword table together with the padding of one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook<S> {
    codes: CodeTable<S>,
    padding: u8,
}

impl<S: Ord> Codebook<S> {
    pub fn new(codes: CodeTable<S>, padding: u8) -> Result<Self> {
        if padding > 7 {
            return Err(Error::MalformedCodebook(format!(
                "padding {padding} is outside 0..=7"
            )));
        }
        Ok(Codebook { codes, padding })
    }

    /// Codebook describing how `archive` was produced from `codes`.
    pub fn for_archive(codes: CodeTable<S>, archive: &Archive) -> Result<Self> {
        Self::new(codes, archive.padding)
    }

    pub fn codes(&self) -> &CodeTable<S> {
        &self.codes
    }

    pub fn padding(&self) -> u8 {
        self.padding
    }

    pub fn into_parts(self) -> (CodeTable<S>, u8) {
        (self.codes, self.padding)
    }
}

impl<S: Ord + Clone + Debug> Codebook<S> {
    /// Rebuild a decoding tree from the stored codewords.
    pub fn rebuild_tree(&self) -> Result<CodingTree<S>> {
        rebuild_tree(&self.codes)
    }
}

impl<S: Ord + Serialize> Codebook<S> {
    /// Convert into the JSON object form.
    ///
    /// Two symbols sharing a codeword would collapse into one key, so that
    /// is reported as [`Error::ConflictingCode`].
    pub fn to_value(&self) -> Result<Value> {
        let mut object = Map::new();
        for (symbol, code) in &self.codes {
            let key = code.to_string();
            if object.insert(key.clone(), serde_json::to_value(symbol)?).is_some() {
                return Err(Error::ConflictingCode { codeword: key });
            }
        }
        object.insert(PADDING_KEY.to_string(), Value::from(self.padding));
        Ok(Value::Object(object))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.to_value()?)?;
        Ok(())
    }
}

impl<S: Ord + DeserializeOwned> Codebook<S> {
    /// Parse the JSON object form.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(Error::MalformedCodebook(
                "expected a JSON object".to_string(),
            ));
        };

        let padding = object
            .remove(PADDING_KEY)
            .ok_or_else(|| Error::MalformedCodebook(format!("missing {PADDING_KEY:?} entry")))?;
        let padding = padding
            .as_u64()
            .and_then(|padding| u8::try_from(padding).ok())
            .ok_or_else(|| {
                Error::MalformedCodebook(format!("padding {padding} is not a small integer"))
            })?;

        let mut codes = CodeTable::new();
        for (key, value) in object {
            let code: Codeword = key.parse()?;
            let symbol: S = serde_json::from_value(value)?;
            if let Some(previous) = codes.insert(symbol, code) {
                return Err(Error::MalformedCodebook(format!(
                    "codewords {previous} and {key} name the same symbol"
                )));
            }
        }

        Codebook::new(codes, padding)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }
}

/// Trie slot used while codewords are still being inserted.
enum Slot<S> {
    Branch {
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    Leaf(S),
}

impl<S> Slot<S> {
    fn branch() -> Self {
        Slot::Branch {
            left: None,
            right: None,
        }
    }
}

/// Rebuild a coding tree from codewords alone.
///
/// Each codeword is walked from the root, creating branches as needed, and
/// its symbol becomes the leaf at the end of the path. Node weights are not
/// recoverable and are left at zero. Fails with
/// - [`Error::EmptyAlphabet`] for an empty table,
/// - [`Error::ConflictingCode`] when a codeword runs through or ends on a node
///   created by another codeword,
/// - [`Error::IncompleteCode`] when some branch ends up with a single child.
///
/// A table holding one symbol with codeword `0` yields the single-leaf tree.
pub fn rebuild_tree<S: Ord + Clone + Debug>(codes: &CodeTable<S>) -> Result<CodingTree<S>> {
    let mut entries = codes.iter();
    match (entries.next(), entries.next()) {
        (None, _) => return Err(Error::EmptyAlphabet),
        (Some((symbol, code)), None) if code.to_string() == "0" => {
            let leaf = Node::Leaf {
                symbol: symbol.clone(),
                weight: 0,
            };
            return Ok(CodingTree::from_arena(vec![leaf], NodeId::new(0)));
        }
        _ => {}
    }

    let mut slots = vec![Slot::branch()];
    let mut paths = vec![Codeword::new()];

    for (symbol, code) in codes {
        let conflict = || Error::ConflictingCode {
            codeword: code.to_string(),
        };
        if code.is_empty() {
            return Err(conflict());
        }

        let mut current = 0;
        for (depth, bit) in code.bits().iter().by_vals().enumerate() {
            let last = depth + 1 == code.len();
            let fresh = NodeId::new(slots.len());
            let Slot::Branch { left, right } = &mut slots[current] else {
                // An earlier codeword is a prefix of this one.
                return Err(conflict());
            };
            let child = if bit { right } else { left };

            match *child {
                Some(_) if last => return Err(conflict()),
                Some(next) => current = next.index(),
                None => {
                    *child = Some(fresh);
                    slots.push(if last {
                        Slot::Leaf(symbol.clone())
                    } else {
                        Slot::branch()
                    });
                    paths.push(paths[current].extended(bit));
                    current = fresh.index();
                }
            }
        }
    }

    let nodes = slots
        .into_iter()
        .zip(&paths)
        .map(|(slot, path)| match slot {
            Slot::Leaf(symbol) => Ok(Node::Leaf { symbol, weight: 0 }),
            Slot::Branch {
                left: Some(left),
                right: Some(right),
            } => Ok(Node::Internal {
                weight: 0,
                left,
                right,
            }),
            Slot::Branch { left, .. } => Err(Error::IncompleteCode {
                prefix: path.extended(left.is_some()).to_string(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    let tree = CodingTree::from_arena(nodes, NodeId::new(0));
    log::debug!(
        "rebuilt coding tree from {} codewords: {} nodes, depth {}",
        codes.len(),
        tree.node_count(),
        tree.depth()
    );
    Ok(tree)
}
