//! Huffman coding tree and the greedy tree builder.
//!
//! A [`CodingTree`] owns its nodes in a flat arena and links them with
//! [`NodeId`] indices, so a tree is plain owned data: no shared subtrees, no
//! parent pointers, and structural equality comes for free.
//!
//! # Tie-breaking
//!
//! The builder orders its priority queue by `(weight, node id)`. Leaves are
//! allocated first, in ascending symbol order, and every merged node takes the
//! next free id, so among equal weights leaves win over merged nodes and older
//! merged nodes win over younger ones. The node popped first becomes the left
//! child (bit `0`), the node popped second the right child (bit `1`).

use super::frequency::FrequencyTable;
use crate::compression::Result;
use crate::error::Error;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;

/// Index of a node inside the arena of its [`CodingTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the coding tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S> {
    /// A leaf carries one symbol and its frequency.
    Leaf { symbol: S, weight: u64 },
    /// An internal node always has both children; its weight is their sum.
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl<S> Node<S> {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<&S> {
        match self {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Child reached by following `bit` (`false` = left, `true` = right).
    pub fn child(&self, bit: bool) -> Option<NodeId> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }
}

/// A rooted binary coding tree for one compression session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingTree<S> {
    nodes: Vec<Node<S>>,
    root: NodeId,
}

impl<S> CodingTree<S> {
    /// Assemble a tree from an arena whose internal nodes only reference
    /// indices inside `nodes`.
    pub(crate) fn from_arena(nodes: Vec<Node<S>>, root: NodeId) -> Self {
        debug_assert!(root.index() < nodes.len());
        CodingTree { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.index()]
    }

    /// Total weight of the tree, i.e. the weight of the root.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// True for the degenerate tree of a one-symbol alphabet.
    pub fn is_single_leaf(&self) -> bool {
        self.node(self.root).is_leaf()
    }

    /// Leaf symbols in left-to-right order.
    pub fn symbols(&self) -> Vec<&S> {
        let mut symbols = Vec::with_capacity(self.leaf_count());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.node(id) {
                Node::Leaf { symbol, .. } => symbols.push(symbol),
                Node::Internal { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
        symbols
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }
}

/// Priority queue entry; the lightest, oldest node has the highest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    weight: u64,
    node: NodeId,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that BinaryHeap behaves as a min-heap.
        (other.weight, other.node).cmp(&(self.weight, self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the Huffman tree for a frequency table.
///
/// Returns [`Error::EmptyAlphabet`] when the table has no symbols. A table with
/// a single symbol yields a tree consisting of one leaf.
pub fn build_tree<S: Ord + Clone + Debug>(
    frequencies: &FrequencyTable<S>,
) -> Result<CodingTree<S>> {
    let mut nodes = Vec::with_capacity(2 * frequencies.len());
    let mut heap = BinaryHeap::with_capacity(frequencies.len());

    for (symbol, weight) in frequencies.iter() {
        let node = NodeId::new(nodes.len());
        nodes.push(Node::Leaf {
            symbol: symbol.clone(),
            weight,
        });
        heap.push(HeapEntry { weight, node });
    }

    let root = loop {
        let first = heap.pop().ok_or(Error::EmptyAlphabet)?;
        let Some(second) = heap.pop() else {
            break first.node;
        };

        // Saturating: a merged weight only has to order the merges after it.
        let weight = first.weight.saturating_add(second.weight);
        let node = NodeId::new(nodes.len());
        nodes.push(Node::Internal {
            weight,
            left: first.node,
            right: second.node,
        });
        heap.push(HeapEntry { weight, node });
    };

    let tree = CodingTree::from_arena(nodes, root);
    log::debug!(
        "built coding tree: {} symbols, {} nodes, depth {}, weight {}",
        tree.leaf_count(),
        tree.node_count(),
        tree.depth(),
        tree.weight()
    );
    log::trace!("coding tree: {:?}", tree);
    Ok(tree)
}
