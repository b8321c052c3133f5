//! The Huffman tree, kept in a flat arena.
//!
//! Nodes live in one Vec and refer to their children by index. Each child is owned by exactly one
//! parent and nothing points back up. Building, code generation, serialization and
//! deserialization are all loops over an explicit stack rather than recursion, so a lopsided tree
//! cannot exhaust the call stack.
//!

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;
use rustc_hash::FxHashMap;

use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{CodecError, Result};

/// Largest tree any 8-bit alphabet can produce: 256 leaves and 255 internal nodes.
pub const MAX_NODES: usize = 2 * 256 - 1;

/// Maps each character to its code, first bit first. `false` is a step left.
pub type CodeTable = FxHashMap<u16, Vec<bool>>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NodeData {
    /// Left and right child indices. A rebuilt tree only ever has both present, but decoding
    /// still treats a missing child as corruption rather than trusting that.
    Kids(Option<usize>, Option<usize>),
    Leaf(u16),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    /// Combined frequency. Zero in a tree rebuilt from an artifact.
    pub weight: u64,
    pub node_data: NodeData,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build a tree from (character, frequency) pairs. Leaves enter the queue in slice order.
    ///
    /// The two lightest nodes are merged until one remains; the first one out becomes the left
    /// child. Equal weights leave the queue in the order they entered it (each entry carries a
    /// sequence number as a secondary key), so the same input always gives the same tree.
    /// Returns None for an empty slice.
    pub fn build(symbols: &[(u16, u64)]) -> Option<Self> {
        let mut nodes = Vec::with_capacity(symbols.len() * 2);
        let mut queue = BinaryHeap::with_capacity(symbols.len());
        let mut seq = 0_u64;

        for &(sym, weight) in symbols {
            nodes.push(Node {
                weight,
                node_data: NodeData::Leaf(sym),
            });
            queue.push(Reverse((weight, seq, nodes.len() - 1)));
            seq += 1;
        }

        while queue.len() > 1 {
            let Reverse((left_weight, _, left)) = queue.pop()?;
            let Reverse((right_weight, _, right)) = queue.pop()?;
            let weight = left_weight + right_weight;
            nodes.push(Node {
                weight,
                node_data: NodeData::Kids(Some(left), Some(right)),
            });
            queue.push(Reverse((weight, seq, nodes.len() - 1)));
            seq += 1;
        }

        let Reverse((_, _, root)) = queue.pop()?;
        Some(Self { nodes, root })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Total number of nodes, leaves and internal.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.node_data, NodeData::Leaf(_)))
            .count()
    }

    /// Follow one branch from `idx`: false goes left, true goes right. None if there is no such
    /// child (including when `idx` is a leaf).
    pub fn child(&self, idx: usize, bit: bool) -> Option<usize> {
        match self.nodes[idx].node_data {
            NodeData::Kids(left, right) => {
                if bit {
                    right
                } else {
                    left
                }
            }
            NodeData::Leaf(_) => None,
        }
    }

    /// Walk every root-to-leaf path and record the path taken to each leaf as its code.
    /// A tree that is just a leaf gives that leaf an empty code.
    pub fn codes(&self) -> CodeTable {
        let mut codes = CodeTable::default();
        let mut stack = vec![(self.root, Vec::new())];

        while let Some((idx, prefix)) = stack.pop() {
            match self.nodes[idx].node_data {
                NodeData::Leaf(sym) => {
                    codes.insert(sym, prefix);
                }
                NodeData::Kids(left, right) => {
                    if let Some(right) = right {
                        let mut code = prefix.clone();
                        code.push(true);
                        stack.push((right, code));
                    }
                    if let Some(left) = left {
                        let mut code = prefix;
                        code.push(false);
                        stack.push((left, code));
                    }
                }
            }
        }
        codes
    }

    /// Serialize the tree in preorder: a leaf is bit 1 and its 16 bit character, an internal node
    /// is bit 0 with its left subtree then its right subtree following.
    pub fn write(&self, bw: &mut BitWriter) {
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            match self.nodes[idx].node_data {
                NodeData::Leaf(sym) => {
                    bw.out_bit(true);
                    bw.out16(sym);
                    trace!("Leaf {:?} at {}", sym, bw.loc());
                }
                NodeData::Kids(left, right) => {
                    bw.out_bit(false);
                    stack.extend(right);
                    stack.extend(left);
                }
            }
        }
    }

    /// Rebuild a tree serialized by write(). Reading stops as soon as every internal node has
    /// both children, so whatever padding follows the tree is never looked at. The reader's
    /// position afterwards is exactly the number of tree bits consumed.
    ///
    /// A tree larger than `max_nodes` or one that runs out of bits is a corrupt stream.
    pub fn read(br: &mut BitReader<'_>, max_nodes: usize) -> Result<Self> {
        let mut nodes: Vec<Node> = Vec::new();
        // Child slots still waiting for a node, as (parent, is_right). Left slots sit on top.
        let mut pending: Vec<(usize, bool)> = Vec::new();

        loop {
            if nodes.len() == max_nodes {
                return Err(CodecError::corrupt(format!(
                    "Huffman tree has more than {} nodes",
                    max_nodes
                )));
            }
            let at = br.position();
            let truncated =
                move || CodecError::corrupt(format!("Huffman tree truncated at bit {}", at));

            let is_leaf = br.bool_bit().ok_or_else(truncated)?;
            let node_data = if is_leaf {
                NodeData::Leaf(br.word().ok_or_else(truncated)?)
            } else {
                NodeData::Kids(None, None)
            };
            let idx = nodes.len();
            nodes.push(Node {
                weight: 0,
                node_data,
            });

            // Hang the new node on its parent
            if let Some((parent, is_right)) = pending.pop() {
                if let NodeData::Kids(left, right) = &mut nodes[parent].node_data {
                    if is_right {
                        *right = Some(idx);
                    } else {
                        *left = Some(idx);
                    }
                }
            }

            if !is_leaf {
                pending.push((idx, true));
                pending.push((idx, false));
            }
            if pending.is_empty() {
                break;
            }
        }

        Ok(Self { nodes, root: 0 })
    }
}
