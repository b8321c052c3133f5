//! The huffman_coding module holds the entropy codec.
//!
//! Compression counts every character, builds a Huffman tree from the counts, derives a code per
//! character from the tree and packs the codes of the whole input into a bitstream. The tree is
//! written in front of the body so the decoder can rebuild it.
//!
//! An input made of a single repeated character needs no tree at all and gets a five byte header
//! instead.
//!
//! Equal frequencies are broken first-in, first-out, so identical input always produces a
//! byte-identical artifact.
//!

pub mod huffman;
pub mod huffman_tree;
