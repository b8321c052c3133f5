use std::io::{self, Read, Write};

use log::debug;

use super::huffman_tree::{HuffmanTree, NodeData, MAX_NODES};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{CodecError, Result};
use crate::tools::freq_count::{freqs, sorted_symbols};

/// Header byte for an input made of one repeated character.
const SINGLE_SYMBOL: u8 = 1;
/// Header byte for an input carrying a serialized tree.
const TREE: u8 = 0;

/// Entropy codec. The whole source is read before encoding, since the code table depends on
/// the frequency of every character.
///
/// Artifact layout:
/// - `1`, character (u16), count (u16): the character repeated count times. Nothing follows.
/// - `0`, preorder tree padded to a byte, packed code bits padded to a byte, then one byte
///   holding how many bits of the last body byte are significant (1-8).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Huffman;

impl Huffman {
    pub const fn new() -> Self {
        Self
    }

    /// Compress the source. Returns the artifact length.
    pub fn encode<R: Read, W: Write>(&self, mut source: R, mut sink: W) -> Result<u64> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        let artifact = self.pack(&data);
        sink.write_all(&artifact)?;
        sink.flush()?;
        Ok(artifact.len() as u64)
    }

    /// Decompress the source. Returns the reconstructed length.
    pub fn decode<R: Read, W: Write>(&self, mut source: R, mut sink: W) -> Result<u64> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        let out = self.unpack(&data)?;
        sink.write_all(&out)?;
        sink.flush()?;
        Ok(out.len() as u64)
    }

    /// Build the complete artifact for `data` in memory.
    pub fn pack(&self, data: &[u8]) -> Vec<u8> {
        if data.is_empty() {
            return Vec::new();
        }

        let freq_table = freqs(data);
        let mut symbols = sorted_symbols(&freq_table);

        if symbols.len() == 1 {
            let (sym, count) = symbols[0];
            if let Ok(count) = u16::try_from(count) {
                debug!("Huffman single symbol {:?} x {}.", sym as char, count);
                let mut out = vec![SINGLE_SYMBOL];
                out.extend_from_slice(&(sym as u16).to_be_bytes());
                out.extend_from_slice(&count.to_be_bytes());
                return out;
            }
            // Too many repeats for the 16 bit count. Pair the character with a companion leaf
            // that never occurs and take the general path.
            symbols.push((sym.wrapping_add(1), 0));
            symbols.sort_unstable_by_key(|&(sym, _)| sym);
        }

        let leaves: Vec<(u16, u64)> = symbols
            .iter()
            .map(|&(sym, count)| (sym as u16, count))
            .collect();
        let tree = match HuffmanTree::build(&leaves) {
            Some(tree) => tree,
            None => return Vec::new(),
        };

        // Index the codes by character for the body pass
        let codes = tree.codes();
        let unused: &[bool] = &[];
        let mut lookup = vec![unused; 256];
        for (&sym, code) in codes.iter() {
            lookup[sym as usize] = code.as_slice();
        }

        let mut out = vec![TREE];

        let mut bw = BitWriter::new(tree.len() * 3);
        tree.write(&mut bw);
        bw.flush();
        out.extend_from_slice(&bw.output);
        let tree_len = bw.output.len();

        let mut body = BitWriter::new(data.len());
        data.iter().for_each(|&b| body.out_bits(lookup[b as usize]));
        let last_bits = body.flush();
        out.extend_from_slice(&body.output);
        out.push(last_bits);

        debug!(
            "Huffman: {} symbols, {} tree nodes in {} bytes, {} body bytes ({} bits in the last).",
            tree.leaf_count(),
            tree.len(),
            tree_len,
            body.output.len(),
            last_bits
        );
        out
    }

    /// Rebuild the original data from a complete artifact.
    pub fn unpack(&self, data: &[u8]) -> Result<Vec<u8>> {
        match data.first() {
            None => Ok(Vec::new()),
            Some(&SINGLE_SYMBOL) => {
                let header = data.get(1..5).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "Huffman single-symbol header is truncated",
                    )
                })?;
                let sym = to_char(u16::from_be_bytes([header[0], header[1]]))?;
                let count = u16::from_be_bytes([header[2], header[3]]);
                Ok(vec![sym; count as usize])
            }
            Some(&TREE) => {
                let mut br = BitReader::new(&data[1..]);
                let tree = HuffmanTree::read(&mut br, MAX_NODES)?;
                br.align();
                let body_start = 1 + br.byte_position();
                debug!(
                    "Huffman tree of {} nodes read, body starts at byte {}.",
                    tree.len(),
                    body_start
                );
                decode_body(&tree, &data[body_start..])
            }
            Some(flag) => Err(CodecError::corrupt(format!(
                "unknown Huffman header flag {}",
                flag
            ))),
        }
    }
}

/// Walk the tree once per body bit and emit a character each time a leaf is reached. `data` is
/// the packed body followed by its trailing bit-count byte.
fn decode_body(tree: &HuffmanTree, data: &[u8]) -> Result<Vec<u8>> {
    let (&last_bits, body) = data
        .split_last()
        .ok_or_else(|| CodecError::corrupt("Huffman artifact has no trailing bit count"))?;
    if body.is_empty() || !(1..=8).contains(&last_bits) {
        return Err(CodecError::corrupt(format!(
            "Huffman body of {} bytes cannot end with {} significant bits",
            body.len(),
            last_bits
        )));
    }

    let bit_count = (body.len() - 1) * 8 + last_bits as usize;
    let mut br = BitReader::with_limit(body, bit_count);
    let mut out = Vec::with_capacity(body.len() * 2);

    let root = tree.root();
    let mut node = root;
    while let Some(bit) = br.bool_bit() {
        node = tree.child(node, bit).ok_or_else(|| {
            CodecError::corrupt(format!("Huffman code leads nowhere at {}", br.loc()))
        })?;
        if let NodeData::Leaf(sym) = tree.node(node).node_data {
            out.push(to_char(sym)?);
            node = root;
        }
    }
    if node != root {
        return Err(CodecError::corrupt("Huffman body ends inside a code"));
    }
    Ok(out)
}

/// Characters are single 8-bit code units, stored 16 bits wide.
fn to_char(sym: u16) -> Result<u8> {
    u8::try_from(sym)
        .map_err(|_| CodecError::corrupt(format!("character {:#06x} is out of range", sym)))
}

#[cfg(test)]
mod test {
    use super::Huffman;
    use crate::error::CodecError;

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let huffman = Huffman::new();
        let mut packed = Vec::new();
        huffman.encode(data, &mut packed).unwrap();
        let mut out = Vec::new();
        huffman.decode(packed.as_slice(), &mut out).unwrap();
        out
    }

    #[test]
    fn aabb_layout_test() {
        // flag, tree "0 1'a' 1'b'" in 35 bits + padding, body 0011 + padding, 4 significant bits
        let packed = Huffman::new().pack(b"aabb");
        assert_eq!(packed, vec![0, 0x40, 0x18, 0x60, 0x0c, 0x40, 0x30, 4]);
        assert_eq!(Huffman::new().unpack(&packed).unwrap(), b"aabb");
    }

    #[test]
    fn single_symbol_test() {
        let packed = Huffman::new().pack(b"aaaa");
        assert_eq!(packed, vec![1, 0, b'a', 0, 4]);
        assert_eq!(Huffman::new().unpack(&packed).unwrap(), b"aaaa");
    }

    #[test]
    fn single_symbol_overflow_test() {
        let data = vec![b'z'; 70_000];
        let packed = Huffman::new().pack(&data);
        assert_eq!(packed[0], 0);
        assert!(packed.len() < data.len() / 7);
        assert_eq!(Huffman::new().unpack(&packed).unwrap(), data);
    }

    #[test]
    fn roundtrip_text_test() {
        let text = b"the quick brown fox jumps over the lazy dog, again and again and again";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn roundtrip_all_bytes_test() {
        let data: Vec<u8> = (0..=255).chain((0..=255).rev()).chain(0..10).collect();
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn full_last_byte_test() {
        // Two symbols with one-bit codes: 8 characters fill the body byte exactly
        let packed = Huffman::new().pack(b"abababab");
        assert_eq!(*packed.last().unwrap(), 8);
        assert_eq!(Huffman::new().unpack(&packed).unwrap(), b"abababab");
    }

    #[test]
    fn deterministic_test() {
        let text = b"mississippi river banks, mississippi mud".repeat(7);
        let first = Huffman::new().pack(&text);
        for _ in 0..5 {
            assert_eq!(Huffman::new().pack(&text), first);
        }
    }

    #[test]
    fn compresses_skewed_text_test() {
        let mut text = vec![b'e'; 900];
        text.extend_from_slice(b"abcdefghij".repeat(10).as_slice());
        assert!(Huffman::new().pack(&text).len() < text.len() / 4);
    }

    #[test]
    fn empty_test() {
        assert!(Huffman::new().pack(&[]).is_empty());
        assert!(Huffman::new().unpack(&[]).unwrap().is_empty());
    }

    #[test]
    fn leaf_root_is_corrupt_test() {
        // A tree that is a single leaf has no branch to follow for the first body bit
        let packed = [0, 0b1000_0000, 0b0011_0000, 0b1000_0000, 0x00, 1];
        assert!(matches!(
            Huffman::new().unpack(&packed),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn ends_inside_code_test() {
        // a=10, b=11, c=0 (see the tie-break tree); a lone "1" stops halfway through a code
        let mut packed = Huffman::new().pack(b"abcc");
        let n = packed.len();
        packed[n - 2] = 0b1000_0000;
        packed[n - 1] = 1;
        assert!(matches!(
            Huffman::new().unpack(&packed),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn bad_trailing_byte_test() {
        let mut packed = Huffman::new().pack(b"aabb");
        *packed.last_mut().unwrap() = 0;
        assert!(matches!(
            Huffman::new().unpack(&packed),
            Err(CodecError::CorruptStream(_))
        ));
        packed.truncate(packed.len() - 2);
        assert!(matches!(
            Huffman::new().unpack(&packed),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn wide_character_is_corrupt_test() {
        assert!(matches!(
            Huffman::new().unpack(&[1, 0x01, 0x00, 0, 3]),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn truncated_single_symbol_test() {
        assert!(matches!(
            Huffman::new().unpack(&[1, 0, b'a']),
            Err(CodecError::IoFailure(_))
        ));
    }
}
