use std::fmt::{Display, Formatter};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{CodecError, Result};
use crate::huffman_coding::huffman::Huffman;
use crate::sliding_window::lz77::Lz77;
use crate::tools::rle::Rle;

/// Inputs up to this many bytes are run-length encoded.
pub const RLE_MAX_SIZE: u64 = 100;

/// LZ77 (window, lookahead) per input size: the first tier whose limit covers the input wins.
pub const LZ77_TIERS: [(u64, usize, usize); 3] = [
    (1024, 512, 16),
    (10 * 1024, 1024, 64),
    (1024 * 1024, 8192, 128),
];
/// LZ77 (window, lookahead) for anything over the last tier.
pub const LZ77_LARGEST: (usize, usize) = (32768, 256);

/// Codec families a user can ask for by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Codec {
    /// Run-length encoding
    Rle,
    /// Sliding window matching, window sized to the input
    Lz77,
    /// Huffman entropy coding
    Huffman,
}

/// A fully configured codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Rle(Rle),
    Lz77(Lz77),
    Huffman(Huffman),
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Rle(_) => write!(f, "RLE"),
            Algorithm::Lz77(lz) => write!(
                f,
                "LZ77 (window {}, lookahead {})",
                lz.window_size(),
                lz.lookahead_size()
            ),
            Algorithm::Huffman(_) => write!(f, "Huffman"),
        }
    }
}

impl Algorithm {
    /// The automatic choice for an input of `len` bytes: RLE for tiny inputs, otherwise LZ77
    /// with a window that grows with the input.
    pub fn for_size(len: u64) -> Self {
        if len <= RLE_MAX_SIZE {
            return Algorithm::Rle(Rle::new());
        }
        Algorithm::Lz77(Self::lz77_for_size(len))
    }

    /// LZ77 configured for an input of `len` bytes.
    pub fn lz77_for_size(len: u64) -> Lz77 {
        let (window, lookahead) = LZ77_TIERS
            .iter()
            .find(|&&(limit, _, _)| len <= limit)
            .map(|&(_, window, lookahead)| (window, lookahead))
            .unwrap_or(LZ77_LARGEST);
        Lz77::with_config(window, lookahead)
    }

    /// Honour a requested codec family if there is one, otherwise choose by size.
    pub fn select(len: u64, requested: Option<Codec>) -> Self {
        match requested {
            None => Self::for_size(len),
            Some(Codec::Rle) => Algorithm::Rle(Rle::new()),
            Some(Codec::Lz77) => Algorithm::Lz77(Self::lz77_for_size(len)),
            Some(Codec::Huffman) => Algorithm::Huffman(Huffman::new()),
        }
    }

    /// Work out the codec of an artifact from its trailing extension. Only the path is
    /// inspected; nothing is opened.
    pub fn from_extension(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("rle") => Ok(Algorithm::Rle(Rle::new())),
            Some("lz77") => Ok(Algorithm::Lz77(Lz77::new())),
            Some("huffman") => Ok(Algorithm::Huffman(Huffman::new())),
            _ => Err(CodecError::InvalidFormat(format!(
                "{} is not a .rle, .lz77 or .huffman file",
                path.display()
            ))),
        }
    }

    /// Extension appended to the artifact, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Algorithm::Rle(_) => "rle",
            Algorithm::Lz77(_) => "lz77",
            Algorithm::Huffman(_) => "huffman",
        }
    }

    pub fn codec(&self) -> Codec {
        match self {
            Algorithm::Rle(_) => Codec::Rle,
            Algorithm::Lz77(_) => Codec::Lz77,
            Algorithm::Huffman(_) => Codec::Huffman,
        }
    }

    /// Compress `source` into `sink`. Returns the artifact length.
    pub fn encode<R: Read, W: Write>(&self, source: R, sink: W) -> Result<u64> {
        match self {
            Algorithm::Rle(rle) => rle.encode(source, sink),
            Algorithm::Lz77(lz) => lz.encode(source, sink),
            Algorithm::Huffman(huffman) => huffman.encode(source, sink),
        }
    }

    /// Decompress `source` into `sink`. Returns the reconstructed length.
    pub fn decode<R: Read, W: Write>(&self, source: R, sink: W) -> Result<u64> {
        match self {
            Algorithm::Rle(rle) => rle.decode(source, sink),
            Algorithm::Lz77(lz) => lz.decode(source, sink),
            Algorithm::Huffman(huffman) => huffman.decode(source, sink),
        }
    }

    pub fn compress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(data, &mut out)?;
        Ok(out)
    }

    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode(data, &mut out)?;
        Ok(out)
    }
}
