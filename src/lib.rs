//! txzip, a small lossless file compressor.
//!
//! Three codecs are available: run-length encoding, LZ77 and Huffman coding. By default the codec
//! is chosen from the size of the input, and the compressed file records the codec only through
//! its extension (`.rle`, `.lz77` or `.huffman`).
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> txzip notes.txt`
//!
//! This will compress the file and create notes.txt.lz77 (or .rle for files of 100 bytes or
//! less). `txzip -d notes.txt.lz77` restores it as decompressed-notes.txt.
//!
//! The same operations are available as library calls:
//!
//! ```no_run
//! use std::path::Path;
//!
//! let artifact = txzip::compress(Path::new("notes.txt"))?;
//! let restored = txzip::decompress(&artifact)?;
//! # Ok::<(), txzip::CodecError>(())
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod sliding_window;
pub mod tools;

pub use compression::algorithm::{Algorithm, Codec};
pub use compression::compress::{compress, compress_to, compress_with};
pub use compression::decompress::{decompress, decompress_to, test_file};
pub use error::{CodecError, Result};
