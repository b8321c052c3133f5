//! The compression module picks a codec for each file and runs it between the file system and
//! the codecs.
//!
//! Compression chooses by input size:
//! - Up to 100 bytes: run-length encoding.
//! - Up to 1 KiB: LZ77 with a 512 byte window and a 16 byte lookahead.
//! - Up to 10 KiB: LZ77, 1024 byte window, 64 byte lookahead.
//! - Up to 1 MiB: LZ77, 8192 byte window, 128 byte lookahead.
//! - Anything larger: LZ77, 32768 byte window, 256 byte lookahead.
//!
//! Huffman coding is never chosen automatically but can be asked for by name.
//!
//! The artifact takes the source name plus `.rle`, `.lz77` or `.huffman`. Decompression goes by
//! that extension alone; the artifact carries no other marker of its codec.
//!
//! Output files are written to a temporary file first and moved into place when complete, so a
//! failed run never leaves a partial file behind.
//!

pub mod algorithm;
pub mod compress;
pub mod decompress;
mod output;
