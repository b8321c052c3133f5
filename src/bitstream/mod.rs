//! The bitstream module is the bit-level I/O layer for the Huffman codec.
//!
//! Both halves work MSB-first: the first bit written lands in the most significant bit of the
//! first byte. The writer pads a final partial byte with zeros and reports how many of its bits
//! are significant; the reader takes an explicit bit limit so those padding bits are never read.
//!
//! This subsystem is shaped around the codecs in this crate. It is not intended for more general
//! use.
//!
pub mod bitreader;
pub mod bitwriter;
