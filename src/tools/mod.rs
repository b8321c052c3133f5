//! The tools module provides the helpers shared by the codecs and the command line.
//!
//! The tools are:
//! - cli: Command line interface.
//! - freq_count: Character frequency counts for Huffman coding.
//! - report: Size and ratio summary shown after each file.
//! - rle: Run-length codec, used for the smallest inputs.
//!
pub mod cli;
pub mod freq_count;
pub mod report;
pub mod rle;
