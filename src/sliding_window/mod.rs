//! The sliding_window module holds the LZ77 codec, used for every input above the RLE tier.
//!
//! Compression walks the input one lookahead-sized chunk at a time. For each position the search
//! window (a ring buffer of the last W characters) is scanned oldest-first for the longest prefix
//! of the rest of the chunk. Matches of two or more characters become (offset, length) tokens;
//! everything else goes out as a literal.
//!
//! Decompression replays the tokens into one growing buffer. Match copies run one character at a
//! time, so a match may overlap the characters it is producing.
//!

pub mod lz77;
pub mod search_window;
