use std::io::{self, BufReader, BufWriter, Read, Write};

use log::{debug, trace};

use super::search_window::SearchWindow;
use crate::error::{CodecError, Result};

pub const DEFAULT_WINDOW_SIZE: usize = 1024;
pub const DEFAULT_LOOKAHEAD_SIZE: usize = 16;

const LITERAL_FLAG: u8 = 0;
const MATCH_FLAG: u8 = 1;
/// Shortest match worth a match token. Anything shorter goes out as a literal.
const MIN_MATCH_LENGTH: usize = 2;

/// One unit of the LZ77 artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// flag 0, then the raw character
    Literal(u8),
    /// flag 1, then offset and length as big-endian u16s
    Match { offset: u16, length: u16 },
}

impl Token {
    /// Serialize the token. Returns the number of bytes written.
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<u64> {
        match *self {
            Token::Literal(byte) => {
                writer.write_all(&[LITERAL_FLAG, byte])?;
                Ok(2)
            }
            Token::Match { offset, length } => {
                let o = offset.to_be_bytes();
                let l = length.to_be_bytes();
                writer.write_all(&[MATCH_FLAG, o[0], o[1], l[0], l[1]])?;
                Ok(5)
            }
        }
    }

    /// Parse the token starting at `pos`. Returns the token and the position just past it.
    fn read_from(data: &[u8], pos: usize) -> Result<(Token, usize)> {
        let truncated = || {
            CodecError::from(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("LZ77 token at byte {} is truncated", pos),
            ))
        };
        match data.get(pos) {
            Some(&LITERAL_FLAG) => {
                let byte = *data.get(pos + 1).ok_or_else(truncated)?;
                Ok((Token::Literal(byte), pos + 2))
            }
            Some(&MATCH_FLAG) => {
                let field = data.get(pos + 1..pos + 5).ok_or_else(truncated)?;
                let token = Token::Match {
                    offset: u16::from_be_bytes([field[0], field[1]]),
                    length: u16::from_be_bytes([field[2], field[3]]),
                };
                Ok((token, pos + 5))
            }
            Some(flag) => Err(CodecError::corrupt(format!(
                "unknown LZ77 flag {} at byte {}",
                flag, pos
            ))),
            None => Err(truncated()),
        }
    }
}

/// Sliding-window codec. The window and lookahead sizes are chosen per input size by the
/// strategy selector; the decoder needs neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lz77 {
    window_size: usize,
    lookahead_size: usize,
}

impl Default for Lz77 {
    fn default() -> Self {
        Self::new()
    }
}

impl Lz77 {
    pub const fn new() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            lookahead_size: DEFAULT_LOOKAHEAD_SIZE,
        }
    }

    /// Both sizes are clamped to 1..=65535 so offsets and lengths always fit their u16 fields.
    pub fn with_config(window_size: usize, lookahead_size: usize) -> Self {
        let max = u16::MAX as usize;
        Self {
            window_size: window_size.clamp(1, max),
            lookahead_size: lookahead_size.clamp(1, max),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn lookahead_size(&self) -> usize {
        self.lookahead_size
    }

    /// Compress the source into LZ77 tokens. The source is consumed one lookahead-sized chunk at
    /// a time and only the last `window_size` characters are kept, so memory use does not grow
    /// with the input. Returns the artifact length.
    pub fn encode<R: Read, W: Write>(&self, source: R, sink: W) -> Result<u64> {
        let mut reader = BufReader::new(source);
        let mut writer = BufWriter::new(sink);

        let mut window = SearchWindow::new(self.window_size);
        let mut chunk = vec![0_u8; self.lookahead_size];
        let (mut written, mut literals, mut matches) = (0_u64, 0_usize, 0_usize);

        loop {
            let filled = fill_chunk(&mut reader, &mut chunk)?;
            if filled == 0 {
                break;
            }

            let mut i = 0;
            while i < filled {
                let found = window.find_longest_match(&chunk[i..filled]);

                let (token, consumed) = if found.length >= MIN_MATCH_LENGTH {
                    trace!("Match: Offset={}, Length={}", found.offset, found.length);
                    matches += 1;
                    // Both fit: the window and chunk sizes are clamped to u16::MAX
                    let token = Token::Match {
                        offset: found.offset as u16,
                        length: found.length as u16,
                    };
                    (token, found.length)
                } else {
                    trace!("Char: {:?}", chunk[i] as char);
                    literals += 1;
                    (Token::Literal(chunk[i]), 1)
                };

                written += token.write_to(&mut writer)?;
                window.extend(&chunk[i..i + consumed]);
                i += consumed;
            }
        }
        writer.flush()?;

        debug!(
            "LZ77 ({}/{}) wrote {} literals and {} matches in {} bytes.",
            self.window_size, self.lookahead_size, literals, matches, written
        );
        Ok(written)
    }

    /// Rebuild the original text from LZ77 tokens. The whole output is built in memory and
    /// written once. Returns the reconstructed length.
    pub fn decode<R: Read, W: Write>(&self, mut source: R, mut sink: W) -> Result<u64> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        let mut out: Vec<u8> = Vec::with_capacity(data.len() * 2);
        let mut pos = 0;

        while pos < data.len() {
            let (token, next) = Token::read_from(&data, pos)?;
            match token {
                Token::Literal(byte) => out.push(byte),
                Token::Match { offset, length } => {
                    let offset = offset as usize;
                    if offset == 0 || offset > out.len() {
                        return Err(CodecError::corrupt(format!(
                            "match at byte {} reaches {} back with only {} decoded",
                            pos,
                            offset,
                            out.len()
                        )));
                    }
                    // Copy one at a time: the source may overlap what is being appended.
                    let start = out.len() - offset;
                    for i in 0..length as usize {
                        let byte = out[start + i];
                        out.push(byte);
                    }
                }
            }
            pos = next;
        }

        sink.write_all(&out)?;
        sink.flush()?;
        Ok(out.len() as u64)
    }
}

/// Read until the chunk is full or the source is exhausted. Returns how much was read.
fn fill_chunk<R: Read>(reader: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < chunk.len() {
        match reader.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
