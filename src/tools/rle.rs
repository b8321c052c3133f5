use std::io::{self, BufReader, BufWriter, Read, Write};

use log::debug;

use crate::error::Result;

/// Longest run a single (count, character) pair can describe.
pub const MAX_RUN: u8 = 255;

/// Run-length codec used for the smallest inputs. The artifact is a bare sequence of
/// `(count: u8, character: u8)` pairs with no header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rle;

impl Rle {
    pub const fn new() -> Self {
        Self
    }

    /// Encode every maximal run of identical characters in the source. Runs longer than 255
    /// are split into consecutive pairs of the same character. Returns the artifact length.
    pub fn encode<R: Read, W: Write>(&self, source: R, sink: W) -> Result<u64> {
        let reader = BufReader::new(source);
        let mut writer = BufWriter::new(sink);
        let mut written = 0_u64;

        // The run currently being counted: (character, count)
        let mut run: Option<(u8, u8)> = None;

        for byte in reader.bytes() {
            let byte = byte?;
            run = match run {
                Some((sym, count)) if sym == byte && count < MAX_RUN => Some((sym, count + 1)),
                Some((sym, count)) => {
                    writer.write_all(&[count, sym])?;
                    written += 2;
                    Some((byte, 1))
                }
                None => Some((byte, 1)),
            };
        }
        // Write the last run
        if let Some((sym, count)) = run {
            writer.write_all(&[count, sym])?;
            written += 2;
        }
        writer.flush()?;

        debug!("RLE wrote {} bytes.", written);
        Ok(written)
    }

    /// Expand every pair back into its run. The whole output is built in memory and written
    /// once. A dangling count byte with no character is reported as an unexpected EOF.
    pub fn decode<R: Read, W: Write>(&self, mut source: R, mut sink: W) -> Result<u64> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        let pairs = data.chunks_exact(2);
        if !pairs.remainder().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "RLE stream ends inside a (count, character) pair",
            )
            .into());
        }

        let mut out = Vec::with_capacity(data.len());
        for pair in pairs {
            out.extend(std::iter::repeat(pair[1]).take(pair[0] as usize));
        }

        sink.write_all(&out)?;
        sink.flush()?;
        Ok(out.len() as u64)
    }
}

#[cfg(test)]
mod test {
    use super::Rle;
    use crate::error::CodecError;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        Rle::new().encode(data, &mut out).unwrap();
        out
    }

    fn decompress(data: &[u8]) -> crate::error::Result<Vec<u8>> {
        let mut out = Vec::new();
        Rle::new().decode(data, &mut out)?;
        Ok(out)
    }

    #[test]
    fn ten_a_test() {
        let packed = compress(b"aaaaaaaaaa");
        assert_eq!(packed, vec![10, b'a']);
        assert_eq!(decompress(&packed).unwrap(), b"aaaaaaaaaa");
    }

    #[test]
    fn mixed_runs_test() {
        assert_eq!(
            compress(b"aaabccdddd"),
            vec![3, b'a', 1, b'b', 2, b'c', 4, b'd']
        );
    }

    #[test]
    fn run_of_255_test() {
        let data = vec![b'x'; 255];
        assert_eq!(compress(&data), vec![255, b'x']);
    }

    #[test]
    fn run_of_256_test() {
        let data = vec![b'x'; 256];
        let packed = compress(&data);
        assert_eq!(packed, vec![255, b'x', 1, b'x']);
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn long_run_roundtrip_test() {
        let mut data = vec![b'q'; 1000];
        data.extend_from_slice(b"the end");
        assert_eq!(decompress(&compress(&data)).unwrap(), data);
    }

    #[test]
    fn empty_test() {
        assert!(compress(&[]).is_empty());
        assert!(decompress(&[]).unwrap().is_empty());
    }

    #[test]
    fn zero_count_test() {
        assert_eq!(decompress(&[0, b'z', 2, b'y']).unwrap(), b"yy");
    }

    #[test]
    fn dangling_count_test() {
        match decompress(&[3, b'a', 4]) {
            Err(CodecError::IoFailure(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof)
            }
            other => panic!("expected IoFailure, got {:?}", other),
        }
    }
}
