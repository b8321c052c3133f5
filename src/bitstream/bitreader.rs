//! BitReader: reads a packed, MSB-first bitstream out of an in-memory artifact.
//!
//! The reader never reads past its bit limit. That lets a caller stop in the middle of the final
//! byte of a stream (the Huffman body records how many bits of its last byte are meaningful).
//!

const BIT_MASK: u8 = 0xff;

/// Reads bits from a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
    /// Total number of readable bits, counted from the start of the buffer.
    limit: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader over every bit of the buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_limit(buffer, buffer.len() * 8)
    }

    /// Creates a new BitReader that stops after `limit` bits (or the end of the buffer, if sooner).
    pub fn with_limit(buffer: &'a [u8], limit: usize) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
            limit: limit.min(buffer.len() * 8),
        }
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> usize {
        self.cursor * 8 + self.bit_index
    }

    /// Number of whole or partial bytes touched so far.
    pub fn byte_position(&self) -> usize {
        self.position().div_ceil(8)
    }

    /// Bits left before the limit. Zero once align() has skipped past a limit that ends mid-byte.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.position())
    }

    /// Return the next bit as Option<usize> (1 or 0), or None if the limit has been reached.
    pub fn bit(&mut self) -> Option<usize> {
        if self.position() >= self.limit {
            return None;
        }
        let bit = (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<usize> of the next n bits (n <= 64), or None if fewer than n bits remain.
    /// Nothing is consumed when None is returned.
    pub fn bint(&mut self, n: usize) -> Option<usize> {
        if n > self.remaining() {
            return None;
        }
        let mut result = 0_usize;
        for _ in 0..n {
            result = result << 1 | self.bit()?;
        }
        Some(result)
    }

    /// Returns a byte as an Option<u8>. Convenience function which calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns a big-endian 16 bit word. Convenience function which calls bint(16).
    pub fn word(&mut self) -> Option<u16> {
        self.bint(16).map(|word| word as u16)
    }

    /// Skip any padding bits so the next read starts on a byte boundary.
    pub fn align(&mut self) {
        if self.bit_index > 0 {
            self.bit_index = 0;
            self.cursor += 1;
        }
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bit(), Some(1));
        for _ in 0..6 {
            assert_eq!(br.bit(), Some(0));
        }
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), None);
    }

    #[test]
    fn bint_test() {
        let x = [0b00011011];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bint(5), Some(3));
        assert_eq!(br.bint(1), Some(0));
        assert_eq!(br.bint(2), Some(3));
        assert_eq!(br.bint(1), None);
    }

    #[test]
    fn limit_test() {
        let x = [0xff, 0b1110_0000];
        let mut br = BitReader::with_limit(&x, 11);
        assert_eq!(br.byte(), Some(0xff));
        assert_eq!(br.remaining(), 3);
        // Asking for more than is left consumes nothing
        assert_eq!(br.bint(4), None);
        assert_eq!(br.bint(3), Some(0b111));
        assert_eq!(br.bool_bit(), None);
    }

    #[test]
    fn word_and_align_test() {
        let x = [0b1010_0000, 0b1010_0001, 0x00, b'Z'];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bool_bit(), Some(true));
        assert_eq!(br.word(), Some(0x4142));
        assert_eq!(br.loc(), "[2.1]");
        assert_eq!(br.byte_position(), 3);
        br.align();
        assert_eq!(br.position(), 24);
        assert_eq!(br.byte(), Some(b'Z'));
    }

    #[test]
    fn align_on_boundary_test() {
        let x = "Hello".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.byte(), Some(b'H'));
        br.align();
        assert_eq!(br.byte(), Some(b'e'));
    }

    #[test]
    fn align_past_limit_test() {
        let x = [0xff, 0xff];
        let mut br = BitReader::with_limit(&x, 3);
        assert_eq!(br.bit(), Some(1));
        br.align();
        assert_eq!(br.remaining(), 0);
        assert_eq!(br.bit(), None);
        assert_eq!(br.byte(), None);
    }
}
