use log::error;

/// Packs single bits into bytes, most significant bit first.
///
/// Bits wait in a small queue until a full byte is available. Call flush() before taking the
/// output, otherwise up to seven bits may be left behind in the queue.
#[derive(Debug, Default)]
pub struct BitWriter {
    pub output: Vec<u8>,
    queue: u64,
    q_bits: u8,
}

impl BitWriter {
    /// Create a new BitWriter with an output buffer of the capacity specified (in bytes).
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal write function common to all out.XX functions. Moves every full byte in the
    /// queue to the output buffer.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
        // Only the bits still pending are meaningful
        self.queue &= (1_u64 << self.q_bits) - 1;
    }

    /// Put a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.queue <<= 1;
        self.queue |= bit as u64;
        self.q_bits += 1;
        self.write_stream();
    }

    /// Put a sequence of bits on the stream, first element first.
    pub fn out_bits(&mut self, bits: &[bool]) {
        bits.iter().for_each(|&bit| self.out_bit(bit));
    }

    /// Puts an 8 bit word on the stream. It need not be byte aligned.
    pub fn out8(&mut self, data: u8) {
        self.queue <<= 8; //shift queue by bit length
        self.queue |= data as u64; //add data portion to queue
        self.q_bits += 8; //update depth of queue bits
        self.write_stream();
    }

    /// Puts a 16 bit word on the stream, high byte first. It need not be byte aligned.
    pub fn out16(&mut self, data: u16) {
        self.queue <<= 16;
        self.queue |= data as u64;
        self.q_bits += 16;
        self.write_stream();
    }

    /// Number of bits written so far, including any still in the queue.
    pub fn bit_len(&self) -> usize {
        self.output.len() * 8 + self.q_bits as usize
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits. Returns how many bits of the final byte are significant (1-8),
    /// or 0 if nothing was ever written.
    pub fn flush(&mut self) -> u8 {
        let pending = self.q_bits;
        if pending > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits = 8;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitWriter queue.");
            }
        }
        match (pending, self.output.is_empty()) {
            (0, true) => 0,
            (0, false) => 8,
            (bits, _) => bits,
        }
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bit_len() / 8, self.bit_len() % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;

    #[test]
    fn out_bit_test() {
        let mut bw = BitWriter::new(4);
        bw.out_bits(&[true, false, true, false, true, false, true, false]);
        assert_eq!(bw.flush(), 8);
        assert_eq!(bw.output, vec![0b1010_1010]);
    }

    #[test]
    fn partial_byte_test() {
        let mut bw = BitWriter::new(4);
        bw.out_bits(&[true, true, true]);
        assert_eq!(bw.loc(), "[0.3]");
        assert_eq!(bw.flush(), 3);
        assert_eq!(bw.output, vec![0b1110_0000]);
    }

    #[test]
    fn unaligned_out16_test() {
        let mut bw = BitWriter::new(4);
        bw.out_bit(true);
        bw.out16(0x4142);
        assert_eq!(bw.bit_len(), 17);
        assert_eq!(bw.flush(), 1);
        // 1 0100_0001 0100_0010 then seven padding zeros
        assert_eq!(bw.output, vec![0b1010_0000, 0b1010_0001, 0b0000_0000]);
    }

    #[test]
    fn out8_test() {
        let mut bw = BitWriter::new(4);
        bw.out8(b'x');
        assert_eq!(bw.flush(), 8);
        assert_eq!(bw.output, "x".as_bytes());
    }

    #[test]
    fn empty_flush_test() {
        let mut bw = BitWriter::default();
        assert_eq!(bw.flush(), 0);
        assert!(bw.output.is_empty());
    }
}
