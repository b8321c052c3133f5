/// A candidate back-reference: `offset` characters behind the current position, `length`
/// characters long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Match {
    pub offset: usize,
    pub length: usize,
}

/// Bounded history of the most recently encoded characters.
///
/// A fixed-capacity ring buffer: `head` is the slot of the oldest character and `len` the number
/// of live characters. Once full, every push overwrites the oldest character.
#[derive(Debug, Clone)]
pub struct SearchWindow {
    buffer: Vec<u8>,
    head: usize,
    len: usize,
}

impl SearchWindow {
    /// Create an empty window holding at most `capacity` characters (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Character `i` positions after the oldest one.
    #[inline(always)]
    fn get(&self, i: usize) -> u8 {
        self.buffer[(self.head + i) % self.buffer.len()]
    }

    /// Append a character, evicting the oldest if the window is full.
    pub fn push(&mut self, byte: u8) {
        let cap = self.buffer.len();
        if self.len < cap {
            self.buffer[(self.head + self.len) % cap] = byte;
            self.len += 1;
        } else {
            self.buffer[self.head] = byte;
            self.head = (self.head + 1) % cap;
        }
    }

    /// Append every character of a slice.
    pub fn extend(&mut self, bytes: &[u8]) {
        bytes.iter().for_each(|&b| self.push(b));
    }

    /// Copy the window out, oldest character first.
    pub fn to_vec(&self) -> Vec<u8> {
        (0..self.len).map(|i| self.get(i)).collect()
    }

    /// Find the longest prefix of `lookahead` that also starts somewhere in the window.
    ///
    /// Candidates are scanned from the oldest character to the newest and a match may not run
    /// past the newest character. Only a strictly longer match replaces the best so far, so on a
    /// tie the oldest candidate (largest offset) wins. An empty window yields a zero-length match.
    pub fn find_longest_match(&self, lookahead: &[u8]) -> Match {
        let mut best = Match::default();

        for start in 0..self.len {
            let mut length = 0;
            while length < lookahead.len()
                && start + length < self.len
                && self.get(start + length) == lookahead[length]
            {
                length += 1;
            }
            if length > best.length {
                best = Match {
                    offset: self.len - start,
                    length,
                };
            }
        }
        best
    }
}
