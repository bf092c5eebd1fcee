use std::fmt::{Display, Formatter};

/// A variable length bit string, packed MSB-first. Used as a stack while walking a tree, and
/// snapshotted per symbol into the encoding table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Codeword {
    length: usize,
    bits: Vec<u8>,
}

impl Codeword {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit (0 or 1).
    pub fn push_bit(&mut self, b: u8) {
        debug_assert!(b <= 1);
        if self.length % 8 == 0 {
            self.bits.push((b & 1) << 7);
        } else {
            self.bits[self.length / 8] |= (b & 1) << (7 - self.length % 8);
        }
        self.length += 1;
    }

    /// Remove the last bit. Unused trailing bits are kept at zero.
    pub fn pop_bit(&mut self) {
        assert!(self.length > 0, "pop from an empty codeword");
        self.length -= 1;
        if (self.length + 7) / 8 < self.bits.len() {
            self.bits.pop();
        } else {
            self.bits[self.length / 8] &= !(1 << (7 - self.length % 8));
        }
    }

    /// Number of bits in the codeword.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Packed bits, ceil(len / 8) bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Bit at position i, counted from the start of the codeword.
    pub fn bit(&self, i: usize) -> u8 {
        debug_assert!(i < self.length);
        (self.bits[i / 8] >> (7 - i % 8)) & 1
    }

    /// True if self is a prefix of (or equal to) other.
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        self.length <= other.length && (0..self.length).all(|i| self.bit(i) == other.bit(i))
    }
}

impl Display for Codeword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.length {
            write!(f, "{}", self.bit(i))?;
        }
        Ok(())
    }
}
