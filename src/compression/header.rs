//! The one byte file header.
//!
//! ```text
//!  0 0 1 1 E R R R
//! ```
//! - `0011`: fixed signature.
//! - `E`: inverse of the coder discriminant. With the signature this makes a Markov-Huffman
//!   header read as the ASCII digit of its remainder.
//! - `RRR`: unused bits (0-7) in the final data byte.
//!
//! The data length in bits is `(file length - 1) * 8 - RRR`.
//!
use log::trace;

use crate::huffman_coding::coder::CoderType;
use crate::{Error, Result};

pub const SIGNATURE: u8 = 0x30;
const SIGNATURE_MASK: u8 = 0xf0;
const CODER_BIT: u8 = 1 << 3;
const REMAINDER_MASK: u8 = 0x07;

/// Written first and patched once the output is complete. The set top bit fails the signature
/// check, so an unpatched file is never mistaken for a valid one.
pub const PLACEHOLDER: u8 = 1 << 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub coder: CoderType,
    /// Unused bits in the last data byte.
    pub remainder: u8,
}

impl Header {
    /// Header for output whose last data byte has bit_index bits in use (0 meaning full).
    pub fn new(coder: CoderType, bit_index: usize) -> Self {
        Self {
            coder,
            remainder: ((8 - bit_index) % 8) as u8,
        }
    }

    pub fn to_byte(self) -> u8 {
        debug_assert!(self.remainder < 8);
        let inverted = !self.coder.discriminant() & 1;
        SIGNATURE | inverted << 3 | self.remainder
    }

    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte & SIGNATURE_MASK != SIGNATURE {
            return Err(Error::BadSignature { found: byte });
        }
        let header = Self {
            coder: CoderType::from_discriminant(!(byte & CODER_BIT) >> 3),
            remainder: byte & REMAINDER_MASK,
        };
        trace!("Read header {:?}.", header);
        Ok(header)
    }

    /// Number of data bits in a file of file_len bytes (header included).
    pub fn data_bits(&self, file_len: u64) -> Result<u64> {
        let bits = file_len.saturating_sub(1) * 8;
        // The remainder can not exceed the data actually present
        if bits < self.remainder as u64 {
            return Err(Error::UnexpectedEof);
        }
        Ok(bits - self.remainder as u64)
    }
}

#[cfg(test)]
mod test {
    use super::{Header, PLACEHOLDER};
    use crate::huffman_coding::coder::CoderType;
    use crate::Error;

    #[test]
    fn layout_test() {
        let h = Header::new(CoderType::MarkovHuffman, 5);
        assert_eq!(h.remainder, 3);
        assert_eq!(h.to_byte(), b'3');
        let h = Header::new(CoderType::Huffman, 0);
        assert_eq!(h.remainder, 0);
        assert_eq!(h.to_byte(), 0b0011_1000);
        assert_eq!(Header::new(CoderType::Huffman, 1).remainder, 7);
    }

    #[test]
    fn parse_test() {
        for coder in [CoderType::Huffman, CoderType::MarkovHuffman] {
            for bit_index in 0..8 {
                let h = Header::new(coder, bit_index);
                assert_eq!(Header::from_byte(h.to_byte()).unwrap(), h);
            }
        }
    }

    #[test]
    fn bad_signature_test() {
        assert!(matches!(
            Header::from_byte(PLACEHOLDER),
            Err(Error::BadSignature { found: 0x80 })
        ));
        assert!(Header::from_byte(b'A').is_err());
    }

    #[test]
    fn data_bits_test() {
        let h = Header::from_byte(b'3').unwrap();
        assert_eq!(h.data_bits(3).unwrap(), 13);
        assert!(matches!(h.data_bits(1), Err(Error::UnexpectedEof)));
        let h = Header::from_byte(b'0').unwrap();
        assert_eq!(h.data_bits(1).unwrap(), 0);
    }
}
