//! BitWriter: the write side of the bitstream.
//!
//! Bits are packed most-significant-first into a fixed staging buffer, which is written to the
//! sink whenever it fills and when flush() is called. The writer owns the sink; dropping the
//! writer performs a final flush.
//!
use std::io::Write;

use log::warn;

use super::BUFFER_SIZE;
use crate::huffman_coding::codeword::Codeword;
use crate::Result;

/// Buffered MSB-first bit writer over any byte sink.
pub struct BitWriter<W: Write> {
    /// Staging buffer. Bits at or after the cursor are always zero.
    buffer: Vec<u8>,
    /// Index of the byte currently being filled.
    cursor: usize,
    /// Index of the next bit within the current byte (0-7, 0 is the MSB).
    bit_index: usize,
    sink: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter that takes ownership of the sink.
    pub fn new(sink: W) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            cursor: 0,
            bit_index: 0,
            sink,
        }
    }

    /// Set the next bit to b (0 or 1).
    pub fn push_bit(&mut self, b: u8) -> Result<()> {
        debug_assert!(b <= 1);
        self.buffer[self.cursor] |= (b & 1) << (7 - self.bit_index);
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.cursor += 1;
            self.bit_index = 0;
            self.check_flush()?;
        }
        Ok(())
    }

    /// Write a full byte, splitting it over the current byte boundary if we are mid-byte.
    pub fn push_byte(&mut self, b: u8) -> Result<()> {
        if self.bit_index == 0 {
            self.buffer[self.cursor] = b;
            self.cursor += 1;
            self.check_flush()
        } else {
            // High bits finish the current byte, low bits start the next one
            self.buffer[self.cursor] |= b >> self.bit_index;
            self.cursor += 1;
            let bi = self.bit_index;
            self.bit_index = 0;
            self.check_flush()?;
            self.buffer[self.cursor] |= b << (8 - bi);
            self.bit_index = bi;
            Ok(())
        }
    }

    /// Write the packed bits of a codeword: whole bytes first, then the 0-7 bit tail.
    pub fn push_codeword(&mut self, codeword: &Codeword) -> Result<()> {
        let length = codeword.len();
        let bytes = codeword.bytes();
        for &byte in &bytes[..length / 8] {
            self.push_byte(byte)?;
        }

        let w = length % 8;
        if w == 0 {
            return Ok(());
        }
        let tail = bytes[bytes.len() - 1];
        if self.bit_index + w < 8 {
            // Falls short of the byte boundary
            self.buffer[self.cursor] |= tail >> self.bit_index;
            self.bit_index += w;
        } else if self.bit_index + w == 8 {
            // Completes the current byte exactly
            self.buffer[self.cursor] |= tail >> self.bit_index;
            self.cursor += 1;
            self.bit_index = 0;
            self.check_flush()?;
        } else {
            // Spills into the next byte
            self.buffer[self.cursor] |= tail >> self.bit_index;
            self.cursor += 1;
            let bi = self.bit_index;
            self.bit_index = 0;
            self.check_flush()?;
            self.buffer[self.cursor] = tail << (8 - bi);
            self.bit_index = w - (8 - bi);
        }
        Ok(())
    }

    /// Bit offset (0-7) within the byte currently being filled.
    pub fn bit_index(&self) -> usize {
        self.bit_index
    }

    /// Write out everything staged, rounding a partial byte up with zero bits, then flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.write_staged()?;
        self.sink.flush()?;
        Ok(())
    }

    /// Access the sink. Anything still staged has not reached it yet.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    fn check_flush(&mut self) -> Result<()> {
        debug_assert!(self.cursor <= BUFFER_SIZE);
        if self.cursor == BUFFER_SIZE {
            self.write_staged()?;
        }
        Ok(())
    }

    fn write_staged(&mut self) -> Result<()> {
        // A buffer that filled up can not also hold a partial byte
        assert!(self.cursor != BUFFER_SIZE || self.bit_index == 0);
        if self.bit_index > 0 {
            self.cursor += 1;
        }
        self.sink.write_all(&self.buffer[..self.cursor])?;
        self.buffer[..self.cursor].iter_mut().for_each(|b| *b = 0);
        self.cursor = 0;
        self.bit_index = 0;
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.cursor > 0 || self.bit_index > 0 {
            if let Err(e) = self.flush() {
                warn!("Final flush of the bit writer failed: {}", e);
            }
        }
    }
}
