//! BitReader: the read side of the bitstream.
//!
//! Reads a packed MSB-first bitstream through a fixed staging buffer that is lazily refilled
//! from the source.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!
use std::io::{ErrorKind, Read};

use super::BUFFER_SIZE;
use crate::{Error, Result};

/// Buffered MSB-first bit reader over any byte source.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    /// Index of the byte currently being consumed.
    cursor: usize,
    /// Index of the next bit within the current byte (0-7, 0 is the MSB).
    bit_index: usize,
    /// Number of valid bytes in the buffer.
    filled: usize,
    /// Set once the source has reported end of input.
    eof: bool,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader. Nothing is read until the first bit is requested.
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            cursor: 0,
            bit_index: 0,
            filled: 0,
            eof: false,
            source,
        }
    }

    /// Return the next bit without consuming it.
    pub fn peek_bit(&mut self) -> Result<u8> {
        if !self.check_load()? {
            return Err(Error::UnexpectedEof);
        }
        Ok((self.buffer[self.cursor] >> (7 - self.bit_index)) & 1)
    }

    /// Consume and return the next bit.
    pub fn pop_bit(&mut self) -> Result<u8> {
        let bit = self.peek_bit()?;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.cursor += 1;
            self.bit_index = 0;
        }
        Ok(bit)
    }

    /// Consume the next bit, or return 0 without consuming anything if the input is exhausted.
    pub fn try_pop_bit(&mut self) -> Result<u8> {
        if self.check_load()? {
            self.pop_bit()
        } else {
            Ok(0)
        }
    }

    /// Consume the next 8 bits, composing them from two bytes when we are mid-byte.
    pub fn pop_byte(&mut self) -> Result<u8> {
        if !self.check_load()? {
            return Err(Error::UnexpectedEof);
        }
        if self.bit_index == 0 {
            let b = self.buffer[self.cursor];
            self.cursor += 1;
            Ok(b)
        } else {
            let mut b = self.buffer[self.cursor] << self.bit_index;
            self.cursor += 1;
            if !self.check_load()? {
                return Err(Error::UnexpectedEof);
            }
            b |= self.buffer[self.cursor] >> (8 - self.bit_index);
            Ok(b)
        }
    }

    /// Fill bits start..8 of byte from the stream, leaving bits above start untouched. Bits past
    /// the end of input read as zero.
    pub fn pop_rest(&mut self, mut byte: u8, start: usize) -> Result<u8> {
        assert!(start < 8, "partial byte index {} out of range", start);
        let mut mask = 0x80_u8 >> start;
        while mask != 0 {
            if self.try_pop_bit()? == 1 {
                byte |= mask;
            }
            mask >>= 1;
        }
        Ok(byte)
    }

    /// Bit offset (0-7) within the byte currently being consumed.
    pub fn bit_index(&self) -> usize {
        self.bit_index
    }

    /// Make sure the cursor points at loaded data. Returns false at end of input.
    fn check_load(&mut self) -> Result<bool> {
        debug_assert!(self.cursor <= self.filled);
        if self.cursor == self.filled && !self.eof {
            self.load()?;
        }
        Ok(self.cursor < self.filled)
    }

    fn load(&mut self) -> Result<()> {
        let size = loop {
            match self.source.read(&mut self.buffer) {
                Ok(size) => break size,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if size == 0 {
            self.eof = true;
        }
        self.filled = size;
        self.cursor = 0;
        Ok(())
    }
}
