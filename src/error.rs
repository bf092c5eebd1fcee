//! Error type shared by the bitstream, coding tables and the compression pipeline.

use thiserror::Error;

use crate::huffman_coding::coder::CoderType;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Underlying read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header's fixed signature nibble was not found.
    #[error("input appears corrupt: bad header byte 0x{found:02x}")]
    BadSignature { found: u8 },

    /// File (or encoding table) was produced by the other coder type.
    #[error("encoding method does not match the coding table: expected {expected}, found {found}")]
    CoderMismatch { expected: CoderType, found: CoderType },

    /// Tree descent reached a missing child, or a lookup slot was empty. Every tree built or read
    /// here is full, so this only guards the decoder against a table that breaks that invariant.
    #[error("input appears corrupt: invalid codeword at bit {bit_offset}")]
    InvalidCodeword { bit_offset: u64 },

    /// The stream ended while more bits were required.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Decoding did not stop exactly on the data length recorded in the header.
    #[error("input appears truncated or corrupt: expected {expected} data bits, decoded {decoded}")]
    LengthMismatch { expected: u64, decoded: u64 },

    /// A symbol has no codeword in the supplied table.
    #[error("no codeword for byte 0x{symbol:02x} after byte 0x{prev:02x}")]
    MissingCodeword { prev: u8, symbol: u8 },

    /// The decoder entered a context that has no table.
    #[error("input appears corrupt: no coding table for context 0x{prev:02x}")]
    EmptyContext { prev: u8 },

    /// An empty plain Huffman table has no serialized form.
    #[error("cannot write an empty Huffman table")]
    EmptyTable,

    /// Malformed serialized coding tree.
    #[error("corrupt encoding table: {0}")]
    CorruptTable(String),

    /// Invalid combination of command line options.
    #[error("{0}")]
    Usage(String),
}
