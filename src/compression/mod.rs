//! The compression module drives a coding table over a byte stream.
//!
//! Compression is a single pass over the input:
//! - A placeholder header byte is written.
//! - Each input byte is replaced by its codeword, looked up in the table for the byte before it.
//!   (The plain Huffman table ignores the previous byte.)
//! - The final partial byte is padded with zero bits and the header is patched with the number of
//!   padding bits.
//!
//! Decompression reads the header, derives the exact number of data bits from the file length and
//! walks the codewords back into bytes. Codewords of up to 8 bits resolve with a single table
//! lookup; longer ones continue down the tree a bit at a time.
//!
//! The same table must be used on both sides. It is either rebuilt from the original input or
//! loaded from an encoding-table file.
//!

pub mod compress;
pub mod decompress;
pub mod header;

/// Byte counts reported by a compression or decompression pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub bytes_in: u64,
    pub bytes_out: u64,
}
