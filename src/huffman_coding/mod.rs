//! The huffman_coding module builds the coding tables used by the compressor.
//!
//! Two kinds of table are supported:
//! - A simple Huffman table: one code over all 256 byte values.
//! - A Markov-Huffman table: 256 Huffman tables, one for each possible previous byte. Each
//!   symbol is coded with the table of the byte before it, which captures first order context.
//!
//! Tables are built once from frequency counts (or read back from an encoding-table file) and
//! are immutable afterwards. For decoding, every table carries a 256 entry lookup so that any
//! codeword of up to 8 bits resolves from a single byte of input.
//!

pub mod coder;
pub mod codeword;
pub mod huffman;
pub mod markov_huffman;
pub mod min_pq;
pub mod tree;
