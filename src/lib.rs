//! Markov-Huffman byte compressor.
//!
//! Compresses files with either a plain Huffman code over all 256 byte values, or a first order
//! Markov-Huffman code: 256 Huffman codes, one for each possible previous byte.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> markov-huffman test.txt -o test.mh -d test.table`
//!
//! The coding table is not stored in the compressed file. It must be supplied again to extract:
//!
//! `$> markov-huffman test.mh -x -e test.table -o test.txt`
//!
#![warn(rust_2018_idioms)]

pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use error::{Error, Result};
