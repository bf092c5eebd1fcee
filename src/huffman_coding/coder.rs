//! The coding provider seam between the tables and the compression pipeline.
//!
//! Both table kinds answer the same questions: which codeword encodes a symbol after a given
//! previous byte, and where does the byte-wide decoding lookup land. The plain Huffman table
//! simply ignores the previous byte.
//!
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

use log::info;

use super::codeword::Codeword;
use super::huffman::HuffmanTable;
use super::markov_huffman::MarkovHuffmanTable;
use super::tree::NodeRef;
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::tools::freq_count::{count_symbols, count_transitions};
use crate::{Error, Result};

/// Coder discriminant, shared by the file header and the encoding-table format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoderType {
    Huffman = 0,
    MarkovHuffman = 1,
}

impl CoderType {
    pub fn discriminant(self) -> u8 {
        self as u8
    }

    /// Map the low bit of b to a coder type.
    pub fn from_discriminant(b: u8) -> Self {
        if b & 1 == 0 {
            CoderType::Huffman
        } else {
            CoderType::MarkovHuffman
        }
    }
}

impl Display for CoderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoderType::Huffman => write!(f, "simple Huffman"),
            CoderType::MarkovHuffman => write!(f, "Markov-Huffman"),
        }
    }
}

/// Anything that can drive the compression pipeline.
pub trait CodingProvider {
    fn coder_type(&self) -> CoderType;

    /// Codeword for symbol when it follows prev.
    fn encoding(&self, prev: u8, symbol: u8) -> Result<&Codeword>;

    /// Node reached by looking up the next 8 input bits in the table for prev. A leaf is a fully
    /// decoded symbol of depth() <= 8 bits; an internal node sits at depth 8 and decoding continues
    /// bit by bit from there. Ok(None) means no codeword starts with these bits.
    fn decoding_lookup(&self, prev: u8, next: u8) -> Result<Option<NodeRef<'_>>>;

    /// Serialize the table, discriminant bit first.
    fn write_table<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()>;

    /// One line per symbol: printable symbol, codeword length, codeword bits.
    fn table_listing(&self) -> String;

    /// Graphviz rendering of the tree(s).
    fn tree_graph(&self) -> String;
}

/// Either kind of coding table.
pub enum Coder {
    Huffman(HuffmanTable),
    Markov(MarkovHuffmanTable),
}

impl Coder {
    /// Build a table of the requested kind from one pass over source.
    pub fn from_input<R: Read>(coder_type: CoderType, source: &mut R) -> Result<Self> {
        info!("Building {} encoding table from input.", coder_type);
        let coder = match coder_type {
            CoderType::Huffman => Coder::Huffman(HuffmanTable::from_counts(&count_symbols(source)?)),
            CoderType::MarkovHuffman => {
                Coder::Markov(MarkovHuffmanTable::from_counts(&count_transitions(source)?))
            }
        };
        Ok(coder)
    }

    /// Read an encoding table, checking that it is of the expected kind.
    pub fn read_table<R: Read>(expected: CoderType, br: &mut BitReader<R>) -> Result<Self> {
        let found = CoderType::from_discriminant(br.peek_bit()?);
        if found != expected {
            return Err(Error::CoderMismatch { expected, found });
        }
        info!("Loading {} encoding table.", found);
        match found {
            CoderType::Huffman => Ok(Coder::Huffman(HuffmanTable::read_table(br)?)),
            CoderType::MarkovHuffman => Ok(Coder::Markov(MarkovHuffmanTable::read_table(br)?)),
        }
    }
}

impl CodingProvider for Coder {
    fn coder_type(&self) -> CoderType {
        match self {
            Coder::Huffman(t) => t.coder_type(),
            Coder::Markov(t) => t.coder_type(),
        }
    }

    fn encoding(&self, prev: u8, symbol: u8) -> Result<&Codeword> {
        match self {
            Coder::Huffman(t) => t.encoding(prev, symbol),
            Coder::Markov(t) => t.encoding(prev, symbol),
        }
    }

    fn decoding_lookup(&self, prev: u8, next: u8) -> Result<Option<NodeRef<'_>>> {
        match self {
            Coder::Huffman(t) => t.decoding_lookup(prev, next),
            Coder::Markov(t) => t.decoding_lookup(prev, next),
        }
    }

    fn write_table<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()> {
        match self {
            Coder::Huffman(t) => t.write_table(bw),
            Coder::Markov(t) => t.write_table(bw),
        }
    }

    fn table_listing(&self) -> String {
        match self {
            Coder::Huffman(t) => t.table_listing(),
            Coder::Markov(t) => t.table_listing(),
        }
    }

    fn tree_graph(&self) -> String {
        match self {
            Coder::Huffman(t) => t.tree_graph(),
            Coder::Markov(t) => t.tree_graph(),
        }
    }
}
