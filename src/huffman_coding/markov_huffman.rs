use std::fmt::Write as _;
use std::io::{Read, Write};

use log::debug;

use super::coder::{CoderType, CodingProvider};
use super::codeword::Codeword;
use super::huffman::HuffmanTable;
use super::tree::{printable, NodeRef};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::{Error, Result};

/// One Huffman table per previous byte. Each context is coded independently and may be empty.
///
/// Serialized form: discriminant bit 1, then for each of the 256 contexts in order a presence
/// bit, followed by that context's tree when the bit is set.
#[derive(Clone, Debug)]
pub struct MarkovHuffmanTable {
    tables: Vec<HuffmanTable>,
}

impl MarkovHuffmanTable {
    /// Build from transition counts indexed [previous byte][current byte].
    pub fn from_counts(counts: &[[u64; 256]]) -> Self {
        assert_eq!(counts.len(), 256, "expected one row of counts per context");
        let tables: Vec<HuffmanTable> = counts
            .iter()
            .map(|row| HuffmanTable::from_counts(row))
            .collect();
        debug!(
            "Built Markov-Huffman table: {} of 256 contexts in use.",
            tables.iter().filter(|t| !t.is_empty()).count()
        );
        Self { tables }
    }

    /// Read a Markov-Huffman encoding table.
    pub fn read_table<R: Read>(br: &mut BitReader<R>) -> Result<Self> {
        let found = CoderType::from_discriminant(br.pop_bit()?);
        if found != CoderType::MarkovHuffman {
            return Err(Error::CoderMismatch {
                expected: CoderType::MarkovHuffman,
                found,
            });
        }
        let mut tables = Vec::with_capacity(256);
        for _ in 0..256 {
            if br.pop_bit()? == 1 {
                tables.push(HuffmanTable::read_tree(br)?);
            } else {
                tables.push(HuffmanTable::empty());
            }
        }
        Ok(Self { tables })
    }

    /// The table used after byte prev.
    pub fn table(&self, prev: u8) -> &HuffmanTable {
        &self.tables[prev as usize]
    }
}

impl CodingProvider for MarkovHuffmanTable {
    fn coder_type(&self) -> CoderType {
        CoderType::MarkovHuffman
    }

    fn encoding(&self, prev: u8, symbol: u8) -> Result<&Codeword> {
        self.table(prev).encoding(prev, symbol)
    }

    fn decoding_lookup(&self, prev: u8, next: u8) -> Result<Option<NodeRef<'_>>> {
        self.table(prev).decoding_lookup(prev, next)
    }

    fn write_table<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()> {
        bw.push_bit(CoderType::MarkovHuffman.discriminant())?;
        for table in &self.tables {
            if table.is_empty() {
                bw.push_bit(0)?;
            } else {
                bw.push_bit(1)?;
                table.write_tree(bw)?;
            }
        }
        Ok(())
    }

    fn table_listing(&self) -> String {
        let mut out = String::new();
        for (prev, table) in self.tables.iter().enumerate() {
            if !table.is_empty() {
                let _ = writeln!(out, "Prev '{}' table:", printable(prev as u8));
                out.push_str(&table.table_listing());
            }
        }
        out
    }

    fn tree_graph(&self) -> String {
        let mut out = String::new();
        for (prev, table) in self.tables.iter().enumerate() {
            if !table.is_empty() {
                let _ = writeln!(out, "Prev '{}' tree:", printable(prev as u8));
                out.push_str(&table.tree_graph());
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::MarkovHuffmanTable;
    use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
    use crate::huffman_coding::coder::{CoderType, CodingProvider};
    use crate::Error;

    fn transitions_of(data: &[u8]) -> Vec<[u64; 256]> {
        let mut counts = vec![[0_u64; 256]; 256];
        let mut prev = b' ';
        for &b in data {
            counts[prev as usize][b as usize] += 1;
            prev = b;
        }
        counts
    }

    #[test]
    fn aaab_test() {
        let table = MarkovHuffmanTable::from_counts(&transitions_of(b"aaab"));
        assert_eq!(table.coder_type(), CoderType::MarkovHuffman);
        // ' ' -> 'a' only, 'a' -> 'a' or 'b'
        assert_eq!(table.table(b' ').symbol_count(), 1);
        assert_eq!(table.table(b'a').symbol_count(), 2);
        assert!(table.table(b'b').is_empty());
        assert_eq!(table.encoding(b' ', b'a').unwrap().len(), 1);
        assert_eq!(table.encoding(b'a', b'a').unwrap().len(), 1);
        assert_eq!(table.encoding(b'a', b'b').unwrap().len(), 1);
        assert!(matches!(
            table.encoding(b'b', b'a'),
            Err(Error::MissingCodeword { prev: b'b', symbol: b'a' })
        ));
        assert!(matches!(
            table.decoding_lookup(b'b', 0),
            Err(Error::EmptyContext { prev: b'b' })
        ));
    }

    #[test]
    fn contexts_are_prefix_free_test() {
        let text = b"the theory then thereafter: three thin thieves";
        let table = MarkovHuffmanTable::from_counts(&transitions_of(text));
        for prev in 0..=255_u8 {
            let codewords: Vec<_> = (0..=255_u8)
                .filter_map(|s| table.table(prev).codeword(s))
                .collect();
            for (i, a) in codewords.iter().enumerate() {
                for (j, b) in codewords.iter().enumerate() {
                    assert!(i == j || !a.is_prefix_of(b));
                }
            }
        }
    }

    #[test]
    fn empty_table_test() {
        let table = MarkovHuffmanTable::from_counts(&vec![[0_u64; 256]; 256]);
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            table.write_table(&mut bw).unwrap();
        }
        // Discriminant plus 256 clear presence bits
        assert_eq!(out.len(), 33);
        assert_eq!(out[0], 0b1000_0000);
        assert!(out[1..].iter().all(|&b| b == 0));

        let mut br = BitReader::new(out.as_slice());
        let loaded = MarkovHuffmanTable::read_table(&mut br).unwrap();
        assert!((0..=255_u8).all(|prev| loaded.table(prev).is_empty()));
    }

    #[test]
    fn serialization_test() {
        let table = MarkovHuffmanTable::from_counts(&transitions_of(
            b"she sells sea shells by the sea shore, \x00\xff\x00\xff",
        ));
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            table.write_table(&mut bw).unwrap();
        }
        let mut br = BitReader::new(out.as_slice());
        let loaded = MarkovHuffmanTable::read_table(&mut br).unwrap();
        for prev in 0..=255_u8 {
            assert_eq!(loaded.table(prev).is_empty(), table.table(prev).is_empty());
            for symbol in 0..=255_u8 {
                assert_eq!(
                    loaded.table(prev).codeword(symbol),
                    table.table(prev).codeword(symbol)
                );
            }
        }
    }

    #[test]
    fn read_wrong_discriminant_test() {
        let data = [0_u8; 40];
        let mut br = BitReader::new(data.as_slice());
        assert!(matches!(
            MarkovHuffmanTable::read_table(&mut br),
            Err(Error::CoderMismatch {
                expected: CoderType::MarkovHuffman,
                found: CoderType::Huffman
            })
        ));
    }

    #[test]
    fn listing_test() {
        let table = MarkovHuffmanTable::from_counts(&transitions_of(b"aaab"));
        let listing = table.table_listing();
        assert!(listing.contains("Prev ' ' table:"));
        assert!(listing.contains("Prev 'a' table:"));
        assert!(!listing.contains("Prev 'b' table:"));
        assert_eq!(table.tree_graph().matches("graph G {").count(), 2);
    }
}
