use std::fmt::Write as _;
use std::io::{Read, Write};

use log::{debug, trace};

use super::coder::{CoderType, CodingProvider};
use super::codeword::Codeword;
use super::min_pq::MinPq;
use super::tree::{printable, CodeTree, NodeId, NodeKind, NodeRef};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::{Error, Result};

/// A Huffman code over the 256 byte values.
///
/// Besides the tree itself the table keeps the codeword of every symbol, for encoding, and a
/// 256 entry lookup indexed by the next input byte, for decoding. A lookup slot holds the leaf
/// whose codeword (of 8 bits or less) starts that byte, or the internal node at depth 8 where a
/// longer codeword continues.
#[derive(Clone, Debug)]
pub struct HuffmanTable {
    tree: Option<CodeTree>,
    encoding_table: Vec<Codeword>,
    decoding_lookup_table: Vec<Option<NodeId>>,
}

impl HuffmanTable {
    /// A table with no symbols. It can neither encode nor decode.
    pub fn empty() -> Self {
        Self {
            tree: None,
            encoding_table: vec![Codeword::new(); 256],
            decoding_lookup_table: vec![None; 256],
        }
    }

    /// Build the Huffman tree for 256 symbol counts. All-zero counts give an empty table.
    pub fn from_counts(counts: &[u64]) -> Self {
        assert_eq!(counts.len(), 256, "expected one count per byte value");

        // Heights are only needed while building, so they live beside the tree, indexed by NodeId.
        let mut tree = CodeTree::with_capacity(511);
        let mut heights: Vec<usize> = Vec::with_capacity(511);
        let mut q = MinPq::default();
        for (symbol, &count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
            q.insert(count, tree.push_leaf(symbol as u8, count));
            heights.push(0);
        }

        // Merge the two lightest nodes until one is left
        let mut root = None;
        while let Some(mut a) = q.pop_min() {
            let mut b = match q.pop_min() {
                Some(b) => b,
                None => {
                    root = Some(a);
                    break;
                }
            };
            // Taller subtree goes on the right. Only the left/right layout changes, not lengths.
            if heights[a] > heights[b] {
                std::mem::swap(&mut a, &mut b);
            }
            let id = tree.push_internal(a, b);
            heights.push(heights[a].max(heights[b]) + 1);
            q.insert(tree.node(id).weight, id);
        }

        match root {
            Some(root) => {
                tree.set_root(root);
                tree.ensure_internal_root();
                let table = Self::from_tree(tree);
                debug!(
                    "Built Huffman table: {} symbols, longest codeword {} bits.",
                    table.symbol_count(),
                    table.max_codeword_len()
                );
                table
            }
            None => Self::empty(),
        }
    }

    /// Read a bare serialized tree (no discriminant bit).
    pub fn read_tree<R: Read>(br: &mut BitReader<R>) -> Result<Self> {
        Ok(Self::from_tree(CodeTree::read_from(br)?))
    }

    /// Read a simple Huffman encoding table: discriminant bit 0, then the tree.
    pub fn read_table<R: Read>(br: &mut BitReader<R>) -> Result<Self> {
        let found = CoderType::from_discriminant(br.pop_bit()?);
        if found != CoderType::Huffman {
            return Err(Error::CoderMismatch {
                expected: CoderType::Huffman,
                found,
            });
        }
        Self::read_tree(br)
    }

    /// Write the bare tree (no discriminant bit).
    pub fn write_tree<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()> {
        match &self.tree {
            Some(tree) => tree.write_to(bw),
            None => Err(Error::EmptyTable),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    /// Codeword for symbol, or None if the symbol does not occur in this table.
    pub fn codeword(&self, symbol: u8) -> Option<&Codeword> {
        let codeword = &self.encoding_table[symbol as usize];
        if codeword.is_empty() {
            None
        } else {
            Some(codeword)
        }
    }

    /// Node for the next 8 input bits.
    pub fn lookup(&self, next: u8) -> Option<NodeRef<'_>> {
        let tree = self.tree.as_ref()?;
        self.decoding_lookup_table[next as usize].map(|id| tree.node_ref(id))
    }

    /// Number of distinct symbols with a codeword.
    pub fn symbol_count(&self) -> usize {
        self.encoding_table.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn max_codeword_len(&self) -> usize {
        self.encoding_table.iter().map(|c| c.len()).max().unwrap_or(0)
    }

    /// Assign depths and fill the encoding and decoding tables.
    fn from_tree(mut tree: CodeTree) -> Self {
        let mut encoding_table = vec![Codeword::new(); 256];
        let mut decoding_lookup_table = vec![None; 256];
        let mut working = Codeword::new();
        let root = tree.root();
        index_node(
            &mut tree,
            root,
            &mut working,
            &mut encoding_table,
            &mut decoding_lookup_table,
        );
        trace!("Indexed code tree of {} nodes.", tree.len());
        Self {
            tree: Some(tree),
            encoding_table,
            decoding_lookup_table,
        }
    }
}

/// Walk the tree depth first, carrying the codeword of the current node.
fn index_node(
    tree: &mut CodeTree,
    id: NodeId,
    codeword: &mut Codeword,
    encoding_table: &mut [Codeword],
    lookup: &mut [Option<NodeId>],
) {
    let depth = codeword.len();
    tree.set_depth(id, depth);
    // Anything exactly one byte deep owns the slot for that byte
    if depth == 8 {
        lookup[codeword.bytes()[0] as usize] = Some(id);
    }
    match tree.node(id).kind {
        NodeKind::Internal { left, right } => {
            codeword.push_bit(0);
            index_node(tree, left, codeword, encoding_table, lookup);
            codeword.pop_bit();
            codeword.push_bit(1);
            index_node(tree, right, codeword, encoding_table, lookup);
            codeword.pop_bit();
        }
        NodeKind::Leaf(symbol) => {
            // A short codeword owns every byte that starts with it
            if depth < 8 {
                let start = codeword.bytes()[0] as usize;
                lookup[start..start + (1 << (8 - depth))]
                    .iter_mut()
                    .for_each(|slot| *slot = Some(id));
            }
            encoding_table[symbol as usize] = codeword.clone();
        }
    }
}

impl CodingProvider for HuffmanTable {
    fn coder_type(&self) -> CoderType {
        CoderType::Huffman
    }

    fn encoding(&self, prev: u8, symbol: u8) -> Result<&Codeword> {
        self.codeword(symbol)
            .ok_or(Error::MissingCodeword { prev, symbol })
    }

    fn decoding_lookup(&self, prev: u8, next: u8) -> Result<Option<NodeRef<'_>>> {
        if self.is_empty() {
            return Err(Error::EmptyContext { prev });
        }
        Ok(self.lookup(next))
    }

    fn write_table<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyTable);
        }
        bw.push_bit(CoderType::Huffman.discriminant())?;
        self.write_tree(bw)
    }

    fn table_listing(&self) -> String {
        let mut out = String::from("Table:\n");
        for (symbol, codeword) in self.encoding_table.iter().enumerate() {
            if !codeword.is_empty() {
                let _ = writeln!(
                    out,
                    "{} {} {}",
                    printable(symbol as u8),
                    codeword.len(),
                    codeword
                );
            }
        }
        out
    }

    fn tree_graph(&self) -> String {
        self.tree.as_ref().map(|t| t.dot()).unwrap_or_default()
    }
}
