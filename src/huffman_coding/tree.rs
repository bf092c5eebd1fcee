//! Code trees, stored as an arena of nodes addressed by index.
//!
//! Serialized form (preorder, left before right):
//! - internal node: bit 0, then the left subtree, then the right subtree
//! - leaf: bit 1, then the 8 bit symbol
//!
//! Weights are not serialized; a tree read back from a stream has zero weights.
//!
use std::fmt::Write as _;
use std::io::{Read, Write};

use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::{Error, Result};

/// Index of a node within its tree.
pub type NodeId = usize;

/// Deepest tree accepted when reading a serialized tree.
const MAX_TREE_DEPTH: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(u8),
    Internal { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Sum of the weights of all leaves below (or at) this node.
    pub weight: u64,
    /// Distance from the root, which is also the codeword length for a leaf.
    pub depth: usize,
}

/// A binary code tree. Every internal node has exactly two children.
#[derive(Clone, Debug)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CodeTree {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: 0,
        }
    }

    pub(crate) fn push_leaf(&mut self, symbol: u8, weight: u64) -> NodeId {
        self.nodes.push(Node {
            kind: NodeKind::Leaf(symbol),
            weight,
            depth: 0,
        });
        self.nodes.len() - 1
    }

    pub(crate) fn push_internal(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let weight = self.nodes[left].weight + self.nodes[right].weight;
        self.nodes.push(Node {
            kind: NodeKind::Internal { left, right },
            weight,
            depth: 0,
        });
        self.nodes.len() - 1
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub(crate) fn set_depth(&mut self, id: NodeId, depth: usize) {
        self.nodes[id].depth = depth;
    }

    /// A tree holding a single leaf would give that symbol an empty codeword. Pair the leaf with
    /// a copy of itself under a new internal root so every codeword is at least one bit long.
    pub(crate) fn ensure_internal_root(&mut self) {
        if let NodeKind::Leaf(symbol) = self.nodes[self.root].kind {
            let twin = self.push_leaf(symbol, self.nodes[self.root].weight);
            let root = self.push_internal(self.root, twin);
            self.root = root;
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Number of nodes, leaves and internal.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Write the tree in preorder.
    pub fn write_to<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()> {
        self.write_node(self.root, bw)
    }

    fn write_node<W: Write>(&self, id: NodeId, bw: &mut BitWriter<W>) -> Result<()> {
        match self.nodes[id].kind {
            NodeKind::Internal { left, right } => {
                bw.push_bit(0)?;
                self.write_node(left, bw)?;
                self.write_node(right, bw)
            }
            NodeKind::Leaf(symbol) => {
                bw.push_bit(1)?;
                bw.push_byte(symbol)
            }
        }
    }

    /// Read a tree written by write_to().
    pub fn read_from<R: Read>(br: &mut BitReader<R>) -> Result<Self> {
        let mut tree = Self::with_capacity(511);
        let root = tree.read_node(br, 0)?;
        tree.set_root(root);
        tree.ensure_internal_root();
        Ok(tree)
    }

    fn read_node<R: Read>(&mut self, br: &mut BitReader<R>, depth: usize) -> Result<NodeId> {
        if depth > MAX_TREE_DEPTH {
            return Err(Error::CorruptTable(format!(
                "tree is deeper than {} levels",
                MAX_TREE_DEPTH
            )));
        }
        if br.pop_bit()? == 1 {
            let symbol = br.pop_byte()?;
            Ok(self.push_leaf(symbol, 0))
        } else {
            let left = self.read_node(br, depth + 1)?;
            let right = self.read_node(br, depth + 1)?;
            Ok(self.push_internal(left, right))
        }
    }

    /// Render the tree as a Graphviz graph.
    pub fn dot(&self) -> String {
        let mut out = String::new();
        out.push_str("graph G {\n");
        out.push_str("\tnodesep=0.3;\n");
        out.push_str("\tranksep=0.2;\n");
        out.push_str("\tnode [shape=circle, fixedsize=true];\n");
        out.push_str("\tedge [arrowsize=0.8];\n");
        if !self.is_empty() {
            self.dot_node(self.root, 0, &mut out);
        }
        out.push_str("}\n");
        out
    }

    /// Emit node n and its subtree, returning the last node number used.
    fn dot_node(&self, id: NodeId, n: usize, out: &mut String) -> usize {
        let node = &self.nodes[id];
        // Writing to a String can not fail
        match node.kind {
            NodeKind::Internal { left, right } => {
                let _ = writeln!(out, "\tn{} [label=\"{}\"];", n, node.weight);
                let last_left = self.dot_node(left, n + 1, out);
                let _ = writeln!(out, "\tn{} -- n{};", n, n + 1);
                let last_right = self.dot_node(right, last_left + 1, out);
                let _ = writeln!(out, "\tn{} -- n{};", n, last_left + 1);
                last_right
            }
            NodeKind::Leaf(symbol) => {
                let _ = writeln!(out, "\tn{} [label=\"{}\"];", n, printable(symbol));
                n
            }
        }
    }
}

/// Printable form of a byte for debug output.
pub fn printable(c: u8) -> char {
    if c > 32 && c < 127 {
        c as char
    } else {
        ' '
    }
}

/// Borrowed view of one node, used to walk the tree while decoding.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    tree: &'a CodeTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The leaf symbol, or None for an internal node.
    pub fn symbol(&self) -> Option<u8> {
        match self.tree.nodes[self.id].kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }

    pub fn depth(&self) -> usize {
        self.tree.nodes[self.id].depth
    }

    /// Follow the edge for bit (0 = left, 1 = right). None at a leaf.
    pub fn child(&self, bit: u8) -> Option<NodeRef<'a>> {
        match self.tree.nodes[self.id].kind {
            NodeKind::Internal { left, right } => Some(NodeRef {
                tree: self.tree,
                id: if bit == 0 { left } else { right },
            }),
            NodeKind::Leaf(_) => None,
        }
    }
}
