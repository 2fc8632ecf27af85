//! Huffman tree construction and serialization.
//!
//! The serialized form of a tree is a pre-order walk: an internal node is
//! written as a `0` bit followed by its left and right subtree, a leaf as a `1`
//! bit followed by its symbol as one 8-bit unit. The end-of-stream symbol is
//! written as the unit [`ESCAPE_UNIT`] followed by a `1` bit. Since the escape
//! unit is also a regular byte value, a literal `0xFF` is written as the escape
//! unit followed by a `0` bit.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{Read, Write};

use crate::bit::{BitReader, BitWriter};
use crate::code::{Code, CodeTable};
use crate::error::{Error, FormatError, PreconditionError, Result, bail};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

/// The unit that announces the end-of-stream symbol in a serialized tree.
pub const ESCAPE_UNIT: u8 = 0xFF;

/// A full binary tree over the alphabet has at most this many internal nodes.
const MAX_INTERNAL_NODES: usize = Symbol::COUNT - 1;

/// The handle of a node in a [`HuffmanTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

/// A node of a [`HuffmanTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A leaf holding a symbol.
    Leaf(Symbol),
    /// An internal node with exactly two children.
    Internal {
        /// The child reached by a `0` bit.
        left: NodeId,
        /// The child reached by a `1` bit.
        right: NodeId,
    },
}

/// A Huffman tree.
///
/// Nodes are stored in an arena and never change after construction. Every
/// internal node has exactly two children and every symbol appears on at most
/// one leaf.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree from symbol frequencies.
    ///
    /// The two lightest subtrees are combined repeatedly, the lighter one
    /// becoming the left child. Among subtrees of equal weight, the one created
    /// first is taken first.
    ///
    /// If the table contains a single symbol, a second leaf with weight zero is
    /// added (the end-of-stream symbol, or the byte `0` if the single symbol is
    /// the end-of-stream symbol itself), so that every code has at least one bit.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let mut nodes = Vec::with_capacity(2 * table.len() + 1);
        let mut queue = BinaryHeap::with_capacity(table.len() + 1);

        for (symbol, count) in table {
            let id = push_node(&mut nodes, Node::Leaf(symbol));
            queue.push(Reverse((count as u64, id)));
        }

        if let [Node::Leaf(symbol)] = nodes[..] {
            let filler = if symbol.is_end_of_stream() {
                Symbol::Literal(0)
            } else {
                Symbol::EndOfStream
            };

            let id = push_node(&mut nodes, Node::Leaf(filler));
            queue.push(Reverse((0, id)));
        }

        let root = loop {
            let Some(Reverse((left_weight, left))) = queue.pop() else {
                bail!(PreconditionError::EmptyFrequencyTable);
            };

            let Some(Reverse((right_weight, right))) = queue.pop() else {
                break left;
            };

            let parent = push_node(&mut nodes, Node::Internal { left, right });
            queue.push(Reverse((left_weight.saturating_add(right_weight), parent)));
        };

        let tree = Self { nodes, root };

        ldebug!(
            "built code tree with {} leaves and depth {}",
            tree.leaf_count(),
            tree.depth()
        );

        Ok(tree)
    }

    /// Derive the code of every symbol in the tree.
    pub fn codes(&self) -> CodeTable {
        let mut table = CodeTable::new();
        let mut path = Vec::new();
        self.collect_codes(self.root, &mut path, &mut table);

        table
    }

    fn collect_codes(&self, id: NodeId, path: &mut Vec<bool>, table: &mut CodeTable) {
        match self.node(id) {
            Node::Leaf(symbol) => table.insert(symbol, Code::from_bits(path)),
            Node::Internal { left, right } => {
                path.push(false);
                self.collect_codes(left, path, table);
                path.pop();

                path.push(true);
                self.collect_codes(right, path, table);
                path.pop();
            }
        }
    }

    /// Serialize the tree.
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        self.write_node(self.root, writer)
    }

    fn write_node<W: Write>(&self, id: NodeId, writer: &mut BitWriter<W>) -> Result<()> {
        match self.node(id) {
            Node::Internal { left, right } => {
                writer.write_bit(false)?;
                self.write_node(left, writer)?;
                self.write_node(right, writer)
            }
            Node::Leaf(symbol) => {
                writer.write_bit(true)?;

                match symbol {
                    Symbol::Literal(ESCAPE_UNIT) => {
                        writer.write_unit(ESCAPE_UNIT)?;
                        writer.write_bit(false)?;
                    }
                    Symbol::Literal(byte) => writer.write_unit(byte)?,
                    Symbol::EndOfStream => {
                        writer.write_unit(ESCAPE_UNIT)?;
                        writer.write_bit(true)?;
                    }
                }

                Ok(())
            }
        }
    }

    /// Deserialize a tree.
    ///
    /// Fails with a [`FormatError`] if the input ends early or does not describe
    /// a tree that can terminate a stream.
    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let mut parser = TreeParser {
            reader,
            nodes: Vec::new(),
            seen: [false; Symbol::COUNT],
            internal_nodes: 0,
        };

        let root = parser.parse_node()?;

        if let [Node::Leaf(_)] = parser.nodes[..] {
            bail!(FormatError::DegenerateTree);
        }

        if !parser.seen[Symbol::EndOfStream.index()] {
            bail!(FormatError::MissingEndOfStream);
        }

        let tree = Self {
            nodes: parser.nodes,
            root,
        };

        ldebug!("read code tree with {} leaves", tree.leaf_count());

        Ok(tree)
    }

    /// Return the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Return the node with the given handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.0 as usize]
    }

    /// Return the number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.symbols().count()
    }

    /// Return the symbols of all leaves.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Leaf(symbol) => Some(*symbol),
            Node::Internal { .. } => None,
        })
    }

    /// Return the length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf(_) => max_depth = max_depth.max(depth),
                Node::Internal { left, right } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }

        max_depth
    }
}

/// Two trees are equal if they have the same shape and the same symbols at the
/// same positions, regardless of how their nodes are laid out.
impl PartialEq for HuffmanTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root, other.root)];

        while let Some((a, b)) = stack.pop() {
            match (self.node(a), other.node(b)) {
                (Node::Leaf(a), Node::Leaf(b)) if a == b => {}
                (
                    Node::Internal {
                        left: left_a,
                        right: right_a,
                    },
                    Node::Internal {
                        left: left_b,
                        right: right_b,
                    },
                ) => {
                    stack.push((left_a, left_b));
                    stack.push((right_a, right_b));
                }
                _ => return false,
            }
        }

        true
    }
}

impl Eq for HuffmanTree {}

fn push_node(nodes: &mut Vec<Node>, node: Node) -> NodeId {
    let id = NodeId(nodes.len() as u32);
    nodes.push(node);

    id
}

struct TreeParser<'a, R> {
    reader: &'a mut BitReader<R>,
    nodes: Vec<Node>,
    seen: [bool; Symbol::COUNT],
    internal_nodes: usize,
}

impl<R: Read> TreeParser<'_, R> {
    fn parse_node(&mut self) -> Result<NodeId> {
        let is_leaf = self.reader.read_bit().map_err(Error::from_read)?;

        if is_leaf {
            let symbol = self.parse_symbol()?;
            let seen = &mut self.seen[symbol.index()];

            if *seen {
                bail!(FormatError::DuplicateSymbol);
            }

            *seen = true;

            Ok(push_node(&mut self.nodes, Node::Leaf(symbol)))
        } else {
            // This also bounds the recursion depth for inputs like long runs of
            // zero bits.
            self.internal_nodes += 1;

            if self.internal_nodes > MAX_INTERNAL_NODES {
                bail!(FormatError::TreeTooLarge);
            }

            let left = self.parse_node()?;
            let right = self.parse_node()?;

            Ok(push_node(&mut self.nodes, Node::Internal { left, right }))
        }
    }

    fn parse_symbol(&mut self) -> Result<Symbol> {
        let unit = self.reader.read_unit().map_err(Error::from_read)?;

        if unit != ESCAPE_UNIT {
            return Ok(Symbol::Literal(unit));
        }

        let is_end_of_stream = self.reader.read_bit().map_err(Error::from_read)?;

        Ok(if is_end_of_stream {
            Symbol::EndOfStream
        } else {
            Symbol::Literal(ESCAPE_UNIT)
        })
    }
}
