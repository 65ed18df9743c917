//! Huffman tree construction, serialization and parsing.
//!
//! The tree is built by repeatedly merging the two lowest-weight entries of a
//! [`PriorityQueue`]; the first entry dequeued becomes the left child. The
//! single-line text form written into the container header is
//!
//! ```text
//! tree := symbol | "(" tree " " tree ")"
//! ```
//!
//! where `symbol` is the decimal byte value of a leaf.

use std::fmt;

use super::codes::{Code, MAX_CODE_LENGTH};
use super::frequency::Histogram;
use super::queue::PriorityQueue;
use crate::error::{Error, Result};

/// A node of the Huffman tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf { symbol: u8, weight: u64 },
    Internal { weight: u64, left: Box<HuffmanNode>, right: Box<HuffmanNode> },
}

impl HuffmanNode {
    pub fn leaf(symbol: u8, weight: u64) -> Self {
        HuffmanNode::Leaf { symbol, weight }
    }

    /// Join two subtrees under a new internal node
    pub fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    fn count(&self) -> (usize, usize) {
        match self {
            HuffmanNode::Leaf { .. } => (1, 0),
            HuffmanNode::Internal { left, right, .. } => {
                let (l_leaves, l_internal) = left.count();
                let (r_leaves, r_internal) = right.count();
                (l_leaves + r_leaves, l_internal + r_internal + 1)
            }
        }
    }

    fn height(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    /// Depth-first search for `symbol`, pushing the path (left = 0) onto `path`
    fn find_path(&self, symbol: u8, path: &mut Vec<bool>) -> bool {
        match self {
            HuffmanNode::Leaf { symbol: s, .. } => *s == symbol,
            HuffmanNode::Internal { left, right, .. } => {
                path.push(false);
                if left.find_path(symbol, path) {
                    return true;
                }
                path.pop();

                path.push(true);
                if right.find_path(symbol, path) {
                    return true;
                }
                path.pop();
                false
            }
        }
    }
}

impl fmt::Display for HuffmanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HuffmanNode::Leaf { symbol, .. } => write!(f, "{}", symbol),
            HuffmanNode::Internal { left, right, .. } => write!(f, "({} {})", left, right),
        }
    }
}

/// A finished Huffman tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Seed a queue with one leaf per non-zero symbol, in ascending symbol order
    pub fn seed_queue(histogram: &Histogram) -> PriorityQueue<HuffmanNode> {
        let mut queue = PriorityQueue::with_capacity(histogram.distinct());
        for (symbol, count) in histogram.symbols() {
            queue.enqueue(HuffmanNode::leaf(symbol, count), count);
        }
        queue
    }

    /// Merge the two lowest-weight entries until a single root remains
    pub fn build(mut queue: PriorityQueue<HuffmanNode>) -> Result<Self> {
        loop {
            let first = queue.dequeue().ok_or(Error::EmptyInput)?;
            let Some(second) = queue.dequeue() else {
                return Ok(Self { root: first.item });
            };

            let merged = HuffmanNode::merge(first.item, second.item);
            let weight = merged.weight();
            queue.enqueue(merged, weight);
        }
    }

    pub fn from_histogram(histogram: &Histogram) -> Result<Self> {
        Self::build(Self::seed_queue(histogram))
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Total weight (number of symbols encoded by this tree)
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.count().0
    }

    pub fn internal_count(&self) -> usize {
        self.root.count().1
    }

    /// Length of the longest root-to-leaf path
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// True when the tree was built from exactly one distinct symbol
    pub fn is_single_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    /// Derive the code for one symbol by descending the tree.
    ///
    /// Prefer [`CodeTable`](super::codes::CodeTable) when encoding many
    /// symbols. A single-leaf tree gives its symbol the one-bit code `0`.
    pub fn resolve(&self, symbol: u8) -> Result<Code> {
        if let HuffmanNode::Leaf { symbol: s, .. } = self.root {
            return if s == symbol {
                Ok(Code::single_leaf())
            } else {
                Err(Error::SymbolNotFound(symbol))
            };
        }

        let mut path = Vec::new();
        if !self.root.find_path(symbol, &mut path) {
            return Err(Error::SymbolNotFound(symbol));
        }
        if path.len() > MAX_CODE_LENGTH {
            return Err(Error::CodeTooLong { symbol, length: path.len(), max: MAX_CODE_LENGTH });
        }

        Ok(path.iter().fold(Code::empty(), |code, &bit| code.push(bit)))
    }

    /// Parse the single-line text form back into a tree.
    ///
    /// The text carries no weights, so every node of the result has weight 0.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = TreeParser { input: text.as_bytes(), pos: 0, seen: [false; 256] };
        let root = parser.parse_node(0)?;
        if parser.pos != parser.input.len() {
            return Err(parser.error("trailing characters"));
        }
        Ok(Self { root })
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

/// Recursive-descent parser for the tree text form
struct TreeParser<'a> {
    input: &'a [u8],
    pos: usize,
    seen: [bool; 256],
}

impl TreeParser<'_> {
    fn parse_node(&mut self, depth: usize) -> Result<HuffmanNode> {
        // A valid tree over 256 symbols is at most 255 levels deep
        if depth > 255 {
            return Err(self.error("nesting too deep"));
        }

        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let left = self.parse_node(depth + 1)?;
                self.expect(b' ')?;
                let right = self.parse_node(depth + 1)?;
                self.expect(b')')?;
                Ok(HuffmanNode::merge(left, right))
            }
            Some(b'0'..=b'9') => self.parse_symbol(),
            Some(_) => Err(self.error("expected '(' or a symbol")),
            None => Err(self.error("unexpected end of tree")),
        }
    }

    fn parse_symbol(&mut self) -> Result<HuffmanNode> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            value = value * 10 + (digit - b'0') as u32;
            if value > 255 {
                return Err(Error::InvalidTree { offset: start, reason: "symbol out of range" });
            }
            self.pos += 1;
        }
        if self.pos - start > 1 && self.input[start] == b'0' {
            return Err(Error::InvalidTree { offset: start, reason: "symbol has a leading zero" });
        }

        let symbol = value as u8;
        if std::mem::replace(&mut self.seen[symbol as usize], true) {
            return Err(Error::InvalidTree { offset: start, reason: "duplicate symbol" });
        }
        Ok(HuffmanNode::leaf(symbol, 0))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else if byte == b' ' {
            Err(self.error("expected ' ' between subtrees"))
        } else {
            Err(self.error("expected ')'"))
        }
    }

    fn error(&self, reason: &'static str) -> Error {
        Error::InvalidTree { offset: self.pos, reason }
    }
}
