use std::fmt;

use super::frequency::{Histogram, NUM_SYMBOLS};
use super::tree::{HuffmanNode, HuffmanTree};
use crate::error::{Error, Result};

/// Longest code a [`Code`] can hold
pub const MAX_CODE_LENGTH: usize = 64;

/// A root-to-leaf path, left = 0 and right = 1.
///
/// The path is stored right-aligned in `bits` with the first step as the
/// most significant of the `len` used bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    pub fn new(bits: u64, len: u8) -> Self {
        debug_assert!(len as usize <= MAX_CODE_LENGTH);
        debug_assert!(len == 64 || bits >> len == 0);
        Self { bits, len }
    }

    pub fn empty() -> Self {
        Self { bits: 0, len: 0 }
    }

    /// Code given to the only symbol of a single-leaf tree
    pub fn single_leaf() -> Self {
        Self { bits: 0, len: 1 }
    }

    /// Extend the path by one step
    pub fn push(self, bit: bool) -> Self {
        Self { bits: (self.bits << 1) | bit as u64, len: self.len + 1 }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at path position `i` (0 = first step from the root)
    pub fn bit(&self, i: u8) -> bool {
        debug_assert!(i < self.len);
        (self.bits >> (self.len - 1 - i)) & 1 == 1
    }

    /// True when `self` is a (non-strict) prefix of `other`
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len).all(|i| self.bit(i) == other.bit(i))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Complete symbol -> code mapping, built with one traversal of the tree
#[derive(Clone, Debug)]
pub struct CodeTable {
    codes: [Option<Code>; NUM_SYMBOLS],
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = [None; NUM_SYMBOLS];

        match tree.root() {
            HuffmanNode::Leaf { symbol, .. } => codes[*symbol as usize] = Some(Code::single_leaf()),
            root => assign(root, Code::empty(), &mut codes)?,
        }

        Ok(Self { codes })
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Code for `symbol`; a miss means the symbol was never counted
    pub fn code(&self, symbol: u8) -> Result<Code> {
        self.get(symbol).ok_or(Error::SymbolNotFound(symbol))
    }

    /// `(symbol, code)` pairs in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes.iter().enumerate().filter_map(|(s, c)| c.map(|c| (s as u8, c)))
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bits needed to encode `histogram`: sum of count x code length
    pub fn encoded_bits(&self, histogram: &Histogram) -> u64 {
        histogram
            .symbols()
            .map(|(s, count)| count * self.get(s).map_or(0, |c| c.len() as u64))
            .sum()
    }
}

fn assign(node: &HuffmanNode, code: Code, codes: &mut [Option<Code>; NUM_SYMBOLS]) -> Result<()> {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            codes[*symbol as usize] = Some(code);
            Ok(())
        }
        HuffmanNode::Internal { left, right, .. } => {
            if code.len() as usize == MAX_CODE_LENGTH {
                let symbol = first_symbol(node);
                return Err(Error::CodeTooLong {
                    symbol,
                    length: code.len() as usize + 1,
                    max: MAX_CODE_LENGTH,
                });
            }
            assign(left, code.push(false), codes)?;
            assign(right, code.push(true), codes)
        }
    }
}

fn first_symbol(node: &HuffmanNode) -> u8 {
    match node {
        HuffmanNode::Leaf { symbol, .. } => *symbol,
        HuffmanNode::Internal { left, .. } => first_symbol(left),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> (Histogram, HuffmanTree, CodeTable) {
        let histogram = Histogram::from_bytes(data);
        let tree = HuffmanTree::from_histogram(&histogram).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        (histogram, tree, table)
    }

    #[test]
    fn test_code_bits() {
        let code = Code::empty().push(true).push(false).push(true);
        assert_eq!(code.len(), 3);
        assert_eq!(code.bits(), 0b101);
        assert_eq!(code.to_string(), "101");
        assert!(code.bit(0));
        assert!(!code.bit(1));
    }

    #[test]
    fn test_prefix() {
        let short = Code::new(0b10, 2);
        let long = Code::new(0b101, 3);
        let other = Code::new(0b111, 3);
        assert!(short.is_prefix_of(&long));
        assert!(!short.is_prefix_of(&other));
        assert!(!long.is_prefix_of(&short));
    }

    #[test]
    fn test_two_symbol_table() {
        let (histogram, _, table) = table_for(b"aaab");
        assert_eq!(table.len(), 2);
        assert_eq!(table.code(b'b').unwrap().to_string(), "0");
        assert_eq!(table.code(b'a').unwrap().to_string(), "1");
        assert_eq!(table.encoded_bits(&histogram), 4);
    }

    #[test]
    fn test_single_symbol_policy() {
        let (histogram, _, table) = table_for(&[7u8; 10]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.code(7).unwrap(), Code::single_leaf());
        assert_eq!(table.encoded_bits(&histogram), 10);
    }

    #[test]
    fn test_missing_symbol() {
        let (_, _, table) = table_for(b"abc");
        assert!(matches!(table.code(b'z'), Err(Error::SymbolNotFound(b'z'))));
        assert!(table.get(b'z').is_none());
    }

    #[test]
    fn test_table_matches_descent() {
        let (_, tree, table) = table_for(b"she sells sea shells by the sea shore");
        for (symbol, code) in table.iter() {
            assert_eq!(tree.resolve(symbol).unwrap(), code);
        }
    }

    #[test]
    fn test_prefix_free() {
        let data: Vec<u8> = (0..5000u32).map(|i| ((i * i) % 97) as u8).collect();
        let (_, _, table) = table_for(&data);
        let codes: Vec<Code> = table.iter().map(|(_, c)| c).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_frequent_symbols_shorter() {
        let (_, _, table) = table_for(b"eeeeeeeeeeeeeeeetttttaaoi");
        let e = table.code(b'e').unwrap().len();
        for symbol in [b't', b'a', b'o', b'i'] {
            assert!(e <= table.code(symbol).unwrap().len());
        }
    }
}
