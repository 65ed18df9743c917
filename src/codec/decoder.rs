use crate::bits::BitReader;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::huffman::{HuffmanNode, HuffmanTree};

use tracing::debug;

/// Decode a container back into the original bytes.
///
/// A name-only container decodes to an empty buffer.
pub fn decompress(container: &Container) -> Result<Vec<u8>> {
    let Some(body) = container.body() else {
        return Ok(Vec::new());
    };

    let tree = HuffmanTree::parse(&body.tree)?;
    let bits = BitReader::new(&body.payload, body.padding)?;
    debug!(leaves = tree.leaf_count(), bits = bits.bit_len(), "decoding payload");

    decode_bits(&tree, bits)
}

/// Walk `tree` once per symbol, following one bit per internal node
pub fn decode_bits(tree: &HuffmanTree, mut bits: BitReader<'_>) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(bits.remaining() as usize / 2);

    // Single-leaf tree: every bit stands for one occurrence
    if let HuffmanNode::Leaf { symbol, .. } = tree.root() {
        output.resize(bits.remaining() as usize, *symbol);
        return Ok(output);
    }

    let root = tree.root();
    let mut node = root;
    while let Some(bit) = bits.read_bit() {
        let HuffmanNode::Internal { left, right, .. } = node else {
            return Err(Error::Internal("decoder positioned on a leaf".to_string()));
        };
        node = if bit { &**right } else { &**left };

        if let HuffmanNode::Leaf { symbol, .. } = node {
            output.push(*symbol);
            node = root;
        }
    }

    if !std::ptr::eq(node, root) {
        return Err(Error::TruncatedPayload);
    }
    Ok(output)
}
