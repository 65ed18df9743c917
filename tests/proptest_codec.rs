//! Property-based tests for the Huffman codec.
//!
//! These tests check properties that must hold for any input:
//! - tree shape matches the histogram (leaves, internal nodes, weight)
//! - codes are prefix-free and satisfy Kraft's equality
//! - packed bits read back exactly, padding excluded
//! - compressing then decompressing returns the input
//!
//! Run with: cargo test --test proptest_codec

use proptest::prelude::*;

use mzip::bits::{padding_for, BitReader, BitWriter};
use mzip::{decompress, CodeTable, Compressor, Container, Histogram, HuffmanTree};

/// Strategy for non-empty byte inputs, either over all bytes or a small alphabet.
fn input_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..2048),
        prop::collection::vec(prop::sample::select(b"acgtn\r\n".to_vec()), 1..2048),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: a tree over k distinct symbols has k leaves and k - 1 internal nodes.
    #[test]
    fn prop_tree_node_counts(data in input_strategy()) {
        let histogram = Histogram::from_bytes(&data);
        let tree = HuffmanTree::from_histogram(&histogram).unwrap();

        prop_assert_eq!(tree.leaf_count(), histogram.distinct());
        prop_assert_eq!(tree.internal_count(), histogram.distinct() - 1);
        prop_assert_eq!(tree.weight(), data.len() as u64);
    }

    /// Property: no code is a prefix of another, and the lengths fill the code space.
    #[test]
    fn prop_codes_prefix_free(data in input_strategy()) {
        let histogram = Histogram::from_bytes(&data);
        prop_assume!(histogram.distinct() >= 2);

        let table = CodeTable::from_tree(&HuffmanTree::from_histogram(&histogram).unwrap()).unwrap();
        let codes: Vec<_> = table.iter().collect();
        prop_assert_eq!(codes.len(), histogram.distinct());

        for (i, (_, a)) in codes.iter().enumerate() {
            for (j, (_, b)) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }

        let kraft: f64 = codes.iter().map(|(_, c)| 0.5f64.powi(c.len() as i32)).sum();
        prop_assert!((kraft - 1.0).abs() < 1e-9, "kraft sum {}", kraft);
    }

    /// Property: Huffman coding never needs more than 8 bits per byte.
    #[test]
    fn prop_never_worse_than_fixed_width(data in input_strategy()) {
        let histogram = Histogram::from_bytes(&data);
        let table = CodeTable::from_tree(&HuffmanTree::from_histogram(&histogram).unwrap()).unwrap();

        prop_assert!(table.encoded_bits(&histogram) <= 8 * data.len() as u64);
    }

    /// Property: bits written MSB-first are read back unchanged, padding excluded.
    #[test]
    fn prop_bits_roundtrip(bits in prop::collection::vec(any::<bool>(), 1..512)) {
        let mut writer = BitWriter::new();
        for &bit in &bits {
            writer.write_bit(bit);
        }
        let packed = writer.finish();

        prop_assert_eq!(packed.bit_len, bits.len() as u64);
        prop_assert_eq!(packed.padding, padding_for(bits.len() as u64));
        prop_assert!(packed.padding <= 7);

        let read: Vec<bool> = BitReader::new(&packed.bytes, packed.padding).unwrap().collect();
        prop_assert_eq!(read, bits);
    }

    /// Property: parallel counting matches sequential counting.
    #[test]
    fn prop_parallel_histogram(data in input_strategy(), threads in 1usize..9) {
        let parallel = Histogram::from_bytes_parallel(&data, threads).unwrap();
        prop_assert_eq!(parallel, Histogram::from_bytes(&data));
    }

    /// Property: serialized trees parse back to the same text.
    #[test]
    fn prop_tree_text_roundtrip(data in input_strategy()) {
        let tree = HuffmanTree::from_histogram(&Histogram::from_bytes(&data)).unwrap();
        let text = tree.to_string();
        prop_assert_eq!(HuffmanTree::parse(&text).unwrap().to_string(), text);
    }

    /// Property: decompress(parse(compress(x))) == x.
    #[test]
    fn prop_compress_roundtrip(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let (container, stats) = Compressor::default().compress_bytes("p", ".bin", &data).unwrap();
        let bytes = container.to_bytes();
        prop_assert_eq!(stats.output_bytes, bytes.len() as u64);

        let parsed = Container::parse(&bytes).unwrap();
        prop_assert_eq!(decompress(&parsed).unwrap(), data);
    }
}
