use crate::bits::{BitWriter, PackedBits};
use crate::container::{Container, ContainerBody};
use crate::error::{Error, Result};
use crate::huffman::{CodeTable, Histogram, HuffmanTree};
use crate::{CompressConfig, CompressStats};
use std::io::Read;

use tracing::debug;

/// Concatenate the code of every byte of `data`, in order, and pad to a byte
pub fn pack(data: &[u8], table: &CodeTable) -> Result<PackedBits> {
    let mut writer = BitWriter::with_capacity(data.len() / 2 + 1);

    for &byte in data {
        writer.write_code(table.code(byte)?);
    }

    Ok(writer.finish())
}

/// Static Huffman compressor producing MZIP containers
pub struct Compressor {
    config: CompressConfig,
}

impl Compressor {
    pub fn new(config: CompressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressConfig {
        &self.config
    }

    /// Buffer `reader` completely, then compress the buffered bytes
    pub fn compress<R: Read>(
        &self,
        name: &str,
        extension: &str,
        mut reader: R,
    ) -> Result<(Container, CompressStats)> {
        let mut data = Vec::with_capacity(self.config.buffer_size);
        reader.read_to_end(&mut data).map_err(Error::SourceUnreadable)?;
        self.compress_bytes(name, extension, &data)
    }

    /// Compress an in-memory source
    pub fn compress_bytes(
        &self,
        name: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<(Container, CompressStats)> {
        let histogram = self.count(data)?;
        debug!(bytes = data.len(), distinct = histogram.distinct(), "histogram built");

        let mut stats = CompressStats {
            input_bytes: data.len() as u64,
            distinct_symbols: histogram.distinct(),
            ..Default::default()
        };

        let tree = match HuffmanTree::from_histogram(&histogram) {
            Ok(tree) => tree,
            Err(Error::EmptyInput) => {
                debug!("empty source, writing name-only container");
                let container = Container::new(name, extension, None)?;
                stats.output_bytes = container.to_bytes().len() as u64;
                return Ok((container, stats));
            }
            Err(e) => return Err(e),
        };
        debug!(leaves = tree.leaf_count(), height = tree.height(), "tree built");

        let table = CodeTable::from_tree(&tree)?;
        let packed = pack(data, &table)?;
        debug_assert_eq!(packed.bit_len, table.encoded_bits(&histogram));
        debug!(bits = packed.bit_len, padding = packed.padding, "payload packed");

        stats.encoded_bits = packed.bit_len;
        stats.padding_bits = packed.padding;

        let body =
            ContainerBody { tree: tree.to_string(), padding: packed.padding, payload: packed.bytes };
        let container = Container::new(name, extension, Some(body))?;
        stats.output_bytes = container.to_bytes().len() as u64;

        if self.config.verify {
            let decoded = super::decoder::decompress(&container)?;
            if decoded != data {
                return Err(Error::VerifyMismatch { expected: data.len(), found: decoded.len() });
            }
            debug!("round trip verified");
        }

        Ok((container, stats))
    }

    fn count(&self, data: &[u8]) -> Result<Histogram> {
        let threads = self.config.effective_threads();
        if threads > 1 && data.len() >= self.config.parallel_threshold {
            debug!(threads, "counting in parallel");
            Histogram::from_bytes_parallel(data, threads)
        } else {
            Ok(Histogram::from_bytes(data))
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CompressConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_pack_two_symbols() {
        let tree = HuffmanTree::from_histogram(&Histogram::from_bytes(b"aaab")).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        let packed = pack(b"aaab", &table).unwrap();
        assert_eq!(packed.bytes, vec![0b1110_0000]);
        assert_eq!(packed.padding, 4);
        assert_eq!(packed.bit_len, 4);
    }

    #[test]
    fn test_pack_unknown_symbol() {
        let tree = HuffmanTree::from_histogram(&Histogram::from_bytes(b"ab")).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        assert!(matches!(pack(b"abc", &table), Err(Error::SymbolNotFound(b'c'))));
    }

    #[test]
    fn test_compress_scenario_a() {
        let compressor = Compressor::default();
        let (container, stats) = compressor.compress_bytes("a", ".txt", b"aaab").unwrap();
        assert_eq!(container.to_bytes(), b"a.TXT\r\n(98 97)\r\n4\r\n\xE0".to_vec());
        assert_eq!(stats.input_bytes, 4);
        assert_eq!(stats.distinct_symbols, 2);
        assert_eq!(stats.encoded_bits, 4);
        assert_eq!(stats.padding_bits, 4);
        assert_eq!(stats.output_bytes, container.to_bytes().len() as u64);
    }

    #[test]
    fn test_compress_empty() {
        let (container, stats) = Compressor::default().compress_bytes("e", ".log", b"").unwrap();
        assert_eq!(container.to_bytes(), b"e.LOG".to_vec());
        assert_eq!(stats.output_bytes, 5);
        assert_eq!(stats.encoded_bits, 0);
    }

    #[test]
    fn test_compress_single_symbol() {
        let data = vec![b'x'; 20];
        let (container, stats) = Compressor::default().compress_bytes("x", "", &data).unwrap();
        let body = container.body().unwrap();
        assert_eq!(body.tree, "120");
        assert_eq!(stats.encoded_bits, 20);
        assert_eq!(body.padding, 4);
        assert_eq!(body.payload, vec![0, 0, 0]);
    }

    #[test]
    fn test_compress_reader() {
        let data = b"compress me from a reader".to_vec();
        let compressor = Compressor::default();
        let (from_reader, _) = compressor.compress("r", ".txt", Cursor::new(&data)).unwrap();
        let (from_bytes, _) = compressor.compress_bytes("r", ".txt", &data).unwrap();
        assert_eq!(from_reader, from_bytes);
    }

    #[test]
    fn test_parallel_count_same_container() {
        let data: Vec<u8> = (0..300_000u32).map(|i| (i % 7 + i % 13) as u8).collect();
        let sequential = Compressor::default();
        let parallel = Compressor::new(CompressConfig {
            num_threads: 4,
            parallel_threshold: 1024,
            ..Default::default()
        });
        assert_eq!(sequential.config().num_threads, 1);
        assert_eq!(parallel.config().effective_threads(), 4);

        let (a, _) = sequential.compress_bytes("p", ".bin", &data).unwrap();
        let (b, _) = parallel.compress_bytes("p", ".bin", &data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_verify() {
        let compressor = Compressor::new(CompressConfig { verify: true, ..Default::default() });
        let (_, stats) = compressor.compress_bytes("v", ".txt", b"verify this text").unwrap();
        assert_eq!(stats.input_bytes, 16);
    }
}
