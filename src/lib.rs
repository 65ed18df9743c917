//! Static Huffman compression into the MZIP container.
//!
//! Pipeline: bytes -> [`Histogram`] -> [`PriorityQueue`] -> [`HuffmanTree`] ->
//! ([`CodeTable`], tree text) -> packed bits -> [`Container`].

pub mod bits;
pub mod codec;
pub mod container;
pub mod error;
pub mod huffman;

pub use codec::{decompress, Compressor};
pub use container::{is_container, Container, ContainerBody, ContainerWriter};
pub use error::{Error, Result};
pub use huffman::{Code, CodeTable, Histogram, HuffmanNode, HuffmanTree, PriorityQueue};

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;

/// Configuration for compression
#[derive(Clone, Debug)]
pub struct CompressConfig {
    /// Threads for histogram counting (0 = auto, 1 = single-threaded)
    pub num_threads: usize,
    /// Inputs smaller than this are always counted on one thread
    pub parallel_threshold: usize,
    /// Files at least this large are memory-mapped instead of read
    pub mmap_threshold: u64,
    /// Initial buffer size when reading a source stream
    pub buffer_size: usize,
    /// Decode the finished container and compare it with the source
    pub verify: bool,
}

impl CompressConfig {
    /// Worker count after resolving 0 (auto) and clamping to 1..=32
    pub fn effective_threads(&self) -> usize {
        match self.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n.clamp(1, 32),
        }
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            num_threads: 1,
            parallel_threshold: 1024 * 1024,
            mmap_threshold: 64 * 1024,
            buffer_size: 128 * 1024,
            verify: false,
        }
    }
}

/// Statistics from a compression run
#[derive(Clone, Debug, Default)]
pub struct CompressStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Symbols with a non-zero count (leaves of the tree)
    pub distinct_symbols: usize,
    /// Code bits before padding
    pub encoded_bits: u64,
    /// Zero bits appended to the last payload byte
    pub padding_bits: u8,
}

impl CompressStats {
    /// Output size relative to input size (0.0 for an empty input)
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Open a source file, reporting any failure as [`Error::SourceUnreadable`].
///
/// Retrying (for example re-prompting for another name) is up to the caller.
pub fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(Error::SourceUnreadable)
}

/// Split a path into the base name and the extension stored in a container.
///
/// The extension keeps its leading dot: `notes.txt` -> (`notes`, `.txt`).
pub fn split_source_name(path: &Path) -> Result<(String, String)> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidName(path.display().to_string()))?;
    let extension = path.extension().and_then(|s| s.to_str()).map(|e| format!(".{}", e));

    Ok((stem.to_string(), extension.unwrap_or_default()))
}

/// Compress `input` into `<output_dir>/<base name>.MZIP`.
///
/// `output_dir` defaults to the directory holding `input`. Returns the
/// container path and run statistics.
pub fn compress_file(
    input: &Path,
    output_dir: Option<&Path>,
    config: &CompressConfig,
) -> Result<(PathBuf, CompressStats)> {
    let (name, extension) = split_source_name(input)?;
    let mut file = open_source(input)?;
    let len = file.metadata().map_err(Error::SourceUnreadable)?.len();

    let compressor = Compressor::new(config.clone());
    let (container, stats) = if len >= config.mmap_threshold {
        debug!(path = %input.display(), len, "memory-mapping source");
        // SAFETY: the mapping is read-only and dropped before this function
        // returns; concurrent truncation of the source by another process is
        // outside what this tool guards against.
        let mmap = unsafe { Mmap::map(&file) }.map_err(Error::SourceUnreadable)?;
        compressor.compress_bytes(&name, &extension, &mmap)?
    } else {
        let mut data = Vec::with_capacity(len as usize);
        file.read_to_end(&mut data).map_err(Error::SourceUnreadable)?;
        compressor.compress_bytes(&name, &extension, &data)?
    };

    let dir = output_dir.or_else(|| input.parent()).unwrap_or_else(|| Path::new(""));
    let output = dir.join(container.container_file_name());
    ContainerWriter::persist(&container, &output)?;

    Ok((output, stats))
}

/// Decompress the container at `input` into `<output_dir>/<name><EXTENSION>`.
///
/// Returns the output path and the number of bytes written.
pub fn decompress_file(input: &Path, output_dir: Option<&Path>) -> Result<(PathBuf, u64)> {
    let mut data = Vec::new();
    open_source(input)?.read_to_end(&mut data).map_err(Error::SourceUnreadable)?;

    let container = Container::parse(&data)?;
    let file_name = container.original_file_name();
    if Path::new(&file_name).file_name().and_then(|n| n.to_str()) != Some(file_name.as_str()) {
        return Err(Error::InvalidContainer(format!("unsafe output file name {:?}", file_name)));
    }

    let decoded = decompress(&container)?;
    let dir = output_dir.or_else(|| input.parent()).unwrap_or_else(|| Path::new(""));
    let output = dir.join(&file_name);
    container::write_atomic(&output, &decoded)?;

    Ok((output, decoded.len() as u64))
}
