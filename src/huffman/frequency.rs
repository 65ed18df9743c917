use crate::error::{Error, Result};
use std::io::{ErrorKind, Read};

/// Number of distinct byte values
pub const NUM_SYMBOLS: usize = 256;

/// Byte-value histogram for static Huffman code generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; NUM_SYMBOLS],
}

impl Histogram {
    pub fn new() -> Self {
        Self { counts: [0; NUM_SYMBOLS] }
    }

    /// Count every byte of an in-memory buffer
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut histogram = Self::new();
        histogram.add_bytes(data);
        histogram
    }

    /// Consume `reader` to completion and count its bytes.
    ///
    /// An empty stream yields an all-zero histogram.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut histogram = Self::new();
        let mut buf = [0u8; 64 * 1024];

        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => histogram.add_bytes(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::SourceUnreadable(e)),
            }
        }

        Ok(histogram)
    }

    /// Count `data` on up to `threads` scoped workers.
    ///
    /// Each worker counts one contiguous chunk; all partial histograms are
    /// summed before returning, so the result equals `from_bytes(data)`.
    pub fn from_bytes_parallel(data: &[u8], threads: usize) -> Result<Self> {
        let threads = threads.max(1);
        if threads == 1 || data.len() < threads {
            return Ok(Self::from_bytes(data));
        }

        let chunk_size = (data.len() + threads - 1) / threads;

        let partials = crossbeam::scope(|scope| {
            let handles: Vec<_> = data
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move |_| Self::from_bytes(chunk)))
                .collect();

            handles.into_iter().map(|h| h.join()).collect::<std::result::Result<Vec<_>, _>>()
        })
        .map_err(|_| Error::Internal("Histogram worker panicked".to_string()))?
        .map_err(|_| Error::Internal("Histogram worker panicked".to_string()))?;

        let mut histogram = Self::new();
        for partial in &partials {
            histogram.merge(partial);
        }
        Ok(histogram)
    }

    #[inline]
    pub fn add_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    /// Add another histogram's counts into this one
    pub fn merge(&mut self, other: &Histogram) {
        for (count, &extra) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += extra;
        }
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of symbols counted
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a non-zero count
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Non-zero `(symbol, count)` pairs in ascending symbol order
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().enumerate().filter(|(_, &c)| c > 0).map(|(s, &c)| (s as u8, c))
    }

    pub fn as_slice(&self) -> &[u64; NUM_SYMBOLS] {
        &self.counts
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}
