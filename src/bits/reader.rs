use crate::error::{Error, Result};

/// Bit-level reader for packed Huffman payloads
///
/// Reads bits MSB-first within each byte and stops at `bit_len`, so the
/// zero padding after the last code is never returned.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Index of the next bit to read
    position: u64,
    /// Number of meaningful bits in `data`
    bit_len: u64,
}

impl<'a> BitReader<'a> {
    /// Read every bit of `data` except the trailing `padding` bits
    pub fn new(data: &'a [u8], padding: u8) -> Result<Self> {
        if padding > 7 {
            return Err(Error::InvalidContainer(format!("padding {} exceeds 7 bits", padding)));
        }
        let total = data.len() as u64 * 8;
        if (padding as u64) > total {
            return Err(Error::InvalidContainer(format!(
                "padding {} with only {} payload bits",
                padding, total
            )));
        }
        Ok(Self { data, position: 0, bit_len: total - padding as u64 })
    }

    /// Next bit, or `None` once the meaningful bits are exhausted
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.position >= self.bit_len {
            return None;
        }
        let byte = self.data[(self.position / 8) as usize];
        let bit = (byte >> (7 - (self.position % 8))) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    /// Bits left before the padding
    pub fn remaining(&self) -> u64 {
        self.bit_len - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_msb_first() {
        let data = [0b1011_0001];
        let bits: Vec<bool> = BitReader::new(&data, 0).unwrap().collect();
        assert_eq!(bits, vec![true, false, true, true, false, false, false, true]);
    }

    #[test]
    fn test_stops_before_padding() {
        let data = [0xFF, 0b1110_0000];
        let mut reader = BitReader::new(&data, 5).unwrap();
        assert_eq!(reader.bit_len(), 11);
        assert_eq!(reader.by_ref().count(), 11);
        assert!(reader.is_empty());
        assert_eq!(reader.read_bit(), None);
    }

    #[test]
    fn test_invalid_padding() {
        assert!(BitReader::new(&[0x00], 8).is_err());
        assert!(BitReader::new(&[], 3).is_err());
        assert!(BitReader::new(&[], 0).unwrap().is_empty());
    }
}
