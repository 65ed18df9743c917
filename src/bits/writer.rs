use super::{padding_for, PackedBits};
use crate::huffman::Code;

/// Bit-level writer for Huffman payloads
///
/// Writes bits MSB-first: the first bit written lands in bit 7 of the
/// first output byte.
pub struct BitWriter {
    /// Completed output bytes
    output: Vec<u8>,
    /// Current byte being built
    current_byte: u8,
    /// Bits written to current byte (0-7)
    bits_in_byte: u8,
    /// Total bits written
    bit_len: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), current_byte: 0, bits_in_byte: 0, bit_len: 0 }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.current_byte |= (bit as u8) << (7 - self.bits_in_byte);
        self.bits_in_byte += 1;
        self.bit_len += 1;

        if self.bits_in_byte == 8 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Write the low `n` bits (0-64) of `value`, most significant first
    pub fn write_bits(&mut self, value: u64, n: u8) {
        debug_assert!(n <= 64);

        let mut remaining = n;
        while remaining > 0 {
            let space = 8 - self.bits_in_byte;
            let take = remaining.min(space);

            // Top `take` bits of the remaining field
            let chunk = ((value >> (remaining - take)) & ((1u64 << take) - 1)) as u8;
            self.current_byte |= chunk << (space - take);

            self.bits_in_byte += take;
            self.bit_len += take as u64;
            remaining -= take;

            if self.bits_in_byte == 8 {
                self.output.push(self.current_byte);
                self.current_byte = 0;
                self.bits_in_byte = 0;
            }
        }
    }

    /// Write a Huffman code, first path step first
    #[inline]
    pub fn write_code(&mut self, code: Code) {
        self.write_bits(code.bits(), code.len());
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Pad with zero bits to a byte boundary and return the packed result
    pub fn finish(mut self) -> PackedBits {
        let padding = padding_for(self.bit_len);
        if self.bits_in_byte > 0 {
            self.output.push(self.current_byte);
        }
        PackedBits { bytes: self.output, padding, bit_len: self.bit_len }
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
