pub mod reader;
pub mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;

/// Zero bits needed to bring `bit_len` up to a whole number of bytes (0-7)
#[inline]
pub fn padding_for(bit_len: u64) -> u8 {
    ((8 - bit_len % 8) % 8) as u8
}

/// A packed bit sequence, zero padded to a byte boundary
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedBits {
    /// Packed bytes, most significant bit first
    pub bytes: Vec<u8>,
    /// Number of zero bits appended after the last code bit (0-7)
    pub padding: u8,
    /// Number of meaningful bits (excluding padding)
    pub bit_len: u64,
}
