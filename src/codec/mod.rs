pub mod decoder;
pub mod encoder;

pub use decoder::decompress;
pub use encoder::{pack, Compressor};
