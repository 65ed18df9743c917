use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source unreadable: {0}")]
    SourceUnreadable(#[source] std::io::Error),

    #[error("Failed to write {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Tree construction errors
    #[error("No symbols to build a Huffman tree from (empty input)")]
    EmptyInput,

    #[error("Symbol {0} has no leaf in the Huffman tree")]
    SymbolNotFound(u8),

    #[error("Code for symbol {symbol} is {length} bits long (max {max})")]
    CodeTooLong { symbol: u8, length: usize, max: usize },

    // Container errors
    #[error("Invalid file name component {0:?}: must not contain CR or LF")]
    InvalidName(String),

    #[error("Invalid tree description at offset {offset}: {reason}")]
    InvalidTree { offset: usize, reason: &'static str },

    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Payload ended in the middle of a code")]
    TruncatedPayload,

    #[error("Verification failed: decoded {found} bytes differ from the {expected}-byte source")]
    VerifyMismatch { expected: usize, found: usize },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
