//! The MZIP container.
//!
//! Layout, with `\r\n` between sections:
//!
//! ```text
//! <base name><EXTENSION>\r\n
//! <tree>\r\n
//! <padding digits>\r\n
//! <payload bytes>
//! ```
//!
//! An empty source produces only the first line, without its line break.

pub mod reader;
pub mod writer;

pub use reader::is_container;
pub use writer::{write_atomic, ContainerWriter};

use crate::error::{Error, Result};

/// File extension of written containers
pub const CONTAINER_EXTENSION: &str = "MZIP";

/// Section delimiter
pub const LINE_BREAK: &[u8; 2] = b"\r\n";

/// Tree, padding and payload of a non-empty source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerBody {
    /// Serialized Huffman tree
    pub tree: String,
    /// Zero bits appended to the last payload byte (0-7)
    pub padding: u8,
    /// Packed code bits
    pub payload: Vec<u8>,
}

/// A complete compressed file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    name: String,
    extension: String,
    body: Option<ContainerBody>,
}

impl Container {
    /// Build a container; the extension is stored uppercased.
    ///
    /// `body` is `None` for an empty source.
    pub fn new(name: &str, extension: &str, body: Option<ContainerBody>) -> Result<Self> {
        Self::from_stored(name, &extension.to_uppercase(), body)
    }

    /// Build a container from the name and extension exactly as stored
    pub(crate) fn from_stored(
        name: &str,
        extension: &str,
        body: Option<ContainerBody>,
    ) -> Result<Self> {
        for part in [name, extension] {
            if part.contains(['\r', '\n']) {
                return Err(Error::InvalidName(part.to_string()));
            }
        }
        if let Some(body) = &body {
            validate_body(body)?;
        }

        Ok(Self { name: name.to_string(), extension: extension.to_string(), body })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn body(&self) -> Option<&ContainerBody> {
        self.body.as_ref()
    }

    /// Name and extension as stored on the first line
    pub fn original_file_name(&self) -> String {
        format!("{}{}", self.name, self.extension)
    }

    /// Name of the container file itself, e.g. `report.MZIP`
    pub fn container_file_name(&self) -> String {
        format!("{}.{}", self.name, CONTAINER_EXTENSION)
    }

    /// Serialize the whole container into memory
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload_len = self.body.as_ref().map_or(0, |b| b.tree.len() + b.payload.len() + 8);
        let mut out = Vec::with_capacity(self.name.len() + self.extension.len() + payload_len);

        out.extend_from_slice(self.name.as_bytes());
        out.extend_from_slice(self.extension.as_bytes());

        if let Some(body) = &self.body {
            out.extend_from_slice(LINE_BREAK);
            out.extend_from_slice(body.tree.as_bytes());
            out.extend_from_slice(LINE_BREAK);
            out.extend_from_slice(body.padding.to_string().as_bytes());
            out.extend_from_slice(LINE_BREAK);
            out.extend_from_slice(&body.payload);
        }

        out
    }
}

fn validate_body(body: &ContainerBody) -> Result<()> {
    if body.padding > 7 {
        return Err(Error::InvalidContainer(format!("padding {} exceeds 7 bits", body.padding)));
    }
    if body.payload.is_empty() {
        return Err(Error::InvalidContainer("tree present but payload is empty".to_string()));
    }
    if body.tree.is_empty() || body.tree.contains(['\r', '\n']) {
        return Err(Error::InvalidContainer("tree must be a single non-empty line".to_string()));
    }
    Ok(())
}
