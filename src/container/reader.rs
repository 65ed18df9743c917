use super::{Container, ContainerBody, LINE_BREAK};
use crate::error::{Error, Result};
use crate::huffman::HuffmanTree;
use std::io::Read;

use memchr::memmem;

/// Longest name-only container `is_container` accepts
const MAX_NAME_LEN: usize = 255;

impl Container {
    /// Parse container bytes.
    ///
    /// The first line is split at its last `.` into base name and extension;
    /// a line without a `.`, or whose only `.` leads it, is all name. Both
    /// parts are kept exactly as stored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let Some(name_end) = memmem::find(data, LINE_BREAK) else {
            // Name-only container from an empty source
            let (name, extension) = split_file_name(utf8(data, "file name")?);
            return Container::from_stored(name, extension, None);
        };

        let (name, extension) = split_file_name(utf8(&data[..name_end], "file name")?);
        let rest = &data[name_end + LINE_BREAK.len()..];

        let tree_end = memmem::find(rest, LINE_BREAK)
            .ok_or_else(|| Error::InvalidContainer("missing line break after tree".to_string()))?;
        let tree = utf8(&rest[..tree_end], "tree")?;
        let rest = &rest[tree_end + LINE_BREAK.len()..];

        let padding_end = memmem::find(rest, LINE_BREAK).ok_or_else(|| {
            Error::InvalidContainer("missing line break after padding".to_string())
        })?;
        let padding = parse_padding(&rest[..padding_end])?;
        let payload = rest[padding_end + LINE_BREAK.len()..].to_vec();

        let body = ContainerBody { tree: tree.to_string(), padding, payload };
        Container::from_stored(name, extension, Some(body))
    }
}

/// Does `reader` hold a well-formed container?
///
/// Reads the whole input (containers carry no magic bytes). A name-only
/// container must look like a file name: short, with an extension or a
/// leading dot.
pub fn is_container<R: Read>(reader: &mut R) -> Result<bool> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let Ok(container) = Container::parse(&data) else {
        return Ok(false);
    };

    Ok(match container.body() {
        Some(body) => HuffmanTree::parse(&body.tree).is_ok(),
        None => {
            data.len() <= MAX_NAME_LEN
                && !container.name().is_empty()
                && (container.extension().len() > 1 || is_dotfile(container.name()))
                && !container.original_file_name().contains(char::is_whitespace)
        }
    })
}

fn split_file_name(line: &str) -> (&str, &str) {
    match line.rfind('.') {
        Some(dot) if dot > 0 => line.split_at(dot),
        _ => (line, ""),
    }
}

fn is_dotfile(name: &str) -> bool {
    name.len() > 1 && name.starts_with('.')
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| Error::InvalidContainer(format!("{} is not UTF-8", what)))
}

fn parse_padding(line: &[u8]) -> Result<u8> {
    match line {
        [digit @ b'0'..=b'7'] => Ok(digit - b'0'),
        _ => Err(Error::InvalidContainer(format!(
            "padding must be a single digit 0-7, found {:?}",
            String::from_utf8_lossy(line)
        ))),
    }
}
