use super::Container;
use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Writes a [`Container`] to a sink or to a file path.
///
/// The layout is serialized in memory first, so a failed write never leaves a
/// half-written header behind the payload.
pub struct ContainerWriter<W: Write> {
    writer: W,
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the complete container; returns the number of bytes written
    pub fn write_container(&mut self, container: &Container) -> Result<u64> {
        let bytes = container.to_bytes();
        self.writer.write_all(&bytes)?;
        Ok(bytes.len() as u64)
    }

    /// Flush and finish writing
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Get a reference to the inner writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl ContainerWriter<fs::File> {
    /// Atomically write `container` to `path`; see [`write_atomic`]
    pub fn persist(container: &Container, path: &Path) -> Result<u64> {
        let bytes = container.to_bytes();
        write_atomic(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "container written");
        Ok(bytes.len() as u64)
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The temporary file is renamed over `path` only after everything was
/// written and synced; on failure it is removed and `path` is untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_failure =
        |source: std::io::Error| Error::IoFailure { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(io_failure)?;
    debug!(temp = %temp.path().display(), target = %path.display(), "writing temporary file");

    temp.write_all(bytes).map_err(io_failure)?;
    temp.as_file().sync_all().map_err(io_failure)?;
    temp.persist(path).map_err(|e| io_failure(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerBody;

    fn sample() -> Container {
        let body = ContainerBody { tree: "(98 97)".to_string(), padding: 4, payload: vec![0xE0] };
        Container::new("sample", ".txt", Some(body)).unwrap()
    }

    #[test]
    fn test_write_to_sink() {
        let mut output = Vec::new();
        let mut writer = ContainerWriter::new(&mut output);
        let written = writer.write_container(&sample()).unwrap();
        assert_eq!(writer.get_ref().len() as u64, written);
        writer.finish().unwrap();

        assert_eq!(written as usize, output.len());
        assert!(output.starts_with(b"sample.TXT\r\n"));
    }

    #[test]
    fn test_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.MZIP");

        let written = ContainerWriter::persist(&sample(), &path).unwrap();

        let on_disk = fs::read(&path).unwrap();
        assert_eq!(on_disk.len() as u64, written);
        assert_eq!(on_disk, sample().to_bytes());
        // Only the finished container remains
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_persist_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.MZIP");
        fs::write(&path, b"stale").unwrap();

        ContainerWriter::persist(&sample(), &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), sample().to_bytes());
    }

    #[test]
    fn test_persist_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sample.MZIP");

        let err = ContainerWriter::persist(&sample(), &path).unwrap_err();
        assert!(matches!(err, Error::IoFailure { .. }));
        assert!(!path.exists());
    }
}
