use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How patched content is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate and rewrite the file in place.
    #[default]
    Overwrite,
    /// Write to a tempfile in the same directory, fsync, then rename over the target.
    Atomic,
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, EditError> {
    let bytes = fs::read(path).map_err(|source| EditError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| EditError::Utf8 {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the full contents of `path` with `content`.
pub fn write_text(path: &Path, content: &str, mode: WriteMode) -> Result<(), EditError> {
    let result = match mode {
        WriteMode::Overwrite => fs::write(path, content),
        WriteMode::Atomic => atomic_write(path, content.as_bytes()),
    };
    result.map_err(|source| EditError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write lands or the original file is left as it was.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Same directory keeps the rename on one filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Target must already exist; its permissions carry over to the replacement
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
