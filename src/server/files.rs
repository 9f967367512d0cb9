//! File storage collaborators used by the `/files/` route.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a [`FileStore`].
#[derive(Debug, Error)]
pub enum FileError {
    /// The named file does not exist or cannot be read.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The write could not be completed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Blocking read/write access to named files.
///
/// Names are passed through exactly as they appear in the request path.
/// Implementations are responsible for any sanitisation they need.
pub trait FileStore: Send + Sync {
    /// Read the whole contents of `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>, FileError>;

    /// Write `contents` to `name`, creating parent directories as needed.
    fn write(&self, name: &str, contents: &[u8]) -> Result<(), FileError>;
}

/// A [`FileStore`] rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for DirectoryStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, FileError> {
        fs::read(self.root.join(name)).map_err(|_| FileError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), FileError> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}
