//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use ufo_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{UfoError, UfoResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> UfoResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> UfoResult<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> UfoResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, path: &Path) -> UfoResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;
        entries
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .map_err(|e| map_io_error(path, e, "read directory entry"))
            })
            .collect()
    }

    fn rename(&self, from: &Path, to: &Path) -> UfoResult<()> {
        if to.exists() {
            return Err(ApplicationError::filesystem(to, "rename target already exists").into());
        }
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "move directory"))
    }

    fn remove_dir_all(&self, path: &Path) -> UfoResult<()> {
        match std::fs::remove_dir_all(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other.map_err(|e| map_io_error(path, e, "remove directory")),
        }
    }

    fn empty_dir(&self, path: &Path) -> UfoResult<()> {
        for child in self.read_dir(path)? {
            let removed = if child.is_dir() {
                std::fs::remove_dir_all(&child)
            } else {
                std::fs::remove_file(&child)
            };
            removed.map_err(|e| map_io_error(&child, e, "remove entry"))?;
        }
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> UfoResult<usize> {
        self.create_dir_all(to)?;

        let mut copied = 0;
        for walk_entry in WalkDir::new(from).min_depth(1) {
            let walk_entry = walk_entry.map_err(|e| {
                ApplicationError::filesystem(from, format!("directory walk error: {e}"))
            })?;
            let rel = walk_entry.path().strip_prefix(from).map_err(|_| {
                ApplicationError::filesystem(walk_entry.path(), "escaped the copy source")
            })?;
            let dest = to.join(rel);

            if walk_entry.file_type().is_dir() {
                self.create_dir_all(&dest)?;
            } else if walk_entry.path().is_file() {
                std::fs::copy(walk_entry.path(), &dest)
                    .map_err(|e| map_io_error(&dest, e, "copy file"))?;
                copied += 1;
            } else {
                debug!(path = %walk_entry.path().display(), "Skipping special file");
            }
        }

        Ok(copied)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> UfoError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
