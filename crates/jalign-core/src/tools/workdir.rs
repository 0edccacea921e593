//! Scoped working directories for external tool invocations.
//!
//! Each invocation gets its own temporary directory and passes it to the
//! subprocess via `Command::current_dir`; the process-wide working
//! directory is never touched.  The directory and its contents are removed
//! when the handle drops, on every exit path.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::errors::JalignResult;

/// An isolated working directory for one tool invocation.
pub struct Workdir {
    dir: TempDir,
}

impl Workdir {
    pub fn new() -> JalignResult<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file under the directory and return its full path.
    pub fn write_file(&self, name: &str, contents: &[u8]) -> JalignResult<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_file(&self, name: &str) -> JalignResult<Vec<u8>> {
        Ok(std::fs::read(self.dir.path().join(name))?)
    }

    pub fn read_to_string(&self, name: &str) -> JalignResult<String> {
        Ok(std::fs::read_to_string(self.dir.path().join(name))?)
    }
}
