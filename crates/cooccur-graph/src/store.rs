//! Text storage capability used for ingestion input and snapshots.
//!
//! The graph never touches `std::fs` directly; it goes through a
//! [`TextStore`], so tests (and embedders) can swap the filesystem for
//! something else.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub trait TextStore {
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file. Reading is all-or-nothing.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Replace the file content with `contents`.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Local filesystem store.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl TextStore for FsStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)
    }
}

/// In-memory store. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Rc<RefCell<BTreeMap<PathBuf, String>>>,
    read_only: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Make every subsequent write fail with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }
}

impl TextStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not in memory store", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.read_only.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory store is read-only",
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
