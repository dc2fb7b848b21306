//! Filesystem abstraction so the record store can be exercised without disk.

use std::io::{self, Read, Write};
use std::path::Path;

pub mod disk;

pub use disk::DiskFilesystem;

/// Capability set the record store needs from a filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Creates the file at `path` (and any missing parent directories),
    /// returning a handle opened for reading and writing.
    fn create(&self, path: &Path) -> io::Result<Box<dyn File>>;

    /// Opens an existing file for reading and writing. Fails if the file
    /// does not exist.
    fn open(&self, path: &Path) -> io::Result<Box<dyn File>>;

    /// Reports whether `path` exists. Any failure while probing is reported
    /// as `false`.
    fn exists(&self, path: &Path) -> bool;
}

/// A handle that can be read, written and truncated. The handle is closed
/// when dropped.
pub trait File: Read + Write + Send {
    /// Discards the current contents and rewinds to the start.
    fn truncate(&mut self) -> io::Result<()>;
}
