use crate::storage::fs::{File, Filesystem};
use std::fs::{self, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

/// The native filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFilesystem;

impl DiskFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for DiskFilesystem {
    fn create(&self, path: &Path) -> io::Result<Box<dyn File>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Box::new(file))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn File>> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Box::new(file))
    }

    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }
}

impl File for fs::File {
    fn truncate(&mut self) -> io::Result<()> {
        self.set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}
