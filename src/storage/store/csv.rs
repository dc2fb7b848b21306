use crate::domain::model::{RecordError, User};
use crate::storage::fs::{File, Filesystem};
use crate::storage::store::{Store, StoreError};
use ::csv::{ReaderBuilder, WriterBuilder};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stores users as CSV rows, one user per row, in a single document.
pub struct CsvStore {
    fsys: Arc<dyn Filesystem>,
    path: PathBuf,
}

impl CsvStore {
    pub fn new(fsys: Arc<dyn Filesystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fsys,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(&self, users: &[User]) -> Result<Vec<u8>, StoreError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for (index, user) in users.iter().enumerate() {
            writer
                .serialize(user)
                .map_err(|source| StoreError::Serialize { index, source })?;
        }
        writer.into_inner().map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e.into_error(),
        })
    }

    fn open_for_write(&self) -> Result<Box<dyn File>, StoreError> {
        if !self.fsys.exists(&self.path) {
            tracing::debug!(path = ?self.path, "creating store document");
            return self.fsys.create(&self.path).map_err(|source| StoreError::Create {
                path: self.path.clone(),
                source,
            });
        }

        let mut file = self.fsys.open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;
        file.truncate().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(file)
    }
}

impl Store for CsvStore {
    fn read(&self) -> Result<Vec<User>, StoreError> {
        if !self.fsys.exists(&self.path) {
            return Err(StoreError::NotFound {
                path: self.path.clone(),
            });
        }

        let file = self.fsys.open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;

        // Row lengths are checked per user so a short row reports its index.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut users = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let user = record
                .map_err(RecordError::from)
                .and_then(|record| User::from_record(&record))
                .map_err(|source| StoreError::Parse {
                    path: self.path.clone(),
                    index,
                    source,
                })?;
            users.push(user);
        }

        tracing::debug!(path = ?self.path, count = users.len(), "read users");
        Ok(users)
    }

    fn write(&self, users: &[User]) -> Result<(), StoreError> {
        let document = self.encode(users)?;

        // The document on disk is only touched once every row has serialized.
        let mut file = self.open_for_write()?;
        file.write_all(&document)
            .and_then(|()| file.flush())
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = ?self.path, count = users.len(), "wrote users");
        Ok(())
    }
}
