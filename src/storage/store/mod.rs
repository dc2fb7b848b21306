//! Record store: the ordered user list persisted behind a [`Filesystem`].
//!
//! [`Filesystem`]: crate::storage::fs::Filesystem

use crate::domain::model::{RecordError, User};
use std::io;
use std::path::PathBuf;

pub mod csv;

pub use self::csv::CsvStore;

/// Persistence contract the controller talks to.
///
/// Every `write` replaces the whole document with the users given, so callers
/// pass the complete set. There is no coordination between concurrent
/// writers: the last write wins.
#[cfg_attr(test, mockall::automock)]
pub trait Store: Send + Sync {
    /// Reads every user in storage order.
    fn read(&self) -> Result<Vec<User>, StoreError>;

    /// Replaces the stored users.
    fn write(&self, users: &[User]) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no file found at {path:?}")]
    NotFound { path: PathBuf },
    #[error("unable to open file at {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("unable to create file at {path:?}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("unable to parse user at {path:?} for index {index}: {source}")]
    Parse {
        path: PathBuf,
        index: usize,
        source: RecordError,
    },
    #[error("unable to marshal user at index {index}: {source}")]
    Serialize { index: usize, source: ::csv::Error },
    #[error("unable to write file at {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}
