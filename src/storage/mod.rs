pub mod fs;
pub mod store;

pub use fs::{DiskFilesystem, File, Filesystem};
pub use store::{CsvStore, Store, StoreError};
