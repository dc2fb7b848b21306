pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::controller::{Controller, QueryController, Submission};
pub use domain::{FormError, User, UserForm};
pub use storage::{CsvStore, DiskFilesystem, Filesystem, Store, StoreError};
pub use transport::http::{AppState, Templates};
