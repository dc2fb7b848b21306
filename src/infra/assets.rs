//! View sources, compiled into the binary or read from `./views` on disk.

use rust_embed::RustEmbed;
use std::io;
use std::path::{Path, PathBuf};

/// Directory the local asset source reads from, relative to the working
/// directory.
pub const LOCAL_VIEWS_DIR: &str = "views";

#[derive(RustEmbed)]
#[folder = "views/"]
struct EmbeddedViews;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no asset named {0:?}")]
    NotFound(String),
    #[error("unable to read asset at {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("asset {0:?} is not valid UTF-8")]
    Utf8(String),
}

/// Key to content lookup over the view sources.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    local_root: Option<PathBuf>,
}

impl Assets {
    /// Selects the embedded bundle, or `./views` when `use_local` is set.
    pub fn new(use_local: bool) -> Self {
        if use_local {
            Self::local(LOCAL_VIEWS_DIR)
        } else {
            Self::embedded()
        }
    }

    pub fn embedded() -> Self {
        Self { local_root: None }
    }

    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: Some(root.into()),
        }
    }

    pub fn is_local(&self) -> bool {
        self.local_root.is_some()
    }

    pub fn string(&self, name: &str) -> Result<String, AssetError> {
        match &self.local_root {
            Some(root) => read_local(root, name),
            None => {
                let file =
                    EmbeddedViews::get(name).ok_or_else(|| AssetError::NotFound(name.to_string()))?;
                String::from_utf8(file.data.into_owned())
                    .map_err(|_| AssetError::Utf8(name.to_string()))
            }
        }
    }
}

fn read_local(root: &Path, name: &str) -> Result<String, AssetError> {
    let path = root.join(name);
    match std::fs::read_to_string(&path) {
        Ok(source) => Ok(source),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AssetError::NotFound(name.to_string())),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(AssetError::Utf8(name.to_string())),
        Err(source) => Err(AssetError::Read { path, source }),
    }
}
