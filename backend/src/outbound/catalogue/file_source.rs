//! Catalogue source reading a tab-separated file from disk.
//!
//! File access goes through `cap_std` so the adapter only ever holds a
//! capability for the catalogue's parent directory.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::TraceId;
use crate::domain::ports::{CatalogueSource, CatalogueSourceError};

/// Reads the catalogue from a local file on every load.
#[derive(Debug, Clone)]
pub struct FileCatalogueSource {
    path: PathBuf,
}

impl FileCatalogueSource {
    /// Create a source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn split_path(path: &Path) -> io::Result<(&Path, OsString)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "catalogue path must name a file",
        )
    })?;
    Ok((parent, file_name.to_os_string()))
}

fn read_catalogue(path: &Path) -> Result<String, CatalogueSourceError> {
    let unavailable =
        |error: io::Error| CatalogueSourceError::unavailable(format!("{}: {error}", path.display()));

    let (parent, file_name) = split_path(path).map_err(unavailable)?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(unavailable)?;
    let bytes = directory.read(Path::new(&file_name)).map_err(unavailable)?;

    String::from_utf8(bytes).map_err(|error| {
        CatalogueSourceError::decode(format!("{}: {error}", path.display()))
    })
}

#[async_trait]
impl CatalogueSource for FileCatalogueSource {
    async fn load_text(&self) -> Result<String, CatalogueSourceError> {
        let path = self.path.clone();
        TraceId::spawn_blocking(move || read_catalogue(&path))
            .await
            .map_err(|error| CatalogueSourceError::unavailable(error.to_string()))?
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
