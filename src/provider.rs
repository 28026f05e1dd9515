//! Dataset provider capability.
//!
//! The query layer never touches the filesystem or network itself; it asks a
//! [`DatasetProvider`] for the current document and works on that snapshot.
//! Snapshots are `Arc`s, so a reload under a running request never mutates
//! anything the request can see.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::{Error, Result};
use crate::model::EphemerisDocument;

/// Source of the current ephemeris document.
pub trait DatasetProvider: Send + Sync {
    /// Returns a snapshot of the current document. Whether this re-reads the
    /// source or serves a cached parse is up to the implementation.
    fn document(&self) -> Result<Arc<EphemerisDocument>>;
}

/// A fixed in-memory document. Used by tests and useful for one-shot tools.
pub struct StaticProvider {
    document: Arc<EphemerisDocument>,
}

impl StaticProvider {
    pub fn new(document: EphemerisDocument) -> Self {
        Self { document: Arc::new(document) }
    }
}

impl DatasetProvider for StaticProvider {
    fn document(&self) -> Result<Arc<EphemerisDocument>> {
        Ok(Arc::clone(&self.document))
    }
}

/// Serves a JSON rendition of the OEM document from disk, parsed once and
/// cached. [`FileProvider::reload`] swaps in a fresh parse; on reload failure
/// the previous snapshot stays in place.
pub struct FileProvider {
    path: PathBuf,
    cached: RwLock<Arc<EphemerisDocument>>,
}

impl FileProvider {
    /// Loads and parses the dataset at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = load(&path)?;
        info!(path = %path.display(), "ephemeris dataset loaded");
        Ok(Self { path, cached: RwLock::new(Arc::new(document)) })
    }

    /// Re-reads the dataset from disk and swaps the cached snapshot.
    pub fn reload(&self) -> Result<()> {
        let document = Arc::new(load(&self.path)?);
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = document;
        Ok(())
    }
}

impl DatasetProvider for FileProvider {
    fn document(&self) -> Result<Arc<EphemerisDocument>> {
        Ok(Arc::clone(&self.cached.read().unwrap_or_else(PoisonError::into_inner)))
    }
}

fn load(path: &Path) -> Result<EphemerisDocument> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::DataUnavailable(format!("read {}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::DataUnavailable(format!("parse {}: {e}", path.display())))
}
