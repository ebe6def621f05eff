//! Default filesystem-backed port implementations.

use crate::ports::{CatalogSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;
use xmlrec_descriptor::DescriptorCatalog;

/// Loads a catalog file (`.json`, `.toml`, `.yaml`); no path means an empty catalog.
#[derive(Debug, Clone, Default)]
pub struct FsCatalogSource {
    pub path: Option<Utf8PathBuf>,
}

impl FsCatalogSource {
    pub fn new(path: Option<Utf8PathBuf>) -> Self {
        Self { path }
    }
}

impl CatalogSource for FsCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<DescriptorCatalog> {
        match &self.path {
            Some(path) => xmlrec_descriptor::load_catalog(path)
                .with_context(|| format!("load descriptor catalog {}", path)),
            None => {
                debug!("no descriptor catalog configured; descriptions will be empty");
                Ok(DescriptorCatalog::new())
            }
        }
    }
}

/// Pre-built catalog for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogSource {
    catalog: DescriptorCatalog,
}

impl InMemoryCatalogSource {
    pub fn new(catalog: DescriptorCatalog) -> Self {
        Self { catalog }
    }
}

impl CatalogSource for InMemoryCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<DescriptorCatalog> {
        Ok(self.catalog.clone())
    }
}

/// Filesystem write operations.
///
/// `write_new` stages the bytes in a temp file next to `path` and links it into place
/// without clobbering, so `path` is either absent or complete.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_new(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_str().is_empty() => p,
            _ => Utf8Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir))?;
        tmp.write_all(contents)
            .and_then(|()| tmp.as_file().sync_all())
            .with_context(|| format!("write {}", path))?;
        tmp.persist_noclobber(path)
            .map_err(|e| e.error)
            .with_context(|| format!("create {}", path))?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// Collects writes in memory; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryWritePort {
    files: Mutex<BTreeMap<Utf8PathBuf, Vec<u8>>>,
}

impl InMemoryWritePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Utf8Path) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(path).cloned()
    }

    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        self.files
            .lock()
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl WritePort for InMemoryWritePort {
    fn write_new(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("write port lock poisoned"))?;
        if files.contains_key(path) {
            anyhow::bail!("{} already exists", path);
        }
        files.insert(path.to_owned(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Utf8Path) -> anyhow::Result<()> {
        Ok(())
    }
}
