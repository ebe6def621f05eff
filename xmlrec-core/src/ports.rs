//! Port traits abstracting I/O away from the pipelines.

use camino::Utf8Path;
use xmlrec_descriptor::DescriptorCatalog;

/// Source of the descriptor catalog.
pub trait CatalogSource {
    fn load_catalog(&self) -> anyhow::Result<DescriptorCatalog>;
}

/// File-system write operations.
pub trait WritePort {
    /// Write `contents` to a file that must not exist yet.
    fn write_new(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
