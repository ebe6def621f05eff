use crate::catalog::{DescriptorCatalog, DescriptorTable};
use xmlrec_types::FileType;

/// Read-only descriptor lookup, keyed by file type.
///
/// The core never writes through this; catalogs are loaded once and injected.
pub trait DescriptorSource {
    fn table(&self, file_type: &FileType) -> Option<&DescriptorTable>;
}

impl DescriptorSource for DescriptorCatalog {
    fn table(&self, file_type: &FileType) -> Option<&DescriptorTable> {
        self.tables.get(file_type)
    }
}
