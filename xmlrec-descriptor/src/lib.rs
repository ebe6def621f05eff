//! Descriptor resolution for record documents.
//!
//! A descriptor catalog maps, per [`FileType`](xmlrec_types::FileType), attribute keys to
//! human-readable descriptions and `(attribute, value)` pairs to value descriptions. The
//! catalog is read-only configuration; this crate owns the lookup rules, not the editing.
//!
//! Unknown file types, attributes and values are not errors. They resolve to entries with
//! absent descriptions and a [`ResolveStatus`] saying which lookup missed.

mod catalog;
mod load;
mod ports;
mod resolver;

pub use catalog::{AttributeDescriptor, DescriptorCatalog, DescriptorTable};
pub use load::{CatalogError, CatalogFormat, load_catalog, parse_catalog};
pub use ports::DescriptorSource;
pub use resolver::{DEFAULT_TITLE_FALLBACK, Edit, Resolution, ResolveStatus, Resolver};
