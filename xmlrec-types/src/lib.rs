//! Shared DTOs for the xmlrec workspace.
//!
//! # Design constraints
//! - `SchemaEntry` is written to disk; its wire names (`TableName`,
//!   `SchemaDictionary`) are consumed by other tools and must not change.
//! - Descriptions on [`AttributeEntry`] are derived on load and never persisted.

pub mod record;
pub mod schema;

pub use record::{AttributeEntry, FileType};
pub use schema::SchemaEntry;

/// Well-known names shared between crates.
pub mod names {
    /// Root attribute carrying the document's [`FileType`](crate::FileType).
    pub const TYPE_ATTR: &str = "type";
    /// Element name used when records are re-serialized.
    pub const DEFAULT_RECORD_ELEMENT: &str = "record";
    /// File name of the aggregated schema export.
    pub const SCHEMA_FILE_NAME: &str = "Schema.json";
    /// Extension of record documents discovered by a scan.
    pub const DEFAULT_EXTENSION: &str = "xml";
}
