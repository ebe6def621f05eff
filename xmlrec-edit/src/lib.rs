//! Record document model for flat XML record files.
//!
//! Responsibilities:
//! - Load a document into an ordered list of slots: passthrough nodes (comments, text,
//!   CDATA, processing instructions) kept verbatim, and records whose attributes are
//!   resolved through a [`Resolver`](xmlrec_descriptor::Resolver).
//! - Edit one attribute at a time with consistent re-resolution, title upkeep and a
//!   dirty flag.
//! - Search records by title/description and save the document atomically.

mod document;
mod error;
mod parse;
mod write;

pub use document::{Document, DocumentEvent, NodeKind, Passthrough, Record, RecordSlot};
pub use error::{EditError, EditResult, MalformedDocumentError};
pub use parse::{load, load_bytes};
pub use write::SaveOptions;

use camino::Utf8Path;
use fs_err as fs;
use xmlrec_descriptor::Resolver;

/// Read and load the document at `path`. Saving without a destination writes back here.
pub fn load_path(path: &Utf8Path, resolver: &Resolver) -> EditResult<Document> {
    let bytes = fs::read(path).map_err(|source| EditError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc = load_bytes(&bytes, resolver)?;
    doc.set_source_path(path.to_path_buf());
    Ok(doc)
}
