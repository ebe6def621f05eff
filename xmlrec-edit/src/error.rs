//! Error types for xmlrec-edit.
//!
//! This module separates:
//! - Malformed input (exit code 2): unparsable XML, missing root `type`
//! - Runtime errors (exit code 1): I/O failures, bad slot/entry addressing, rejected edits
//!
//! Unknown descriptor entries are not errors; they surface as entries with no descriptions.

use camino::Utf8PathBuf;
use thiserror::Error;

/// The top-level error type for xmlrec-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// The document could not be loaded (exit code 2).
    #[error("malformed document: {0}")]
    Malformed(#[from] MalformedDocumentError),

    /// Reading or writing the document failed. The in-memory document is unchanged.
    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("slot {index} out of range ({len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("slot {index} is a passthrough node, not a record")]
    NotARecord { index: usize },

    #[error("entry {entry} out of range for slot {slot} ({len} attributes)")]
    EntryOutOfRange { slot: usize, entry: usize, len: usize },

    /// Renaming an attribute onto a key the record already has.
    #[error("slot {slot} already has an attribute named '{attr}'")]
    DuplicateAttribute { slot: usize, attr: String },

    #[error("'{attr}' is not a valid attribute name")]
    InvalidAttributeName { attr: String },

    /// Save without a destination on a document that was not loaded from a path.
    #[error("no destination: document was not loaded from a file")]
    NoDestination,
}

/// Structural problems that make a document unloadable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDocumentError {
    #[error("xml error at byte {position}: {message}")]
    Xml { message: String, position: usize },

    #[error("document has no root element")]
    MissingRoot,

    #[error("root element <{root}> has no 'type' attribute")]
    MissingType { root: String },

    #[error("root element <{root}> has an empty 'type' attribute")]
    EmptyType { root: String },

    #[error("more than one root element")]
    MultipleRoots,

    #[error("root element <{root}> is never closed")]
    UnclosedRoot { root: String },
}

impl EditError {
    /// Returns true if the input document itself is at fault.
    pub fn is_malformed(&self) -> bool {
        matches!(self, EditError::Malformed(_))
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::Malformed(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
