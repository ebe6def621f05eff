use camino::Utf8PathBuf;
use thiserror::Error;
use xmlrec_edit::MalformedDocumentError;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// A document could not be loaded; the whole run is abandoned.
    #[error("parse error in {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: MalformedDocumentError,
    },

    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scan pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    #[error("aggregation cancelled after {files_scanned} files")]
    Cancelled { files_scanned: usize },

    #[error("serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AggregateError {
    /// Path of the file the error is about, when there is one.
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            AggregateError::Parse { path, .. } | AggregateError::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}
