use crate::accumulate::SchemaAccumulator;
use crate::error::AggregateError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::{Pattern, glob};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use xmlrec_descriptor::{DescriptorCatalog, Resolver};
use xmlrec_types::SchemaEntry;
use xmlrec_types::names::DEFAULT_EXTENSION;

/// What to do with a file that cannot be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abandon the run and report the file.
    #[default]
    Abort,
    /// Record the file in [`Aggregate::skipped`] and keep going.
    Skip,
}

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// File extension (without the dot) of documents to scan.
    pub extension: String,
    pub on_malformed: MalformedPolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            on_malformed: MalformedPolicy::default(),
        }
    }
}

/// Cooperative cancellation, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: Utf8PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Aggregate {
    pub entries: Vec<SchemaEntry>,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
}

/// List documents under `root` with the given extension, recursively, in sorted order.
///
/// A missing root yields an empty list.
pub fn discover(root: &Utf8Path, extension: &str) -> Result<Vec<Utf8PathBuf>, AggregateError> {
    let pattern = format!(
        "{}/**/*.{}",
        Pattern::escape(root.as_str()),
        Pattern::escape(extension)
    );
    debug!(pattern = %pattern, "scanning for documents");

    let entries = glob(&pattern).map_err(|e| AggregateError::Glob {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AggregateError::Io {
            path: Utf8PathBuf::from(e.path().to_string_lossy().to_string()),
            source: e.into_error(),
        })?;
        if !path.is_file() {
            continue;
        }
        match Utf8PathBuf::from_path_buf(path) {
            Ok(p) => out.push(p),
            Err(p) => warn!(path = %p.display(), "skipping non-utf-8 path"),
        }
    }

    // Deterministic order matters: first-seen order drives the output.
    out.sort();
    Ok(out)
}

/// Aggregate the schema of every document under `root`.
pub fn aggregate(
    root: &Utf8Path,
    opts: &AggregateOptions,
    cancel: &CancelFlag,
) -> Result<Aggregate, AggregateError> {
    let files = discover(root, &opts.extension)?;
    // Keys only; descriptions are irrelevant here.
    let resolver = Resolver::new(Arc::new(DescriptorCatalog::new()));

    let mut acc = SchemaAccumulator::new();
    let mut skipped = Vec::new();
    let mut files_scanned = 0;

    for path in &files {
        if cancel.is_cancelled() {
            info!(files_scanned, "aggregation cancelled");
            return Err(AggregateError::Cancelled { files_scanned });
        }

        let loaded = fs::read(path)
            .map_err(|source| AggregateError::Io {
                path: path.clone(),
                source,
            })
            .and_then(|bytes| {
                xmlrec_edit::load_bytes(&bytes, &resolver).map_err(|source| AggregateError::Parse {
                    path: path.clone(),
                    source,
                })
            });

        let doc = match (loaded, opts.on_malformed) {
            (Ok(doc), _) => doc,
            (Err(e), MalformedPolicy::Skip) => {
                warn!(path = %path, error = %e, "skipping unreadable document");
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
            (Err(e), MalformedPolicy::Abort) => return Err(e),
        };

        let added = acc.absorb_document(&doc);
        files_scanned += 1;
        debug!(path = %path, file_type = %doc.file_type(), new_keys = added, "scanned document");
    }

    info!(
        files_scanned,
        skipped = skipped.len(),
        tables = acc.len(),
        "aggregation complete"
    );
    Ok(Aggregate {
        entries: acc.into_entries(),
        files_scanned,
        skipped,
    })
}
