//! Schema pipeline, extracted from the CLI.
//!
//! Scanning reads the filesystem directly; artifact output goes through
//! [`WritePort`] so hosts can redirect it.

use crate::ports::WritePort;
use crate::settings::SchemaSettings;
use anyhow::Context;
use camino::Utf8Path;
use std::thread;
use tracing::{debug, info};
use xmlrec_render::render_schema_md;
use xmlrec_schema::{Aggregate, AggregateError, CancelFlag, aggregate, to_json};

/// Outcome of [`run_schema`].
#[derive(Debug, Clone)]
pub struct SchemaOutcome {
    pub aggregate: Aggregate,
    /// Serialized `[{TableName, SchemaDictionary}]` payload.
    pub json: String,
    pub summary_md: String,
}

/// Scan `settings.scan_root` and build the schema payload in memory.
///
/// Nothing is written; see [`write_schema_artifacts`].
pub fn run_schema(
    settings: &SchemaSettings,
    cancel: &CancelFlag,
) -> Result<SchemaOutcome, AggregateError> {
    let aggregate = aggregate(&settings.scan_root, &settings.aggregate_options(), cancel)?;
    let json = to_json(&aggregate.entries)?;
    let summary_md = render_schema_md(&aggregate.entries);
    debug!(
        tables = aggregate.entries.len(),
        bytes = json.len(),
        "schema payload built"
    );
    Ok(SchemaOutcome {
        aggregate,
        json,
        summary_md,
    })
}

/// Write the schema payload to `dest`. Fails if `dest` already exists.
pub fn write_schema_artifacts(
    outcome: &SchemaOutcome,
    dest: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_str().is_empty()) {
        writer.create_dir_all(parent)?;
    }
    writer
        .write_new(dest, outcome.json.as_bytes())
        .with_context(|| format!("write schema {}", dest))?;
    info!(path = %dest, tables = outcome.aggregate.entries.len(), "schema written");
    Ok(())
}

/// A schema run on a worker thread.
#[derive(Debug)]
pub struct SchemaJob {
    cancel: CancelFlag,
    handle: thread::JoinHandle<Result<SchemaOutcome, AggregateError>>,
}

impl SchemaJob {
    /// Ask the worker to stop before its next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> anyhow::Result<SchemaOutcome> {
        let result = self
            .handle
            .join()
            .map_err(|_| anyhow::anyhow!("schema worker panicked"))?;
        Ok(result?)
    }
}

/// Run [`run_schema`] on a dedicated thread so an interactive caller stays responsive.
pub fn spawn_schema(settings: SchemaSettings) -> anyhow::Result<SchemaJob> {
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();
    let handle = thread::Builder::new()
        .name("xmlrec-schema".to_string())
        .spawn(move || run_schema(&settings, &worker_cancel))
        .context("spawn schema worker")?;
    Ok(SchemaJob { cancel, handle })
}

