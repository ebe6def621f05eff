//! Schema aggregation over a tree of record documents.
//!
//! Every document under a root is loaded with the same parser the editor uses, grouped by
//! its declared file type, and folded into one [`SchemaEntry`](xmlrec_types::SchemaEntry)
//! per type: the union of attribute keys seen on records, each with the first sample value
//! observed. Files are visited in sorted path order so the output is deterministic.

mod accumulate;
mod error;
mod export;
mod scan;

pub use accumulate::SchemaAccumulator;
pub use error::AggregateError;
pub use export::to_json;
pub use scan::{
    Aggregate, AggregateOptions, CancelFlag, MalformedPolicy, SkippedFile, aggregate, discover,
};
