//! Embeddable core library for xmlrec.
//!
//! Provides a clap-free, I/O-abstracted entry point for hosts that want the
//! record editor or the schema pass without the command line.
//!
//! # Port traits
//!
//! I/O at the edges is abstracted behind port traits in [`ports`]:
//! - [`CatalogSource`](ports::CatalogSource): load the descriptor catalog
//! - [`WritePort`](ports::WritePort): create directories and write new files
//!
//! The [`adapters`] module provides filesystem-backed and in-memory implementations.
//!
//! # Entry points
//!
//! - [`EditSession`](session::EditSession): open, edit, preview and save one document
//! - [`run_schema`](pipeline::run_schema): aggregate a directory tree
//! - [`spawn_schema`](pipeline::spawn_schema): the same on a worker thread, cancellable

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod session;
pub mod settings;

// Re-exported so embedders don't need the lower crates directly.
pub use xmlrec_descriptor::{Edit, Resolver};
pub use xmlrec_edit::{Document, DocumentEvent, EditError};
pub use xmlrec_schema::{AggregateError, CancelFlag};
