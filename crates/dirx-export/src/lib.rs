//! Record-to-CSV encoding and post-encoding field overrides.
//!
//! This crate holds the pure transformation core of the export pipeline:
//! the sparse [`Record`] data model, the CSV encoder with column-set
//! normalization, and the override engine that rewrites individual columns
//! of an already-encoded table. Nothing here performs I/O.

pub mod encoder;
pub mod error;
pub mod overrides;
pub mod record;

pub use encoder::{encode, resolve_columns, WILDCARD_COLUMN};
pub use error::{ExportError, ExportResult};
pub use overrides::{apply_overrides, OverrideOptions};
pub use record::{FieldValue, Record};
