//! # zipingest
//!
//! Turns base64-encoded ZIP exports into validated CSV rows.
//!
//! The pipeline has three independent stages:
//!
//! - [`archive`]: parses the ZIP format directly from an in-memory buffer and
//!   returns every file with its bytes (Stored and Deflate entries)
//! - [`csv`]: strips comment lines, tokenizes with a two-state machine, binds
//!   rows to the header and optionally converts numbers
//! - [`validate`]: checks rows against a list of required fields
//!
//! [`pipeline`] wires them together. All of them are synchronous and keep no
//! state between calls, so independent inputs can be processed in parallel.
//!
//! Structural archive damage is fatal ([`ArchiveError`]); a bad entry or a
//! malformed row is logged through the [`log`] facade and reported next to
//! the successful result.
//!
//! ## Example
//!
//! ```no_run
//! use zipingest::csv::ParseOptions;
//! use zipingest::{RequiredFields, archive, csv, pipeline, validate};
//!
//! fn main() -> anyhow::Result<()> {
//!     let base64 = std::fs::read_to_string("export.b64")?;
//!
//!     let extraction = archive::extract(&base64)?;
//!     let required = RequiredFields::new(["Connect_ID"])?;
//!     for entry in &extraction.entries {
//!         let text = pipeline::decode_text(entry.bytes());
//!         let outcome = csv::parse(&text, &ParseOptions::default().convert_numbers(true))?;
//!         for row in &outcome.rows {
//!             let result = validate::validate(row, &required);
//!             if !result.is_valid {
//!                 println!("{}: missing {:?}", entry.name, result.missing_fields);
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod csv;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod validate;

pub use archive::{ArchiveEntry, CompressionMethod, EntryContent, Extraction, extract, extract_bytes};
pub use cli::Cli;
pub use csv::{FieldValue, ParseOptions, ParseOutcome, Row, parse};
pub use error::{
    ArchiveError, EntryIssue, ParseError, RowWidthMismatch, UnsupportedFeature, ValidationError,
};
pub use io::{HttpSource, LocalFileSource, Source};
pub use pipeline::{IngestOptions, IngestedFile, Ingestion, ingest, ingest_bytes};
pub use validate::{RequiredFields, ValidationResult, validate};
