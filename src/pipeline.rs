//! End-to-end ingestion: archive → CSV files → validated rows.

use crate::archive::{ArchiveEntry, Extraction, decode_base64, extract_bytes};
use crate::csv::{ParseOptions, ParseOutcome, parse};
use crate::error::{ArchiveError, EntryIssue, ParseError};
use crate::validate::{RequiredFields, ValidationResult, validate};

/// Which entries to parse and how.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub parse: ParseOptions,
    pub required: RequiredFields,
    /// Entry names must end with this suffix (ASCII case-insensitive).
    /// `None` parses every entry.
    pub name_suffix: Option<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            required: RequiredFields::default(),
            name_suffix: Some(".csv".to_string()),
        }
    }
}

impl IngestOptions {
    pub fn parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn required(mut self, required: RequiredFields) -> Self {
        self.required = required;
        self
    }

    pub fn name_suffix(mut self, suffix: Option<String>) -> Self {
        self.name_suffix = suffix;
        self
    }

    pub fn accepts(&self, name: &str) -> bool {
        match &self.name_suffix {
            None => true,
            Some(suffix) => {
                name.len() >= suffix.len()
                    && name.is_char_boundary(name.len() - suffix.len())
                    && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
            }
        }
    }
}

/// A row that failed required-field validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InvalidRow {
    /// 1-based data row number; `rows[row - 1]` in [`ParseOutcome::rows`].
    pub row: usize,
    pub result: ValidationResult,
}

/// One parsed CSV file from the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedFile {
    pub name: String,
    /// False when the bytes came from a failed inflate and are best-effort.
    pub complete: bool,
    pub outcome: ParseOutcome,
    pub invalid_rows: Vec<InvalidRow>,
}

/// All files ingested from one archive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingestion {
    pub files: Vec<IngestedFile>,
    /// Entry-level problems reported by the extractor.
    pub issues: Vec<EntryIssue>,
    /// Files whose parse failed as a whole.
    pub failures: Vec<(String, ParseError)>,
}

/// Ingest a base64-encoded archive.
pub fn ingest(base64: &str, options: &IngestOptions) -> Result<Ingestion, ArchiveError> {
    let bytes = decode_base64(base64)?;
    ingest_bytes(&bytes, options)
}

/// Ingest a raw archive.
pub fn ingest_bytes(data: &[u8], options: &IngestOptions) -> Result<Ingestion, ArchiveError> {
    let Extraction { entries, issues } = extract_bytes(data)?;

    let mut ingestion = Ingestion {
        issues,
        ..Default::default()
    };
    for entry in entries.iter().filter(|e| options.accepts(&e.name)) {
        match ingest_entry(entry, options) {
            Ok(file) => ingestion.files.push(file),
            Err(e) => {
                log::warn!("'{}': {}", entry.name, e);
                ingestion.failures.push((entry.name.clone(), e));
            }
        }
    }

    Ok(ingestion)
}

/// Decode one entry as text and parse it.
pub fn ingest_entry(entry: &ArchiveEntry, options: &IngestOptions) -> Result<IngestedFile, ParseError> {
    let text = decode_text(entry.bytes());
    let outcome = parse(&text, &options.parse)?;

    let invalid_rows = if options.required.is_empty() {
        Vec::new()
    } else {
        outcome
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| InvalidRow {
                row: index + 1,
                result: validate(row, &options.required),
            })
            .filter(|invalid| !invalid.result.is_valid)
            .collect()
    };

    Ok(IngestedFile {
        name: entry.name.clone(),
        complete: entry.content.is_complete(),
        outcome,
        invalid_rows,
    })
}

/// Lossy UTF-8 decoding with a leading byte order mark removed.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
