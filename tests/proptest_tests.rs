//! Property-based tests using proptest.

mod common;

use common::ZipBuilder;
use proptest::prelude::*;
use zipingest::csv::{FieldValue, ParseOptions, parse, tokenize};
use zipingest::extract;

/// Entry names without a trailing slash, so none is taken for a directory.
fn entry_name() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,8}(/[a-z0-9_]{1,8}){0,2}\\.csv"
}

/// Field text that needs quoting: commas, quotes, CR/LF mixed with letters.
fn field() -> impl Strategy<Value = String> {
    "[a-z ,\"\r\n]{0,12}"
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

proptest! {
    /// N stored entries come back in order, byte for byte.
    #[test]
    fn stored_entries_round_trip(
        files in proptest::collection::vec(
            (entry_name(), proptest::collection::vec(any::<u8>(), 0..256)),
            0..8,
        )
    ) {
        let mut builder = ZipBuilder::new();
        for (name, data) in &files {
            builder = builder.stored(name, data);
        }

        let extraction = extract(&builder.build_base64()).unwrap();
        prop_assert!(extraction.issues.is_empty());
        prop_assert_eq!(extraction.entries.len(), files.len());
        for (entry, (name, data)) in extraction.entries.iter().zip(&files) {
            prop_assert_eq!(&entry.name, name);
            prop_assert_eq!(entry.bytes(), &data[..]);
        }
    }

    /// Deflated entries inflate back to the original bytes.
    #[test]
    fn deflate_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let archive = ZipBuilder::new().deflated("d.csv", &data).build_base64();
        let extraction = extract(&archive).unwrap();
        prop_assert!(extraction.issues.is_empty());
        let entry = &extraction.entries[0];
        prop_assert_eq!(entry.bytes().len(), entry.declared_uncompressed_size as usize);
        prop_assert_eq!(entry.bytes(), &data[..]);
    }

    /// Quoting any field and tokenizing gives the field back.
    #[test]
    fn quoted_fields_survive_tokenizing(
        rows in proptest::collection::vec(proptest::collection::vec(field(), 1..5), 1..5)
    ) {
        // Every row is terminated, so a lone empty field still forms a row.
        let text: String = rows
            .iter()
            .map(|row| row.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",") + "\r\n")
            .collect();
        prop_assert_eq!(tokenize(&text), rows);
    }

    /// The "." sentinel and blanks never become numbers.
    #[test]
    fn sentinel_never_converted(pad in "[ ]{0,3}", n in any::<i32>()) {
        let input = format!("a,b,c\n{pad}.{pad},{n},{pad}\n");
        let options = ParseOptions::default().convert_numbers(true);
        let outcome = parse(&input, &options).unwrap();
        let row = &outcome.rows[0];
        let sentinel = format!("{pad}.{pad}");
        prop_assert_eq!(row.get("a").and_then(FieldValue::as_str), Some(sentinel.as_str()));
        prop_assert_eq!(row.get("b").and_then(FieldValue::as_number), Some(n as f64));
        prop_assert!(row.get("c").and_then(FieldValue::as_str).is_some());
    }
}
