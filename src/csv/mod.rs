//! CSV cleaning, tokenizing and header binding.
//!
//! Parsing runs in three steps:
//!
//! 1. [`clean`] drops blank lines and whole-line comments (default marker `*`)
//! 2. [`tokenize`] splits the text into rows of raw string fields
//! 3. [`parse`] binds rows to the header row, drops rows of the wrong width
//!    and optionally coerces numeric fields
//!
//! ```
//! use zipingest::csv::{FieldValue, ParseOptions, parse};
//!
//! let outcome = parse("id,score\n1,.\n2,7", &ParseOptions::default().convert_numbers(true))?;
//! assert_eq!(outcome.rows[0].get("score"), Some(&FieldValue::from(".")));
//! assert_eq!(outcome.rows[1].get("score"), Some(&FieldValue::Number(7.0)));
//! # Ok::<(), zipingest::ParseError>(())
//! ```

mod clean;
mod parser;
mod tokenizer;
mod value;

pub use clean::{DEFAULT_COMMENT_CHAR, clean};
pub use parser::{DEFAULT_MISSING_SENTINEL, ParseOptions, ParseOutcome, parse, parse_number};
pub use tokenizer::tokenize;
pub use value::{FieldValue, Row};
