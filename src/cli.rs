use clap::{Parser, ValueEnum};

use crate::archive::decode_base64;
use crate::csv::ParseOptions;
use crate::error::{ArchiveError, ValidationError};
use crate::pipeline::IngestOptions;
use crate::validate::RequiredFields;

/// How the bytes of an input are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Raw ZIP if the input starts with "PK", base64 otherwise
    Auto,
    /// Base64 text of a ZIP archive
    Base64,
    /// Raw ZIP bytes
    Zip,
}

#[derive(Parser, Debug)]
#[command(name = "zipingest")]
#[command(version)]
#[command(about = "Extract base64 ZIP exports and parse their CSV files into rows", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipingest export.b64                   print every CSV row as JSON lines\n  \
  zipingest -n -r Connect_ID export.b64  convert numbers, report rows missing Connect_ID\n  \
  zipingest -v https://example.com/export.zip   list entries of a remote archive")]
pub struct Cli {
    /// Archive paths or HTTP URLs
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Input encoding
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// List entries (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List entries verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Print entry contents to stdout instead of parsing them
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Only process entries matching PATTERN (repeatable, * and ? wildcards)
    #[arg(short = 'i', value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Skip entries matching PATTERN (repeatable)
    #[arg(short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Parse every entry, not only *.csv
    #[arg(short = 'a')]
    pub all_entries: bool,

    /// Character marking whole-line comments
    #[arg(short = 'c', value_name = "CHAR", default_value_t = '*')]
    pub comment_char: char,

    /// Convert numeric fields to numbers
    #[arg(short = 'n')]
    pub convert_numbers: bool,

    /// Value meaning "no answer", never converted (repeatable, default ".")
    #[arg(long = "sentinel", value_name = "VALUE", allow_hyphen_values = true)]
    pub sentinels: Vec<String>,

    /// Field every row must have (repeatable)
    #[arg(short = 'r', value_name = "FIELD")]
    pub required: Vec<String>,

    /// Number of inputs processed at once
    #[arg(short = 'j', value_name = "N", default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.quiet {
            0 => "warn",
            1 => "error",
            _ => "off",
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        let options = ParseOptions::default()
            .comment_char(self.comment_char)
            .convert_numbers(self.convert_numbers);
        if self.sentinels.is_empty() {
            options
        } else {
            options.missing_sentinels(self.sentinels.iter().cloned())
        }
    }

    pub fn ingest_options(&self) -> Result<IngestOptions, ValidationError> {
        let suffix = if self.all_entries {
            None
        } else {
            Some(".csv".to_string())
        };
        Ok(IngestOptions::default()
            .parse_options(self.parse_options())
            .required(RequiredFields::new(self.required.iter().cloned())?)
            .name_suffix(suffix))
    }

    /// Apply the -i / -x entry filters.
    pub fn entry_selected(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| pattern_matches(p, name)) {
            return false;
        }
        !self.exclude.iter().any(|p| pattern_matches(p, name))
    }

    /// Turn the bytes of an input into raw ZIP bytes.
    pub fn decode_input(&self, data: Vec<u8>) -> Result<Vec<u8>, ArchiveError> {
        let is_base64 = match self.format {
            InputFormat::Zip => false,
            InputFormat::Base64 => true,
            InputFormat::Auto => !data.starts_with(b"PK"),
        };
        if !is_base64 {
            return Ok(data);
        }

        let text = std::str::from_utf8(&data)
            .map_err(|e| ArchiveError::InvalidEncoding(format!("input is not text: {}", e)))?;
        decode_base64(text)
    }
}

/// Exact match on the full name or the base name, or a glob match on the
/// full name when the pattern has wildcards.
fn pattern_matches(pattern: &str, name: &str) -> bool {
    if has_glob_chars(pattern) {
        return glob_match(pattern, name);
    }
    let basename = name.rsplit('/').next().unwrap_or(name);
    name == pattern || basename == pattern
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                // Skip the star, or let it swallow one more character
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("zipingest").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn glob_patterns() {
        assert!(glob_match("*.csv", "module1.csv"));
        assert!(glob_match("mod?le*.csv", "module1_v2.csv"));
        assert!(!glob_match("*.csv", "module1.txt"));
    }

    #[test]
    fn include_and_exclude() {
        let cli = cli(&["-i", "*.csv", "-x", "draft.csv", "export.b64"]);
        assert!(cli.entry_selected("data/module1.csv"));
        assert!(!cli.entry_selected("data/draft.csv"));
        assert!(!cli.entry_selected("notes.txt"));
    }

    #[test]
    fn options_from_flags() {
        let cli = cli(&["-n", "-c", "#", "--sentinel", "-9", "-r", "id", "-a", "in.zip"]);
        let options = cli.ingest_options().unwrap();
        assert!(options.parse.convert_numbers);
        assert_eq!(options.parse.comment_char, '#');
        assert_eq!(options.parse.missing_sentinels, vec!["-9"]);
        assert_eq!(options.required.names(), ["id".to_string()]);
        assert!(options.name_suffix.is_none());
    }

    #[test]
    fn default_sentinel_is_dot() {
        let options = cli(&["in.zip"]).parse_options();
        assert_eq!(options.missing_sentinels, vec!["."]);
    }

    #[test]
    fn auto_format_detects_raw_zip() {
        let cli = cli(&["in"]);
        assert_eq!(cli.decode_input(b"PK\x05\x06".to_vec()).unwrap(), b"PK\x05\x06");
        assert_eq!(cli.decode_input(b"UEsFBg==\n".to_vec()).unwrap(), b"PK\x05\x06");
        assert!(matches!(
            cli.decode_input(b"not base64!".to_vec()),
            Err(ArchiveError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["zipingest", "-j", "0", "in.zip"]).is_err());
    }
}
