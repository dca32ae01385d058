//! Input sources for the command-line front end.
//!
//! The library itself only sees byte buffers; these sources fetch the
//! archive (raw or base64) from disk or over HTTP.

mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalFileSource;

use anyhow::Result;
use async_trait::async_trait;

/// A place an archive can be loaded from, in full.
#[async_trait]
pub trait Source: Send + Sync {
    /// Read the whole input into memory
    async fn read_all(&self) -> Result<Vec<u8>>;

    /// Human-readable name used in output and messages
    fn describe(&self) -> &str;
}

/// Pick a source for a path or `http(s)://` URL.
pub fn open(input: &str) -> Box<dyn Source> {
    if is_http_url(input) {
        Box::new(HttpSource::new(input.to_string()))
    } else {
        Box::new(LocalFileSource::new(input))
    }
}

pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
