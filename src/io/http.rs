use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::Source;
use anyhow::{Context, Result, bail};

/// Archive fetched from an HTTP(S) URL
pub struct HttpSource {
    url: String,
    max_retry: u32,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            max_retry: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl Source for HttpSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        let client = Client::builder().timeout(self.timeout).build()?;
        let mut retry_count = 0;

        loop {
            match client.get(&self.url).send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        bail!("HTTP request failed with status: {}", resp.status());
                    }

                    let bytes = resp
                        .bytes()
                        .await
                        .with_context(|| format!("failed to read body of {}", self.url))?;
                    log::debug!("{}: received {} bytes", self.url, bytes.len());
                    return Ok(bytes.to_vec());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        bail!("Max retries exceeded for {}: {}", self.url, e);
                    }
                    log::warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count,
                        self.max_retry,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn describe(&self) -> &str {
        &self.url
    }
}
