//! HTTP-backed [`AudioFetcher`] built on `reqwest`.
//!
//! All connection details (timeout, user agent) come from
//! [`FetchConfig`](crate::config::FetchConfig); nothing is hardcoded.

use async_trait::async_trait;

use crate::config::FetchConfig;

use super::{AudioFetcher, FetchError};

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// Downloads audio bytes over HTTP(S).
///
/// The client is pre-configured with the per-request timeout from
/// [`FetchConfig::timeout_secs`].  A default (no-timeout) client is used as
/// a last-resort fallback if the builder fails (should never happen in
/// practice).
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build an `HttpFetcher` from fetch configuration.
    pub fn from_config(config: &FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

#[async_trait]
impl AudioFetcher for HttpFetcher {
    /// GET `locator` and return the full response body.
    ///
    /// Non-success status codes map to [`FetchError::Status`]; transport
    /// failures and timeouts map through `From<reqwest::Error>`.
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(locator).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        log::debug!("fetch: downloaded {} bytes from {locator}", bytes.len());
        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        // Construction must not panic even with the default config.
        let _fetcher = HttpFetcher::default();
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Reserved TLD (RFC 2606) — resolution fails without touching a
        // real network service.
        let config = FetchConfig {
            timeout_secs: 1,
            ..FetchConfig::default()
        };
        let fetcher = HttpFetcher::from_config(&config);
        let err = fetcher.fetch("http://audio.invalid/clip.wav").await.unwrap_err();
        assert!(
            matches!(err, FetchError::Request(_) | FetchError::Timeout),
            "{err}"
        );
    }
}
