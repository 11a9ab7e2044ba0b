// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Minimal JSON-over-HTTP transport shared by the collaborator clients.
//!
//! Requests are sent exactly once. Failures are classified into the collaborator error
//! taxonomy and left for the caller to retry.

use std::time::Duration;

use launchkit_params::CollaboratorError;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::logging::{REQ, RES};

const PREVIEW_LEN: usize = 500;

/// POSTs JSON bodies to a single collaborator endpoint.
#[derive(Debug, Clone)]
pub struct JsonHttpClient {
    service: String,
    url: Url,
    timeout: Duration,
    client: Client,
}

impl JsonHttpClient {
    /// Creates a new [`JsonHttpClient`] for `service` at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` does not parse or the HTTP client cannot be built.
    pub fn new(service: &str, url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let url =
            Url::parse(url).map_err(|e| anyhow::anyhow!("Invalid {service} URL '{url}': {e}"))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build {service} HTTP client: {e}"))?;

        Ok(Self {
            service: service.to_string(),
            url,
            timeout,
            client,
        })
    }

    /// Sends `body` and returns the raw response body of a successful answer.
    ///
    /// # Errors
    ///
    /// Returns a collaborator error on timeout, transport failure or a non-success status.
    pub async fn post<B>(&self, body: &B) -> Result<Vec<u8>, CollaboratorError>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!("{REQ} POST {} ({})", self.url, self.service);

        let response = self
            .client
            .post(self.url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.classify(&e))?;
        tracing::debug!("{RES} {status} ({} bytes) from {}", bytes.len(), self.service);

        if !status.is_success() {
            return Err(self.invalid(format!("HTTP {status}: {}", preview(&bytes))));
        }
        Ok(bytes.to_vec())
    }

    /// Sends `body` and decodes the JSON answer.
    ///
    /// # Errors
    ///
    /// Returns a collaborator error if the request fails or the answer does not decode.
    pub async fn post_json<B, T>(&self, body: &B) -> Result<T, CollaboratorError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.post(body).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            self.invalid(format!(
                "Failed to parse response: {e}\nRaw response: {}",
                preview(&bytes)
            ))
        })
    }

    fn invalid(&self, message: String) -> CollaboratorError {
        CollaboratorError::InvalidResponse {
            service: self.service.clone(),
            message,
        }
    }

    fn classify(&self, error: &reqwest::Error) -> CollaboratorError {
        if error.is_timeout() {
            CollaboratorError::Timeout {
                service: self.service.clone(),
                after: self.timeout,
            }
        } else if error.is_decode() || error.is_body() {
            self.invalid(error.to_string())
        } else {
            CollaboratorError::Transport {
                service: self.service.clone(),
                message: error.to_string(),
            }
        }
    }
}

fn preview(bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(bytes);
    if raw.len() > PREVIEW_LEN {
        let cut = raw
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= PREVIEW_LEN)
            .last()
            .unwrap_or(0);
        format!("{}... (truncated, {} bytes total)", &raw[..cut], raw.len())
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_rejects_invalid_url() {
        assert!(JsonHttpClient::new("salt-search", "not a url", Duration::from_secs(1)).is_err());
    }

    #[rstest]
    fn test_preview_truncates_long_bodies() {
        let body = "x".repeat(PREVIEW_LEN * 2);
        let text = preview(body.as_bytes());
        assert!(text.starts_with(&"x".repeat(PREVIEW_LEN)));
        assert!(text.ends_with("(truncated, 1000 bytes total)"));
        assert_eq!(preview(b"short"), "short");
    }
}
