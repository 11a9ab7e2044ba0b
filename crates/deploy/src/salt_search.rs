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

//! The vanity salt-search collaborator.
//!
//! Answers are untrusted: [`crate::address::AddressResolver::search`] re-derives every
//! returned address before it is used.

use std::{fmt::Debug, time::Duration};

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use launchkit_params::CollaboratorError;
use serde::{Deserialize, Serialize};

use crate::http::JsonHttpClient;

/// Service name used in errors and logs.
pub const SALT_SEARCH_SERVICE: &str = "salt-search";

/// Default timeout for a salt search, which may involve a lengthy brute force.
pub const DEFAULT_SALT_SEARCH_TIMEOUT_SECS: u64 = 60;

/// Inputs a searcher needs to find a salt for a suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaltSearchRequest {
    /// The CREATE2 deployer (the factory).
    pub deployer: Address,
    /// Hash of the token init code.
    pub init_code_hash: B256,
    /// Owner the salt is bound to.
    pub owner: Address,
    /// Required trailing hex digits, lowercase and unprefixed.
    pub suffix: String,
}

/// A searcher's claimed (address, salt) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltSearchResponse {
    /// Address the searcher claims `salt` deploys to.
    pub address: Address,
    /// Salt to pass to the factory.
    pub salt: B256,
}

/// Finds salts whose deployment address ends in a requested suffix.
#[async_trait]
pub trait SaltSearch: Debug + Send + Sync {
    /// Performs a single search. Implementations must not retry internally.
    ///
    /// # Errors
    ///
    /// Returns a [`CollaboratorError`] on timeout, transport failure or an answer that cannot
    /// be decoded.
    async fn find(&self, request: &SaltSearchRequest)
    -> Result<SaltSearchResponse, CollaboratorError>;
}

/// Configuration for [`HttpSaltSearchClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltSearchConfig {
    /// Endpoint accepting the search request as a JSON POST.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl SaltSearchConfig {
    /// Creates a new [`SaltSearchConfig`] instance.
    #[must_use]
    pub fn new(url: String, timeout_secs: Option<u64>) -> Self {
        Self {
            url,
            timeout_secs: timeout_secs.unwrap_or(DEFAULT_SALT_SEARCH_TIMEOUT_SECS),
        }
    }
}

/// Salt search over a JSON HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpSaltSearchClient {
    http: JsonHttpClient,
}

impl HttpSaltSearchClient {
    /// Creates a new [`HttpSaltSearchClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn new(config: &SaltSearchConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: JsonHttpClient::new(
                SALT_SEARCH_SERVICE,
                &config.url,
                Duration::from_secs(config.timeout_secs),
            )?,
        })
    }
}

#[async_trait]
impl SaltSearch for HttpSaltSearchClient {
    async fn find(
        &self,
        request: &SaltSearchRequest,
    ) -> Result<SaltSearchResponse, CollaboratorError> {
        self.http.post_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn test_request_wire_format() {
        let request = SaltSearchRequest {
            deployer: Address::repeat_byte(0x11),
            init_code_hash: B256::repeat_byte(0x22),
            owner: Address::repeat_byte(0x33),
            suffix: "b07".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["suffix"], json!("b07"));
        assert_eq!(
            value["initCodeHash"],
            json!(format!("0x{}", "22".repeat(32)))
        );
        assert!(value.get("deployer").is_some());
        assert!(value.get("owner").is_some());
    }

    #[rstest]
    fn test_config_defaults_timeout() {
        let config = SaltSearchConfig::new("http://localhost:8080".to_string(), None);
        assert_eq!(config.timeout_secs, DEFAULT_SALT_SEARCH_TIMEOUT_SECS);
    }
}
