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

//! Off-chain registration of allocation trees so an indexer can serve proofs.

use std::{fmt::Debug, time::Duration};

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use launchkit_params::{CollaboratorError, MerkleAllocationTree, merkle::MerkleTreeDump};
use serde::{Deserialize, Serialize};

use crate::http::JsonHttpClient;

/// Service name used in errors and logs.
pub const ALLOCATION_REGISTRY_SERVICE: &str = "allocation-registry";

/// Default registration timeout.
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;

/// A deployed token's allocation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRegistration {
    /// Deployed token address.
    pub contract_address: Address,
    /// Root committed on-chain.
    pub merkle_root: B256,
    /// Full tree for answering proof requests.
    pub tree: MerkleTreeDump,
}

impl AllocationRegistration {
    /// Creates a new [`AllocationRegistration`] for a deployed token.
    #[must_use]
    pub fn new(contract_address: Address, tree: &MerkleAllocationTree) -> Self {
        Self {
            contract_address,
            merkle_root: tree.root(),
            tree: tree.dump(),
        }
    }
}

/// Stores allocation trees on behalf of the launcher.
#[async_trait]
pub trait AllocationRegistry: Debug + Send + Sync {
    /// Registers a tree. Implementations must not retry internally.
    ///
    /// # Errors
    ///
    /// Returns a [`CollaboratorError`] if the registry cannot be reached or rejects the tree.
    async fn register(&self, registration: &AllocationRegistration)
    -> Result<(), CollaboratorError>;
}

/// Registers `registration`, logging instead of propagating any failure.
///
/// Returns `true` if the registry accepted the tree.
pub async fn register_best_effort(
    registry: &dyn AllocationRegistry,
    registration: &AllocationRegistration,
) -> bool {
    match registry.register(registration).await {
        Ok(()) => {
            tracing::info!(
                contract = %registration.contract_address,
                root = %registration.merkle_root,
                "Registered allocation tree"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                contract = %registration.contract_address,
                "Allocation tree registration failed: {e}"
            );
            false
        }
    }
}

/// Configuration for [`HttpAllocationRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRegistryConfig {
    /// Endpoint accepting the registration as a JSON POST.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl AllocationRegistryConfig {
    /// Creates a new [`AllocationRegistryConfig`] instance.
    #[must_use]
    pub fn new(url: String, timeout_secs: Option<u64>) -> Self {
        Self {
            url,
            timeout_secs: timeout_secs.unwrap_or(DEFAULT_REGISTRY_TIMEOUT_SECS),
        }
    }
}

/// Allocation registry over a JSON HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpAllocationRegistry {
    http: JsonHttpClient,
}

impl HttpAllocationRegistry {
    /// Creates a new [`HttpAllocationRegistry`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn new(config: &AllocationRegistryConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: JsonHttpClient::new(
                ALLOCATION_REGISTRY_SERVICE,
                &config.url,
                Duration::from_secs(config.timeout_secs),
            )?,
        })
    }
}

#[async_trait]
impl AllocationRegistry for HttpAllocationRegistry {
    async fn register(
        &self,
        registration: &AllocationRegistration,
    ) -> Result<(), CollaboratorError> {
        self.http.post(registration).await.map(|_| ())
    }
}
