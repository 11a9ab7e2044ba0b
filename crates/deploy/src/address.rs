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

//! Deterministic (CREATE2) address prediction for launched tokens.
//!
//! The factory deploys each token with `CREATE2`, binding the caller-chosen salt to the token
//! owner so nobody else can claim an address found for them:
//!
//! ```text
//! effective_salt = keccak256(abi.encode(owner, salt))
//! address        = keccak256(0xff ++ factory ++ effective_salt ++ keccak256(init_code))[12..]
//! ```

use std::{fmt::Display, str::FromStr};

use alloy::{
    primitives::{Address, B256, keccak256},
    sol_types::SolValue,
};
use launchkit_params::{ConsistencyError, LaunchError, ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};

use crate::salt_search::{SaltSearch, SaltSearchRequest};

/// Number of hex digits in an address.
const ADDRESS_HEX_DIGITS: usize = 40;

/// Returns the salt the factory actually passes to `CREATE2` for `owner`.
#[must_use]
pub fn effective_salt(owner: &Address, salt: &B256) -> B256 {
    keccak256((*owner, *salt).abi_encode())
}

/// Returns `keccak256(0xff ++ deployer ++ salt ++ init_code_hash)[12..]`.
#[must_use]
pub fn create2_address(deployer: &Address, salt: &B256, init_code_hash: &B256) -> Address {
    deployer.create2(*salt, *init_code_hash)
}

/// A required trailing hex pattern of a deployment address.
///
/// Matching ignores case; odd lengths are allowed (`"b07"` matches `0x…ab07`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VanitySuffix(String);

impl VanitySuffix {
    /// Returns the normalized (lowercase, unprefixed) hex digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `address` ends with this suffix.
    #[must_use]
    pub fn matches(&self, address: &Address) -> bool {
        hex::encode(address.as_slice()).ends_with(&self.0)
    }
}

impl FromStr for VanitySuffix {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            ValidationError::new(
                "",
                ValidationErrorKind::InvalidSuffix {
                    suffix: value.to_string(),
                    reason: reason.to_string(),
                },
            )
        };

        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(invalid("suffix is empty"));
        }
        if digits.len() > ADDRESS_HEX_DIGITS {
            return Err(invalid("suffix is longer than an address"));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("suffix must contain only hex digits"));
        }
        Ok(Self(digits.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for VanitySuffix {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VanitySuffix> for String {
    fn from(value: VanitySuffix) -> Self {
        value.0
    }
}

impl Display for VanitySuffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A salt together with the address it deploys to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// Predicted token address.
    pub address: Address,
    /// Salt passed to the factory.
    pub salt: B256,
}

/// Predicts token addresses for one (factory, init code, owner) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressResolver {
    deployer: Address,
    init_code_hash: B256,
    owner: Address,
}

impl AddressResolver {
    /// Creates a new [`AddressResolver`] hashing `init_code`.
    #[must_use]
    pub fn new(deployer: Address, init_code: &[u8], owner: Address) -> Self {
        Self::from_hash(deployer, keccak256(init_code), owner)
    }

    /// Creates a new [`AddressResolver`] from a precomputed init code hash.
    #[must_use]
    pub const fn from_hash(deployer: Address, init_code_hash: B256, owner: Address) -> Self {
        Self {
            deployer,
            init_code_hash,
            owner,
        }
    }

    /// Returns the deploying factory.
    #[must_use]
    pub const fn deployer(&self) -> Address {
        self.deployer
    }

    /// Returns the hash of the token's init code.
    #[must_use]
    pub const fn init_code_hash(&self) -> B256 {
        self.init_code_hash
    }

    /// Returns the owner the salt is bound to.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Derives the address the factory will deploy to with `salt`.
    #[must_use]
    pub fn derive(&self, salt: &B256) -> Address {
        create2_address(
            &self.deployer,
            &effective_salt(&self.owner, salt),
            &self.init_code_hash,
        )
    }

    /// Verification mode: derives the address for `salt` and checks it against `claimed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError::AddressMismatch`] if a claimed address differs from the
    /// derived one.
    pub fn verify(
        &self,
        salt: &B256,
        claimed: Option<&Address>,
    ) -> Result<ResolvedAddress, ConsistencyError> {
        let derived = self.derive(salt);
        if let Some(claimed) = claimed
            && *claimed != derived
        {
            return Err(ConsistencyError::AddressMismatch {
                derived,
                claimed: *claimed,
            });
        }
        Ok(ResolvedAddress {
            address: derived,
            salt: *salt,
        })
    }

    /// Search mode: asks `search` for a salt whose address ends in `suffix`, then re-derives
    /// the address locally and rejects any answer that does not hold up.
    ///
    /// # Errors
    ///
    /// Returns a collaborator error if the search fails, or a consistency error if the
    /// re-derived address differs from the collaborator's claim or misses the suffix.
    pub async fn search(
        &self,
        suffix: &VanitySuffix,
        search: &dyn SaltSearch,
    ) -> Result<ResolvedAddress, LaunchError> {
        let request = SaltSearchRequest {
            deployer: self.deployer,
            init_code_hash: self.init_code_hash,
            owner: self.owner,
            suffix: suffix.to_string(),
        };
        tracing::debug!(suffix = %suffix, deployer = %self.deployer, "Searching vanity salt");

        let answer = search.find(&request).await?;
        let resolved = self.verify(&answer.salt, Some(&answer.address))?;
        if !suffix.matches(&resolved.address) {
            return Err(ConsistencyError::SuffixMismatch {
                address: resolved.address,
                suffix: suffix.to_string(),
            }
            .into());
        }

        tracing::info!(address = %resolved.address, salt = %resolved.salt, "Vanity salt verified");
        Ok(resolved)
    }
}
