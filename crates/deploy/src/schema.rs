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

//! Versioned catalogue of deployed factory contracts.
//!
//! A schema records where each factory generation and its modules live on a chain, along with
//! the token creation bytecode used to predict deployment addresses. The catalogue is supplied
//! by the caller (typically from a TOML file) and never modified by the compiler.

use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::{Address, Bytes};
use anyhow::Context;
use launchkit_params::{FeeModuleKind, StateError};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A factory generation. Generations have incompatible call shapes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum ContractGeneration {
    /// Single-position factory with a fixed creator/interface reward split.
    #[serde(rename = "v3_1")]
    #[strum(serialize = "v3_1")]
    V3_1,
    /// Hook-based factory with multi-position lockers and supply extensions.
    #[serde(rename = "v4")]
    #[strum(serialize = "v4")]
    V4,
}

/// Structural limits enforced by a generation's contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaLimits {
    /// Maximum liquidity positions per locker.
    pub max_positions: usize,
    /// Maximum reward recipients.
    pub max_rewards: usize,
    /// Maximum extensions per deployment.
    pub max_extensions: usize,
    /// Maximum share of supply (bps) all extensions together may take.
    pub max_extension_bps: u32,
}

impl ContractGeneration {
    /// Returns the limits the generation's contracts enforce on-chain.
    #[must_use]
    pub const fn default_limits(&self) -> SchemaLimits {
        match self {
            Self::V3_1 => SchemaLimits {
                max_positions: 1,
                max_rewards: 2,
                max_extensions: 1,
                max_extension_bps: 3_000,
            },
            Self::V4 => SchemaLimits {
                max_positions: 7,
                max_rewards: 7,
                max_extensions: 10,
                max_extension_bps: 9_000,
            },
        }
    }
}

/// Pricing hook addresses per fee module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookAddresses {
    pub static_fee: Option<Address>,
    pub dynamic_fee: Option<Address>,
}

/// Supply extension module addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionAddresses {
    pub vault: Option<Address>,
    pub airdrop: Option<Address>,
    pub dev_buy: Option<Address>,
}

/// Call shape and module addresses of one factory generation on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSchema {
    /// Generation this schema describes.
    pub generation: ContractGeneration,
    /// Chain the contracts are deployed on.
    pub chain_id: u64,
    /// Factory contract; also the CREATE2 deployer of the token.
    pub factory: Address,
    /// Creation bytecode of the token contract (without constructor arguments).
    pub token_creation_code: Bytes,
    /// Wrapped native asset, the default paired token.
    pub wrapped_native: Address,
    /// Pricing hooks (v4 only).
    #[serde(default)]
    pub hooks: HookAddresses,
    /// Liquidity locker (v4 only).
    #[serde(default)]
    pub locker: Option<Address>,
    /// MEV protection module (v4 only).
    #[serde(default)]
    pub mev_module: Option<Address>,
    /// Supply extensions (v4 only).
    #[serde(default)]
    pub extensions: ExtensionAddresses,
    /// Overrides of the generation's default limits.
    #[serde(default)]
    pub limits: Option<SchemaLimits>,
}

impl ContractSchema {
    /// Returns the effective structural limits.
    #[must_use]
    pub fn limits(&self) -> SchemaLimits {
        self.limits.unwrap_or_else(|| self.generation.default_limits())
    }

    /// Returns the hook implementing `module`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema has no hook configured for the module.
    pub fn hook(&self, module: FeeModuleKind) -> Result<Address, StateError> {
        let hook = match module {
            FeeModuleKind::Static => self.hooks.static_fee,
            FeeModuleKind::Dynamic => self.hooks.dynamic_fee,
        };
        self.require(hook, &format!("{module} fee hook"))
    }

    /// Returns the locker.
    ///
    /// # Errors
    ///
    /// Returns an error if no locker is configured.
    pub fn locker(&self) -> Result<Address, StateError> {
        self.require(self.locker, "locker")
    }

    /// Returns the MEV module.
    ///
    /// # Errors
    ///
    /// Returns an error if no MEV module is configured.
    pub fn mev_module(&self) -> Result<Address, StateError> {
        self.require(self.mev_module, "mev module")
    }

    /// Returns the vault extension.
    ///
    /// # Errors
    ///
    /// Returns an error if no vault extension is configured.
    pub fn vault_extension(&self) -> Result<Address, StateError> {
        self.require(self.extensions.vault, "vault extension")
    }

    /// Returns the airdrop extension.
    ///
    /// # Errors
    ///
    /// Returns an error if no airdrop extension is configured.
    pub fn airdrop_extension(&self) -> Result<Address, StateError> {
        self.require(self.extensions.airdrop, "airdrop extension")
    }

    /// Returns the dev buy extension.
    ///
    /// # Errors
    ///
    /// Returns an error if no dev buy extension is configured.
    pub fn dev_buy_extension(&self) -> Result<Address, StateError> {
        self.require(self.extensions.dev_buy, "dev buy extension")
    }

    fn require(&self, address: Option<Address>, component: &str) -> Result<Address, StateError> {
        address.ok_or_else(|| StateError::MissingComponent {
            generation: self.generation.to_string(),
            component: component.to_string(),
        })
    }
}

/// Read-only table of contract schemas keyed by generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalogue {
    schemas: BTreeMap<ContractGeneration, ContractSchema>,
}

impl SchemaCatalogue {
    /// Creates a new [`SchemaCatalogue`] from a list of schemas, keyed by their own generation.
    #[must_use]
    pub fn new(schemas: impl IntoIterator<Item = ContractSchema>) -> Self {
        Self {
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.generation, schema))
                .collect(),
        }
    }

    /// Parses a catalogue from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid catalogue.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse contract schema catalogue")
    }

    /// Loads a catalogue from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema catalogue {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Returns the generations with a registered schema.
    pub fn generations(&self) -> impl Iterator<Item = ContractGeneration> + '_ {
        self.schemas.keys().copied()
    }

    /// Selects the schema registered for `generation`.
    ///
    /// # Errors
    ///
    /// Returns an error if no schema is registered, or the registered schema describes a
    /// different generation.
    pub fn select(&self, generation: ContractGeneration) -> Result<&ContractSchema, StateError> {
        let schema = self
            .schemas
            .get(&generation)
            .ok_or_else(|| StateError::SchemaNotFound {
                generation: generation.to_string(),
            })?;

        if schema.generation != generation {
            return Err(StateError::SchemaMismatch {
                requested: generation.to_string(),
                found: schema.generation.to_string(),
            });
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    const CATALOGUE: &str = r#"
[schemas.v4]
generation = "v4"
chain_id = 8453
factory = "0xe85a59c628f7d27878aceb4bf3b35733630083a9"
token_creation_code = "0x6080604052"
wrapped_native = "0x4200000000000000000000000000000000000006"
locker = "0x29d17c1a8d851d7d4ca97fae97acadb398d9cce0"
mev_module = "0xe143f9872a33c955f23cf442bb4b1efb3a7402a2"

[schemas.v4.hooks]
static_fee = "0xdd5eeaff7bd481ad55db083062b13a3cdf0a68cc"

[schemas.v4.extensions]
vault = "0x8e845ead15737bf71904a30bddd3aee76d6adf6c"

[schemas.v3_1]
generation = "v3_1"
chain_id = 8453
factory = "0x2a787b2362021cc3eea3c24c4748a6cd5b687382"
token_creation_code = "0x6080604052"
wrapped_native = "0x4200000000000000000000000000000000000006"
"#;

    #[rstest]
    fn test_catalogue_from_toml() {
        let catalogue = SchemaCatalogue::from_toml_str(CATALOGUE).unwrap();
        assert_eq!(
            catalogue.generations().collect::<Vec<_>>(),
            vec![ContractGeneration::V3_1, ContractGeneration::V4]
        );

        let v4 = catalogue.select(ContractGeneration::V4).unwrap();
        assert_eq!(v4.chain_id, 8453);
        assert_eq!(v4.token_creation_code.len(), 5);
        assert_eq!(v4.limits().max_positions, 7);
        assert!(v4.hook(FeeModuleKind::Static).is_ok());
        assert_eq!(
            v4.hook(FeeModuleKind::Dynamic).unwrap_err(),
            StateError::MissingComponent {
                generation: "v4".to_string(),
                component: "dynamic fee hook".to_string(),
            }
        );
        assert!(v4.airdrop_extension().is_err());
    }

    #[rstest]
    fn test_missing_generation_is_state_error() {
        let mut catalogue = SchemaCatalogue::from_toml_str(CATALOGUE).unwrap();
        catalogue.schemas.remove(&ContractGeneration::V3_1);
        assert_eq!(
            catalogue.select(ContractGeneration::V3_1).unwrap_err(),
            StateError::SchemaNotFound {
                generation: "v3_1".to_string()
            }
        );
    }

    #[rstest]
    fn test_mislabelled_schema_is_state_error() {
        let content = CATALOGUE.replacen(r#"generation = "v4""#, r#"generation = "v3_1""#, 1);
        let catalogue = SchemaCatalogue::from_toml_str(&content).unwrap();
        assert!(matches!(
            catalogue.select(ContractGeneration::V4).unwrap_err(),
            StateError::SchemaMismatch { .. }
        ));
    }

    #[rstest]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemas.toml");
        std::fs::write(&path, CATALOGUE).unwrap();
        assert_eq!(
            SchemaCatalogue::from_path(&path).unwrap(),
            SchemaCatalogue::from_toml_str(CATALOGUE).unwrap()
        );
        assert!(SchemaCatalogue::from_path(dir.path().join("missing.toml")).is_err());
    }

    #[rstest]
    #[case("v4", ContractGeneration::V4)]
    #[case("v3_1", ContractGeneration::V3_1)]
    fn test_generation_round_trips_through_str(
        #[case] label: &str,
        #[case] generation: ContractGeneration,
    ) {
        assert_eq!(ContractGeneration::from_str(label).unwrap(), generation);
        assert_eq!(generation.to_string(), label);
    }
}
