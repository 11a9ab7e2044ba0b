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

//! Human-authored launch configuration.
//!
//! A configuration names its factory generation once, in the `generation` tag, and carries
//! only the fields that generation understands. Every optional field documents its default.

use std::{fs, path::Path};

use alloy::primitives::{Address, B256};
use anyhow::Context;
use launchkit_params::{
    DuplicatePolicy, FeePolicy, FeePreference, Position,
    allocation::PositionPreset,
    merkle::HumanAllocation,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schema::ContractGeneration;

/// Default starting valuation in whole units of the paired asset.
pub const DEFAULT_STARTING_VALUATION: f64 = 10.0;

/// A launch configuration for one factory generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "generation")]
pub enum LaunchConfig {
    /// Legacy single-position factory.
    #[serde(rename = "v3_1")]
    V3_1(LegacyLaunchConfig),
    /// Hook-based factory.
    #[serde(rename = "v4")]
    V4(V4LaunchConfig),
}

impl LaunchConfig {
    /// Returns the selected factory generation.
    #[must_use]
    pub const fn generation(&self) -> ContractGeneration {
        match self {
            Self::V3_1(_) => ContractGeneration::V3_1,
            Self::V4(_) => ContractGeneration::V4,
        }
    }

    /// Returns the token section.
    #[must_use]
    pub const fn token(&self) -> &TokenSpec {
        match self {
            Self::V3_1(config) => &config.token,
            Self::V4(config) => &config.token,
        }
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid launch configuration.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse launch configuration")
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid launch configuration.
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse launch configuration")
    }

    /// Loads a configuration file, choosing JSON for `.json` files and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read launch configuration {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }
}

/// Token identity and deployment address options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    /// Token admin; also the owner the deployment salt is bound to.
    pub admin: Address,
    /// Image URL. Defaults to empty.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub metadata: TokenMetadata,
    #[serde(default)]
    pub context: TokenContext,
    /// Salt to deploy with. Defaults to the zero salt unless a vanity suffix is requested.
    #[serde(default)]
    pub salt: Option<B256>,
    /// Required trailing hex digits of the token address.
    #[serde(default)]
    pub vanity_suffix: Option<String>,
    /// Address the caller expects; any disagreement with the derived address is fatal.
    #[serde(default)]
    pub expected_address: Option<Address>,
    /// Chain the token originates from. Defaults to the schema's chain.
    #[serde(default)]
    pub originating_chain_id: Option<u64>,
}

/// Descriptive token metadata, stored on-chain as a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct TokenMetadata {
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "socialMediaUrls")]
    pub social_media_urls: Vec<SocialMediaUrl>,
    #[serde(default, alias = "auditUrls")]
    pub audit_urls: Vec<String>,
}

/// A social media link of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMediaUrl {
    pub platform: String,
    pub url: String,
}

/// Where the launch originated, stored on-chain as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct TokenContext {
    #[serde(default = "default_interface")]
    pub interface: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default, alias = "messageId")]
    pub message_id: String,
    #[serde(default)]
    pub id: String,
}

fn default_interface() -> String {
    "launchkit".to_string()
}

impl Default for TokenContext {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            platform: String::new(),
            message_id: String::new(),
            id: String::new(),
        }
    }
}

const fn default_starting_valuation() -> f64 {
    DEFAULT_STARTING_VALUATION
}

const fn default_true() -> bool {
    true
}

/// Pool pairing, starting price and liquidity layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSpec {
    /// Paired asset. Defaults to the schema's wrapped native asset.
    #[serde(default)]
    pub paired_token: Option<Address>,
    /// Decimals of the paired asset. Defaults to 18 for the wrapped native asset, otherwise
    /// to the token's decimals.
    #[serde(default)]
    pub paired_decimals: Option<u8>,
    /// Target market capitalization at launch, in whole paired-asset units.
    #[serde(default = "default_starting_valuation")]
    pub starting_valuation: f64,
    /// Grid spacing. Defaults to 200.
    #[serde(default)]
    pub tick_spacing: Option<i32>,
    /// Defaults to the standard single full-range position.
    #[serde(default)]
    pub positions: PositionLayout,
}

impl Default for PoolSpec {
    fn default() -> Self {
        Self {
            paired_token: None,
            paired_decimals: None,
            starting_valuation: DEFAULT_STARTING_VALUATION,
            tick_spacing: None,
            positions: PositionLayout::default(),
        }
    }
}

/// How the liquidity positions are authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PositionLayout {
    /// A named layout shifted to the starting tick.
    Preset { preset: PositionPreset },
    /// Explicit tick ranges.
    Ticks { positions: Vec<Position> },
    /// Ranges given as market capitalizations.
    Valuations { ranges: Vec<ValuationRange> },
}

impl Default for PositionLayout {
    fn default() -> Self {
        Self::Preset {
            preset: PositionPreset::Standard,
        }
    }
}

/// A position bounded by market capitalizations instead of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationRange {
    pub lower_valuation: f64,
    /// Open-ended (up to the max usable tick) when omitted.
    #[serde(default)]
    pub upper_valuation: Option<f64>,
    pub bps: u16,
}

/// One reward recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSpec {
    pub recipient: Address,
    /// Defaults to the recipient.
    #[serde(default)]
    pub admin: Option<Address>,
    /// Share of LP fees. Either every entry sets it or none does (even split).
    #[serde(default)]
    pub bps: Option<u16>,
    #[serde(default)]
    pub preference: FeePreference,
}

/// Locked supply carve-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSpec {
    pub bps: u16,
    /// Defaults to the token admin.
    #[serde(default)]
    pub admin: Option<Address>,
    pub lockup_seconds: u64,
    #[serde(default)]
    pub vesting_seconds: u64,
}

/// Supply carve-out claimable by a list of beneficiaries via Merkle proofs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropSpec {
    pub bps: u16,
    /// Defaults to the token admin.
    #[serde(default)]
    pub admin: Option<Address>,
    pub lockup_seconds: u64,
    #[serde(default)]
    pub vesting_seconds: u64,
    /// Beneficiaries with amounts in whole tokens.
    pub entries: Vec<HumanAllocation>,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Initial purchase made with the paired asset at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevBuySpec {
    /// Amount of the paired asset, in whole units.
    pub paired_amount: Decimal,
    /// Defaults to the token admin.
    #[serde(default)]
    pub recipient: Option<Address>,
    /// Minimum tokens out, in whole tokens. Defaults to zero.
    #[serde(default)]
    pub amount_out_min: Decimal,
}

/// Configuration for the hook-based factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V4LaunchConfig {
    pub token: TokenSpec,
    #[serde(default)]
    pub pool: PoolSpec,
    /// Defaults to a flat 1% fee.
    #[serde(default)]
    pub fees: FeePolicy,
    /// Defaults to the token admin receiving all rewards.
    #[serde(default)]
    pub rewards: Vec<RewardSpec>,
    #[serde(default)]
    pub vault: Option<VaultSpec>,
    #[serde(default)]
    pub airdrop: Option<AirdropSpec>,
    #[serde(default)]
    pub dev_buy: Option<DevBuySpec>,
    /// Route the first blocks of trading through the MEV module. Defaults to `true`.
    #[serde(default = "default_true")]
    pub mev_protection: bool,
}

/// Pool settings of the legacy factory, which always assumes an 18-decimal paired asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyPoolSpec {
    #[serde(default)]
    pub paired_token: Option<Address>,
    #[serde(default = "default_starting_valuation")]
    pub starting_valuation: f64,
}

impl Default for LegacyPoolSpec {
    fn default() -> Self {
        Self {
            paired_token: None,
            starting_valuation: DEFAULT_STARTING_VALUATION,
        }
    }
}

/// The legacy two-party (creator, interface) reward split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRewardSpec {
    /// Creator share in whole percent. Defaults to 80.
    #[serde(default = "default_creator_percent")]
    pub creator_percent: u8,
    /// Defaults to the token admin.
    #[serde(default)]
    pub creator_recipient: Option<Address>,
    /// Defaults to the token admin.
    #[serde(default)]
    pub interface_admin: Option<Address>,
    /// Defaults to the interface admin.
    #[serde(default)]
    pub interface_recipient: Option<Address>,
}

const fn default_creator_percent() -> u8 {
    80
}

impl Default for LegacyRewardSpec {
    fn default() -> Self {
        Self {
            creator_percent: default_creator_percent(),
            creator_recipient: None,
            interface_admin: None,
            interface_recipient: None,
        }
    }
}

/// The legacy vault, expressed in whole percent of supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyVaultSpec {
    pub percent: u8,
    pub lockup_seconds: u64,
}

/// Configuration for the legacy factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyLaunchConfig {
    pub token: TokenSpec,
    #[serde(default)]
    pub pool: LegacyPoolSpec,
    /// Only a flat 1% fee is supported.
    #[serde(default)]
    pub fees: FeePolicy,
    #[serde(default)]
    pub rewards: LegacyRewardSpec,
    #[serde(default)]
    pub vault: Option<LegacyVaultSpec>,
    /// Not supported by this generation; rejected when present.
    #[serde(default)]
    pub airdrop: Option<AirdropSpec>,
    /// Not supported by this generation; rejected when present.
    #[serde(default)]
    pub dev_buy: Option<DevBuySpec>,
}
