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

//! The compiled, ready-to-submit deployment.

use std::fmt::Display;

use alloy::primitives::{Address, B256, Bytes, U256};
use anyhow::Context;
use launchkit_params::{
    FeeModuleKind, FeePolicy, Position, SplitEntry, math::base_units_to_decimal_string,
    merkle::MerkleTreeDump,
};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::{
    compiler::NATIVE_DECIMALS, registry::AllocationRegistration, schema::ContractGeneration,
};

/// Supply extension kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExtensionKind {
    Vault,
    Airdrop,
    DevBuy,
}

/// One supply extension as it will be invoked by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSummary {
    pub kind: ExtensionKind,
    pub address: Address,
    pub bps: u16,
    pub msg_value: U256,
}

/// Human-readable digest of what a plan deploys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub name: String,
    pub symbol: String,
    pub admin: Address,
    pub paired_token: Address,
    /// Pricing module, `None` for the legacy factory's fixed fee tier.
    pub fee_module: Option<FeeModuleKind>,
    pub fee: FeePolicy,
    pub positions: Vec<Position>,
    pub rewards: Vec<SplitEntry>,
    pub extensions: Vec<ExtensionSummary>,
}

impl Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({}) admin={}", self.name, self.symbol, self.admin)?;
        writeln!(f, "  paired with {}", self.paired_token)?;
        for position in &self.positions {
            writeln!(
                f,
                "  position [{}, {}) {} bps",
                position.tick_lower, position.tick_upper, position.bps
            )?;
        }
        for reward in &self.rewards {
            writeln!(
                f,
                "  reward {} {} bps ({})",
                reward.recipient, reward.bps, reward.preference
            )?;
        }
        for extension in &self.extensions {
            let value = base_units_to_decimal_string(extension.msg_value, NATIVE_DECIMALS)
                .map_err(|_| std::fmt::Error)?;
            writeln!(
                f,
                "  {} at {} {} bps value={value}",
                extension.kind, extension.address, extension.bps
            )?;
        }
        Ok(())
    }
}

/// A compiled deployment: the exact transaction to submit plus everything needed to audit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub generation: ContractGeneration,
    pub chain_id: u64,
    /// Factory the transaction is sent to.
    pub target: Address,
    /// ABI-encoded `deployToken` call.
    pub calldata: Bytes,
    /// Native value to attach.
    pub value: U256,
    /// Address the token will be deployed to.
    pub predicted_address: Address,
    /// Salt embedded in the calldata.
    pub salt: B256,
    pub init_code_hash: B256,
    pub starting_tick: i32,
    pub tick_spacing: i32,
    /// Market capitalization implied by the aligned starting tick.
    pub effective_valuation: f64,
    /// Root of the airdrop allocation tree, if any.
    pub merkle_root: Option<B256>,
    /// Full airdrop tree, kept so proofs can be served after deployment.
    pub allocation_tree: Option<MerkleTreeDump>,
    pub summary: PlanSummary,
}

impl DeploymentPlan {
    /// Serializes the plan as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize deployment plan")
    }

    /// Returns the registration of the plan's allocation tree, if it has one.
    #[must_use]
    pub fn allocation_registration(&self) -> Option<AllocationRegistration> {
        let tree = self.allocation_tree.as_ref()?;
        let merkle_root = self.merkle_root?;
        Some(AllocationRegistration {
            contract_address: self.predicted_address,
            merkle_root,
            tree: tree.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use launchkit_params::FeePreference;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_summary_display_renders_native_value() {
        let summary = PlanSummary {
            name: "Launch".to_string(),
            symbol: "LNCH".to_string(),
            admin: Address::repeat_byte(0xad),
            paired_token: Address::repeat_byte(0x42),
            fee_module: Some(FeeModuleKind::Static),
            fee: FeePolicy::default(),
            positions: vec![Position::new(-230_400, 887_200, 10_000)],
            rewards: vec![SplitEntry {
                recipient: Address::repeat_byte(0xad),
                admin: Address::repeat_byte(0xad),
                bps: 10_000,
                preference: FeePreference::Both,
            }],
            extensions: vec![ExtensionSummary {
                kind: ExtensionKind::DevBuy,
                address: Address::repeat_byte(0x73),
                bps: 0,
                msg_value: U256::from(250_000_000_000_000_000u64),
            }],
        };

        let rendered = summary.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "  position [-230400, 887200) 10000 bps");
        assert!(lines[3].ends_with("10000 bps (both)"));
        assert!(lines[4].starts_with("  dev_buy at "));
        assert!(lines[4].ends_with(" 0 bps value=0.25"));
    }
}
