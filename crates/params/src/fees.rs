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

//! Fee policy encoding for the pool's pricing hook.

use alloy_primitives::{
    Bytes, U256,
    aliases::{I24, U24},
};
use alloy_sol_types::{SolValue, sol};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    allocation::BPS_DENOMINATOR,
    error::{ValidationError, ValidationErrorKind},
};

/// Hundredths of a basis point per basis point (fees on-chain are expressed in pips, 1e6 = 100%).
pub const PIPS_PER_BPS: u32 = 100;

sol! {
    /// Per-direction flat fees, in pips.
    struct StaticFeeData {
        uint24 tokenFee;
        uint24 pairedFee;
    }

    /// Volatility-adaptive fee controller parameters.
    struct DynamicFeeData {
        uint24 baseFee;
        uint24 maxLpFee;
        uint256 referenceTickFilterPeriod;
        uint256 resetPeriod;
        int24 resetTickFilter;
        uint256 feeControlNumerator;
        uint24 decayFilterBps;
    }
}

/// Which pricing module a fee policy targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeeModuleKind {
    /// Fixed fees.
    Static,
    /// Volatility-adaptive fees.
    Dynamic,
}

/// Parameters of a volatility-adaptive fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveFee {
    /// Fee charged in calm markets.
    pub base_fee_bps: u16,
    /// Ceiling the fee can rise to.
    pub max_fee_bps: u16,
    /// Per-period decay applied to the volatility accumulator.
    pub decay_bps: u16,
    /// Window over which the reference tick is sampled.
    pub reference_window_secs: u64,
    /// Inactivity window after which the accumulator resets.
    pub reset_window_secs: u64,
    /// Tick movement (in bps of price) that resets the reference.
    pub reset_threshold_bps: u16,
    /// Scaling numerator of the volatility-to-fee curve.
    pub control_numerator: u64,
}

impl AdaptiveFee {
    /// The standard adaptive configuration: 1% base, 5% cap.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            base_fee_bps: 100,
            max_fee_bps: 500,
            decay_bps: 7_500,
            reference_window_secs: 30,
            reset_window_secs: 120,
            reset_threshold_bps: 200,
            control_numerator: 500_000_000,
        }
    }
}

/// A fee policy as authored by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeePolicy {
    /// The same fixed fee in both swap directions.
    Flat {
        /// Fee in basis points.
        fee_bps: u16,
    },
    /// Fixed fees that differ by swap direction.
    Static {
        /// Fee on swaps paying in the launched token.
        token_fee_bps: u16,
        /// Fee on swaps paying in the paired asset.
        paired_fee_bps: u16,
    },
    /// Volatility-adaptive fee.
    Adaptive(AdaptiveFee),
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::Flat { fee_bps: 100 }
    }
}

/// A fee policy encoded for its pricing module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedFeePolicy {
    /// Module the data is addressed to.
    pub module: FeeModuleKind,
    /// ABI-encoded module parameters.
    pub data: Bytes,
}

impl FeePolicy {
    /// Returns the pricing module this policy targets.
    #[must_use]
    pub const fn module(&self) -> FeeModuleKind {
        match self {
            Self::Flat { .. } | Self::Static { .. } => FeeModuleKind::Static,
            Self::Adaptive(_) => FeeModuleKind::Dynamic,
        }
    }

    /// Checks every basis-point field is at most 10000 and the adaptive base fee does not
    /// exceed its max fee. Durations are unsigned and therefore never negative.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first field out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Flat { fee_bps } => check_bps("fee_bps", *fee_bps),
            Self::Static {
                token_fee_bps,
                paired_fee_bps,
            } => {
                check_bps("token_fee_bps", *token_fee_bps)?;
                check_bps("paired_fee_bps", *paired_fee_bps)
            }
            Self::Adaptive(fee) => {
                check_bps("base_fee_bps", fee.base_fee_bps)?;
                check_bps("max_fee_bps", fee.max_fee_bps)?;
                check_bps("decay_bps", fee.decay_bps)?;
                check_bps("reset_threshold_bps", fee.reset_threshold_bps)?;
                if fee.base_fee_bps > fee.max_fee_bps {
                    return Err(ValidationError::new(
                        "base_fee_bps",
                        ValidationErrorKind::BaseFeeAboveMax {
                            base_fee_bps: fee.base_fee_bps,
                            max_fee_bps: fee.max_fee_bps,
                        },
                    ));
                }
                Ok(())
            }
        }
    }

    /// Validates and encodes the policy for its pricing module.
    ///
    /// # Errors
    ///
    /// Returns an error if [`FeePolicy::validate`] fails.
    pub fn encode(&self) -> Result<EncodedFeePolicy, ValidationError> {
        self.validate()?;

        let data = match self {
            Self::Flat { fee_bps } => StaticFeeData {
                tokenFee: to_pips(*fee_bps),
                pairedFee: to_pips(*fee_bps),
            }
            .abi_encode(),
            Self::Static {
                token_fee_bps,
                paired_fee_bps,
            } => StaticFeeData {
                tokenFee: to_pips(*token_fee_bps),
                pairedFee: to_pips(*paired_fee_bps),
            }
            .abi_encode(),
            Self::Adaptive(fee) => DynamicFeeData {
                baseFee: to_pips(fee.base_fee_bps),
                maxLpFee: to_pips(fee.max_fee_bps),
                referenceTickFilterPeriod: U256::from(fee.reference_window_secs),
                resetPeriod: U256::from(fee.reset_window_secs),
                resetTickFilter: I24::try_from(i32::from(fee.reset_threshold_bps)).map_err(
                    |e| {
                        ValidationError::new(
                            "reset_threshold_bps",
                            ValidationErrorKind::Invalid(e.to_string()),
                        )
                    },
                )?,
                feeControlNumerator: U256::from(fee.control_numerator),
                decayFilterBps: U24::from(u32::from(fee.decay_bps)),
            }
            .abi_encode(),
        };

        Ok(EncodedFeePolicy {
            module: self.module(),
            data: data.into(),
        })
    }
}

fn check_bps(field: &str, value: u16) -> Result<(), ValidationError> {
    if u32::from(value) > BPS_DENOMINATOR {
        return Err(ValidationError::new(
            field,
            ValidationErrorKind::OutOfRange {
                value: u64::from(value),
                max: u64::from(BPS_DENOMINATOR),
            },
        ));
    }
    Ok(())
}

// Validated bps are <= 10_000, so pips are <= 1_000_000 < 2^24
fn to_pips(bps: u16) -> U24 {
    U24::from(u32::from(bps) * PIPS_PER_BPS)
}
