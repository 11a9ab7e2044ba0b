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

//! Conversion of a target valuation into a starting tick on the pool's logarithmic price grid.
//!
//! The launched token always has the same total supply, so a valuation `v` (denominated in the
//! paired asset) implies a per-token price of `v / supply`. The tick is the floor of
//! `log_{1.0001}(price)`, floored again onto the grid spacing. Flooring never overshoots: the
//! pool opens at or slightly below the requested valuation.

use std::fmt::Display;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ValidationError, ValidationErrorKind},
    math::check_decimals,
};

/// Minimum valid tick value for Uniswap V3/V4 style pools.
pub const MIN_TICK: i32 = -887_272;
/// Maximum valid tick value for Uniswap V3/V4 style pools.
pub const MAX_TICK: i32 = -MIN_TICK;
/// Price ratio between adjacent ticks.
pub const TICK_BASE: f64 = 1.0001;
/// Grid spacing used by launched pools unless a schema says otherwise.
pub const DEFAULT_TICK_SPACING: i32 = 200;
/// Decimals of every launched token.
pub const TOKEN_DECIMALS: u8 = 18;
/// Total supply of every launched token, in whole tokens.
pub const TOKEN_SUPPLY: u64 = 100_000_000_000;
/// Per-token share of the total supply (`1 / TOKEN_SUPPLY`).
pub const SUPPLY_FACTOR: f64 = 1e-11;

/// Returns the total supply in base units (100 billion tokens at 18 decimals).
#[must_use]
pub fn token_supply_base_units() -> U256 {
    U256::from(TOKEN_SUPPLY) * U256::from(10u8).pow(U256::from(TOKEN_DECIMALS))
}

/// A target market capitalization with the decimal precision of both pool assets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Target market capitalization denominated in whole units of the paired asset.
    pub value: f64,
    /// Decimals of the launched token.
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,
    /// Decimals of the paired asset, `None` when unknown (treated as equal to the token's).
    #[serde(default)]
    pub paired_decimals: Option<u8>,
}

const fn default_token_decimals() -> u8 {
    TOKEN_DECIMALS
}

impl Valuation {
    /// Creates a new [`Valuation`] for a standard 18-decimal token.
    #[must_use]
    pub const fn new(value: f64, paired_decimals: Option<u8>) -> Self {
        Self {
            value,
            token_decimals: TOKEN_DECIMALS,
            paired_decimals,
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        if !(self.value.is_finite() && self.value > 0.0) {
            return Err(ValidationError::new(
                "value",
                ValidationErrorKind::InvalidValuation { value: self.value },
            ));
        }
        check_decimals(self.token_decimals).map_err(|e| e.renamed("token_decimals"))?;
        if let Some(paired) = self.paired_decimals {
            check_decimals(paired).map_err(|e| e.renamed("paired_decimals"))?;
        }
        Ok(())
    }

    fn decimals_shift(&self) -> i32 {
        let paired = self.paired_decimals.unwrap_or(self.token_decimals);
        i32::from(paired) - i32::from(self.token_decimals)
    }
}

/// A starting tick together with the grid spacing it was aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingTick {
    /// The tick, always a multiple of `tick_spacing`.
    pub tick: i32,
    /// The grid spacing.
    pub tick_spacing: i32,
}

impl Display for StartingTick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StartingTick(tick={}, spacing={})", self.tick, self.tick_spacing)
    }
}

/// The two historical valuation-to-tick conversions.
///
/// They are kept side by side because pools already deployed with the legacy conversion must
/// keep reproducing the same ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum TickMath {
    /// Wrapped-native-only conversion: assumes an 18-decimal paired asset and the default spacing.
    Legacy,
    /// Decimal-aware conversion with a caller-selected spacing.
    DecimalsAware {
        /// Grid spacing to align to.
        tick_spacing: i32,
    },
}

impl Default for TickMath {
    fn default() -> Self {
        Self::DecimalsAware {
            tick_spacing: DEFAULT_TICK_SPACING,
        }
    }
}

impl TickMath {
    /// Returns the grid spacing this conversion aligns to.
    #[must_use]
    pub const fn tick_spacing(&self) -> i32 {
        match self {
            Self::Legacy => DEFAULT_TICK_SPACING,
            Self::DecimalsAware { tick_spacing } => *tick_spacing,
        }
    }

    /// Converts `valuation` to the starting tick of the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The valuation is not finite and positive.
    /// - A decimal count exceeds the 256-bit scaling capacity.
    /// - The spacing is not within `1..=MAX_TICK`.
    /// - The resulting tick lies outside the valid tick domain.
    pub fn starting_tick(&self, valuation: &Valuation) -> Result<StartingTick, ValidationError> {
        valuation.check()?;
        let tick_spacing = self.tick_spacing();
        check_tick_spacing(tick_spacing)?;

        let mut price = valuation.value * SUPPLY_FACTOR;
        if let Self::DecimalsAware { .. } = self {
            // Price of one base unit of token in base units of the paired asset
            let shift = valuation.decimals_shift();
            if shift != 0 {
                price *= 10f64.powi(shift);
            }
        }

        let raw_tick = price.ln() / TICK_BASE.ln();
        if !raw_tick.is_finite() {
            return Err(ValidationError::new(
                "value",
                ValidationErrorKind::InvalidValuation {
                    value: valuation.value,
                },
            ));
        }

        let floored = raw_tick.floor() as i64;
        let tick = floored.div_euclid(i64::from(tick_spacing)) * i64::from(tick_spacing);
        if tick < i64::from(MIN_TICK) || tick > i64::from(MAX_TICK) {
            return Err(ValidationError::new(
                "value",
                ValidationErrorKind::TickOutOfRange {
                    tick,
                    min: MIN_TICK,
                    max: MAX_TICK,
                },
            ));
        }

        Ok(StartingTick {
            tick: tick as i32,
            tick_spacing,
        })
    }

    /// Returns the valuation implied by a tick, the inverse of [`TickMath::starting_tick`]
    /// before flooring.
    #[must_use]
    pub fn valuation_at_tick(&self, tick: i32, valuation: &Valuation) -> f64 {
        let mut price = price_at_tick(tick);
        if let Self::DecimalsAware { .. } = self {
            let shift = valuation.decimals_shift();
            if shift != 0 {
                price /= 10f64.powi(shift);
            }
        }
        price / SUPPLY_FACTOR
    }
}

/// Checks that a grid spacing is positive and within the tick domain.
///
/// # Errors
///
/// Returns an error if `tick_spacing` is not within `1..=MAX_TICK`.
pub fn check_tick_spacing(tick_spacing: i32) -> Result<(), ValidationError> {
    if !(1..=MAX_TICK).contains(&tick_spacing) {
        return Err(ValidationError::new(
            "tick_spacing",
            ValidationErrorKind::InvalidTickSpacing {
                spacing: tick_spacing,
                max: MAX_TICK,
            },
        ));
    }
    Ok(())
}

/// Floors `tick` to the nearest multiple of `tick_spacing` at or below it.
#[must_use]
pub const fn floor_to_spacing(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing) * tick_spacing
}

/// Returns the largest tick that is a multiple of `tick_spacing` within the tick domain.
#[must_use]
pub const fn max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}

/// Returns the smallest tick that is a multiple of `tick_spacing` within the tick domain.
#[must_use]
pub const fn min_usable_tick(tick_spacing: i32) -> i32 {
    -max_usable_tick(tick_spacing)
}

/// Returns the raw price ratio at `tick` (`1.0001^tick`).
#[must_use]
pub fn price_at_tick(tick: i32) -> f64 {
    TICK_BASE.powi(tick)
}
