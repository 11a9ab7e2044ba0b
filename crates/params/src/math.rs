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

//! Exact conversion between human-authored decimal amounts and on-chain base units.
//!
//! Amounts are never routed through `f64`: scaling uses integer math on the decimal's digit
//! string, so `1.5` tokens at 18 decimals is exactly `1_500_000_000_000_000_000` base units.

use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::{ValidationError, ValidationErrorKind};

/// Maximum decimals s.t. 10^decimals fits in 256 bits.
/// floor(log10(2^256-1)) = 77
pub const MAX_DECIMALS_FIT: u8 = 77;

/// Compute 10^d as U256 (d <= 77).
///
/// # Errors
///
/// Returns an error if `decimals` exceeds [`MAX_DECIMALS_FIT`].
pub fn pow10_u256(decimals: u8) -> Result<U256, ValidationError> {
    check_decimals(decimals)?;
    Ok(U256::from(10u8).pow(U256::from(decimals)))
}

/// Checks that `decimals` can be used as a 256-bit scaling exponent.
///
/// # Errors
///
/// Returns an error if `decimals` exceeds [`MAX_DECIMALS_FIT`].
pub fn check_decimals(decimals: u8) -> Result<(), ValidationError> {
    if decimals > MAX_DECIMALS_FIT {
        return Err(ValidationError::new(
            "decimals",
            ValidationErrorKind::InvalidDecimals {
                decimals,
                max: MAX_DECIMALS_FIT,
            },
        ));
    }
    Ok(())
}

/// Scales a human decimal amount into base units with `decimals` fractional digits.
///
/// # Errors
///
/// Returns an error if the amount is negative, has more fractional digits than `decimals`
/// (which would silently truncate), or overflows 256 bits once scaled.
pub fn decimal_to_base_units(amount: Decimal, decimals: u8) -> Result<U256, ValidationError> {
    let invalid = |reason: &str| {
        ValidationError::new(
            "",
            ValidationErrorKind::InvalidAmount {
                value: amount.to_string(),
                reason: reason.to_string(),
            },
        )
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid("amount must not be negative"));
    }

    let normalized = amount.normalize().abs().to_string();
    let (int_str, frac_str) = normalized
        .split_once('.')
        .unwrap_or((normalized.as_str(), ""));

    if frac_str.len() > decimals as usize {
        return Err(invalid(&format!(
            "more than {decimals} fractional digits would be truncated"
        )));
    }

    let scale = pow10_u256(decimals)?;
    let int_part = U256::from_str(int_str).map_err(|e| invalid(&e.to_string()))?;

    // Right-pad the fraction to exactly `decimals` digits, e.g. "5" at 3 decimals -> 500.
    let frac_part = if frac_str.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{frac_str:0<width$}", width = decimals as usize);
        U256::from_str(&padded).map_err(|e| invalid(&e.to_string()))?
    };

    int_part
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(frac_part))
        .ok_or_else(|| invalid("amount overflows 256 bits"))
}

/// Exact, human-friendly decimal string of a base-unit amount without floating point.
///
/// # Examples
/// - amount=1_000_000_000_000_000_000, decimals=18 -> "1"
/// - amount=12345, decimals=6 -> "0.012345"
///
/// # Errors
///
/// Returns an error if `decimals` exceeds [`MAX_DECIMALS_FIT`].
pub fn base_units_to_decimal_string(amount: U256, decimals: u8) -> Result<String, ValidationError> {
    if decimals == 0 {
        return Ok(amount.to_string());
    }
    let denom = pow10_u256(decimals)?;
    let int_part = amount / denom;
    let frac = amount % denom;

    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    let frac_str = frac_str.trim_end_matches('0');
    if frac_str.is_empty() {
        Ok(int_part.to_string())
    } else {
        Ok(format!("{int_part}.{frac_str}"))
    }
}
