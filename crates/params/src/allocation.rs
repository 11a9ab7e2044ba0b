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

//! Basis-point partition checks shared by liquidity positions, reward splits and supply
//! carve-outs.
//!
//! [`validate_shares`] only sees numbers and a [`SharePolicy`]; the structural checks for each
//! shape ([`validate_positions`], [`validate_splits`]) delegate their sum check to it.

use std::collections::HashMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    error::{ValidationError, ValidationErrorKind},
    tick_math::{MAX_TICK, MIN_TICK, check_tick_spacing, floor_to_spacing, max_usable_tick},
};

/// Basis points making up 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Total-sum rule for a basis-point partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharePolicy {
    /// Shares must sum to exactly this total.
    Exact(u32),
    /// Shares may sum to any value up to this total (the residual goes elsewhere).
    AtMost(u32),
}

impl SharePolicy {
    /// Shares must cover exactly 100%.
    pub const FULL: Self = Self::Exact(BPS_DENOMINATOR);

    /// Returns the limit the running total must not exceed.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        match self {
            Self::Exact(total) | Self::AtMost(total) => *total,
        }
    }
}

/// A precise description of how a partition misses its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShareViolation {
    /// The shares sum to less than the exact total required.
    #[error("shares sum to {total} bps, {missing} bps short of {expected}")]
    Shortfall {
        /// Sum of all shares.
        total: u32,
        /// Required total.
        expected: u32,
        /// How far the sum falls short.
        missing: u32,
    },
    /// The entry at `index` pushes the running total over the limit.
    #[error("entry {index} raises the total to {total} bps, {excess} bps over {limit}")]
    Excess {
        /// Index of the first entry at which the running total exceeds the limit.
        index: usize,
        /// Running total including that entry.
        total: u64,
        /// The limit.
        limit: u32,
        /// How far the running total exceeds the limit.
        excess: u64,
    },
}

/// Checks a list of basis-point shares against `policy`, returning their sum.
///
/// # Errors
///
/// Returns a [`ShareViolation`] describing the first entry that overshoots the limit, or the
/// shortfall when an exact total is not reached.
pub fn validate_shares<I>(shares: I, policy: SharePolicy) -> Result<u32, ShareViolation>
where
    I: IntoIterator<Item = u32>,
{
    let limit = policy.limit();
    let mut total: u64 = 0;

    for (index, share) in shares.into_iter().enumerate() {
        total += u64::from(share);
        if total > u64::from(limit) {
            return Err(ShareViolation::Excess {
                index,
                total,
                limit,
                excess: total - u64::from(limit),
            });
        }
    }

    // Bounded by `limit` from here on
    let total = total as u32;
    match policy {
        SharePolicy::Exact(expected) if total < expected => Err(ShareViolation::Shortfall {
            total,
            expected,
            missing: expected - total,
        }),
        _ => Ok(total),
    }
}

/// Splits `total` proportionally to `weights` so the parts sum to exactly `total`.
///
/// Uses the largest-remainder rule: every part gets the floor of its exact quota, then the
/// leftover units go to the largest fractional remainders, ties broken by position (earliest
/// first). Returns all zeros when every weight is zero.
#[must_use]
pub fn apportion(weights: &[u64], total: u32) -> Vec<u32> {
    let weight_sum: u128 = weights.iter().map(|w| u128::from(*w)).sum();
    if weight_sum == 0 {
        return vec![0; weights.len()];
    }

    let mut parts = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for (index, weight) in weights.iter().enumerate() {
        let scaled = u128::from(*weight) * u128::from(total);
        parts.push((scaled / weight_sum) as u32);
        remainders.push((scaled % weight_sum, index));
    }

    let assigned: u32 = parts.iter().sum();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, index) in remainders.into_iter().take((total - assigned) as usize) {
        parts[index] += 1;
    }
    parts
}

/// A concentrated liquidity position: a tick range and its share of the pool supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Inclusive lower tick.
    pub tick_lower: i32,
    /// Exclusive upper tick.
    pub tick_upper: i32,
    /// Share of the pool supply in basis points.
    pub bps: u16,
}

impl Position {
    /// Creates a new [`Position`].
    #[must_use]
    pub const fn new(tick_lower: i32, tick_upper: i32, bps: u16) -> Self {
        Self {
            tick_lower,
            tick_upper,
            bps,
        }
    }
}

/// Schema-dependent rules a Position Set must satisfy beyond the share sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionConstraints {
    /// Grid spacing all ticks must align to.
    pub tick_spacing: i32,
    /// Starting tick of the pool; when set, no position may start below it and one must
    /// start exactly at it.
    pub starting_tick: Option<i32>,
    /// Maximum number of positions, if limited.
    pub max_positions: Option<usize>,
}

/// Validates a Position Set, reporting the first violation with its field path.
///
/// # Errors
///
/// Returns an error if the spacing is invalid, the set is too long, any position has a zero
/// share, an inverted, misaligned or out-of-domain range, a bound outside the usable range,
/// the shares do not sum to exactly 10000, or no position opens at the starting tick.
pub fn validate_positions(
    positions: &[Position],
    constraints: &PositionConstraints,
) -> Result<(), ValidationError> {
    let spacing = constraints.tick_spacing;
    check_tick_spacing(spacing)?;
    let max_tick = max_usable_tick(spacing);

    if let Some(max) = constraints.max_positions
        && positions.len() > max
    {
        return Err(ValidationError::new(
            "",
            ValidationErrorKind::TooManyEntries {
                count: positions.len(),
                max,
            },
        ));
    }

    for (index, position) in positions.iter().enumerate() {
        let at = |field: &str, kind| ValidationError::new(format!("[{index}].{field}"), kind);

        if position.bps == 0 {
            return Err(at("bps", ValidationErrorKind::ZeroShare));
        }
        if position.tick_lower >= position.tick_upper {
            return Err(at(
                "tick_lower",
                ValidationErrorKind::InvertedRange {
                    lower: position.tick_lower,
                    upper: position.tick_upper,
                },
            ));
        }
        for (field, tick) in [
            ("tick_lower", position.tick_lower),
            ("tick_upper", position.tick_upper),
        ] {
            if !(MIN_TICK..=MAX_TICK).contains(&tick) {
                return Err(at(
                    field,
                    ValidationErrorKind::TickOutOfRange {
                        tick: i64::from(tick),
                        min: MIN_TICK,
                        max: MAX_TICK,
                    },
                ));
            }
            if tick.rem_euclid(spacing) != 0 {
                return Err(at(field, ValidationErrorKind::MisalignedTick { tick, spacing }));
            }
        }
        if let Some(starting_tick) = constraints.starting_tick
            && position.tick_lower < starting_tick
        {
            return Err(at(
                "tick_lower",
                ValidationErrorKind::BelowStartingTick {
                    tick: position.tick_lower,
                    starting_tick,
                },
            ));
        }
        if position.tick_upper > max_tick {
            return Err(at(
                "tick_upper",
                ValidationErrorKind::AboveMaxTick {
                    tick: position.tick_upper,
                    max: max_tick,
                },
            ));
        }
    }

    validate_shares(
        positions.iter().map(|p| u32::from(p.bps)),
        SharePolicy::FULL,
    )
    .map_err(|violation| share_error(violation, "bps"))?;

    if let Some(starting_tick) = constraints.starting_tick
        && !positions.iter().any(|p| p.tick_lower == starting_tick)
    {
        return Err(ValidationError::new(
            "",
            ValidationErrorKind::NoPositionAtStartingTick { starting_tick },
        ));
    }

    Ok(())
}

/// Converts a [`ShareViolation`] into a field-anchored error: excesses point at the offending
/// entry's share field, shortfalls at the whole set.
#[must_use]
pub fn share_error(violation: ShareViolation, share_field: &str) -> ValidationError {
    let field = match violation {
        ShareViolation::Excess { index, .. } => format!("[{index}].{share_field}"),
        ShareViolation::Shortfall { .. } => String::new(),
    };
    ValidationError::new(field, ValidationErrorKind::Shares(violation))
}

/// Liquidity layouts authored by name instead of by explicit ranges.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PositionPreset {
    /// A single position from the starting tick to the top of the grid.
    Standard,
    /// Five overlapping positions concentrating liquidity in the early valuation bands.
    Project,
}

/// Starting tick the [`PositionPreset::Project`] ranges are expressed against.
pub const PRESET_REFERENCE_TICK: i32 = -230_400;

const PROJECT_RANGES: [(i32, i32, u16); 5] = [
    (-230_400, -214_000, 1_000),
    (-214_000, -155_000, 5_000),
    (-202_000, -155_000, 1_500),
    (-155_000, -120_000, 2_000),
    (-141_000, -120_000, 500),
];

impl PositionPreset {
    /// Expands the preset into concrete positions for a pool starting at `starting_tick`.
    ///
    /// Preset ranges are shifted by the distance between `starting_tick` and
    /// [`PRESET_REFERENCE_TICK`], then floored onto `tick_spacing`. Shifted ranges may still
    /// leave the usable range; [`validate_positions`] reports those.
    ///
    /// # Errors
    ///
    /// Returns an error if `tick_spacing` is invalid or `starting_tick` lies outside the tick
    /// domain.
    pub fn positions(
        &self,
        starting_tick: i32,
        tick_spacing: i32,
    ) -> Result<Vec<Position>, ValidationError> {
        check_tick_spacing(tick_spacing)?;
        if !(MIN_TICK..=MAX_TICK).contains(&starting_tick) {
            return Err(ValidationError::new(
                "starting_tick",
                ValidationErrorKind::TickOutOfRange {
                    tick: i64::from(starting_tick),
                    min: MIN_TICK,
                    max: MAX_TICK,
                },
            ));
        }

        let positions = match self {
            Self::Standard => vec![Position::new(
                starting_tick,
                max_usable_tick(tick_spacing),
                BPS_DENOMINATOR as u16,
            )],
            Self::Project => {
                let offset = starting_tick - PRESET_REFERENCE_TICK;
                PROJECT_RANGES
                    .iter()
                    .map(|(lower, upper, bps)| {
                        Position::new(
                            floor_to_spacing(lower + offset, tick_spacing),
                            floor_to_spacing(upper + offset, tick_spacing),
                            *bps,
                        )
                    })
                    .collect()
            }
        };
        Ok(positions)
    }
}

/// Which asset a reward recipient wants its fees paid in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeePreference {
    /// Receive fees in whichever asset they accrue.
    #[default]
    Both,
    /// Convert fees into the paired asset.
    Paired,
    /// Convert fees into the launched token.
    Token,
}

impl FeePreference {
    /// Returns the on-chain enum discriminant.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Both => 0,
            Self::Paired => 1,
            Self::Token => 2,
        }
    }
}

/// One recipient of a basis-point share, with an administrator allowed to change it.
///
/// Used for fee rewards and, structurally identical, for supply carve-outs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEntry {
    /// Account receiving the share.
    pub recipient: Address,
    /// Account allowed to update the recipient.
    pub admin: Address,
    /// Share in basis points.
    pub bps: u16,
    /// Asset preference for fee payouts.
    pub preference: FeePreference,
}

/// Schema-dependent rules a Split Set must satisfy beyond the share sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConstraints {
    /// Total-sum rule.
    pub policy: SharePolicy,
    /// Maximum number of entries, if limited.
    pub max_entries: Option<usize>,
    /// Whether repeated (recipient, admin, preference) triplets are allowed.
    pub allow_duplicates: bool,
    /// Whether every entry needs a non-zero share.
    pub require_positive: bool,
}

impl SplitConstraints {
    /// Rules for fee reward splits: exactly 10000 bps, unique triplets, positive shares.
    #[must_use]
    pub const fn rewards(max_entries: Option<usize>) -> Self {
        Self {
            policy: SharePolicy::FULL,
            max_entries,
            allow_duplicates: false,
            require_positive: true,
        }
    }

    /// Rules for supply carve-outs: at most `limit` bps, residual to the pool.
    #[must_use]
    pub const fn carve_outs(limit: u32, max_entries: Option<usize>) -> Self {
        Self {
            policy: SharePolicy::AtMost(limit),
            max_entries,
            allow_duplicates: true,
            require_positive: false,
        }
    }
}

/// Validates a Split Set, reporting the first violation with its field path.
///
/// # Errors
///
/// Returns an error if the set is too long, an entry uses the zero address, has a zero share
/// where shares must be positive, duplicates an earlier triplet where duplicates are
/// forbidden, or the shares violate the policy.
pub fn validate_splits(
    entries: &[SplitEntry],
    constraints: &SplitConstraints,
) -> Result<u32, ValidationError> {
    if let Some(max) = constraints.max_entries
        && entries.len() > max
    {
        return Err(ValidationError::new(
            "",
            ValidationErrorKind::TooManyEntries {
                count: entries.len(),
                max,
            },
        ));
    }

    let mut seen: HashMap<(Address, Address, FeePreference), usize> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        let at = |field: &str, kind| ValidationError::new(format!("[{index}].{field}"), kind);

        if entry.recipient.is_zero() {
            return Err(at("recipient", ValidationErrorKind::ZeroAddress));
        }
        if entry.admin.is_zero() {
            return Err(at("admin", ValidationErrorKind::ZeroAddress));
        }
        if constraints.require_positive && entry.bps == 0 {
            return Err(at("bps", ValidationErrorKind::ZeroShare));
        }
        if !constraints.allow_duplicates
            && let Some(first) = seen.insert((entry.recipient, entry.admin, entry.preference), index)
        {
            return Err(ValidationError::new(
                format!("[{index}]"),
                ValidationErrorKind::DuplicateEntry { first },
            ));
        }
    }

    validate_shares(entries.iter().map(|e| u32::from(e.bps)), constraints.policy)
        .map_err(|violation| share_error(violation, "bps"))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use strum::IntoEnumIterator;

    use super::*;
    use crate::tick_math::DEFAULT_TICK_SPACING;

    #[fixture]
    fn constraints() -> PositionConstraints {
        PositionConstraints {
            tick_spacing: DEFAULT_TICK_SPACING,
            starting_tick: Some(-230_400),
            max_positions: Some(7),
        }
    }

    fn split(recipient: u8, admin: u8, bps: u16) -> SplitEntry {
        SplitEntry {
            recipient: Address::repeat_byte(recipient),
            admin: Address::repeat_byte(admin),
            bps,
            preference: FeePreference::Both,
        }
    }

    #[rstest]
    fn test_exact_shares_pass() {
        assert_eq!(
            validate_shares([5000, 3000, 2000], SharePolicy::FULL),
            Ok(10_000)
        );
    }

    #[rstest]
    fn test_exact_shares_report_precise_shortfall() {
        assert_eq!(
            validate_shares([5000, 3000, 1999], SharePolicy::FULL),
            Err(ShareViolation::Shortfall {
                total: 9999,
                expected: 10_000,
                missing: 1,
            })
        );
    }

    #[rstest]
    fn test_excess_points_at_first_overshooting_entry() {
        assert_eq!(
            validate_shares([6000, 4000, 1, 500], SharePolicy::FULL),
            Err(ShareViolation::Excess {
                index: 2,
                total: 10_001,
                limit: 10_000,
                excess: 1,
            })
        );
    }

    #[rstest]
    #[case(vec![], Ok(0))]
    #[case(vec![4000, 5000], Ok(9000))]
    #[case(vec![9001], Err(ShareViolation::Excess { index: 0, total: 9001, limit: 9000, excess: 1 }))]
    fn test_at_most_policy(#[case] shares: Vec<u32>, #[case] expected: Result<u32, ShareViolation>) {
        assert_eq!(validate_shares(shares, SharePolicy::AtMost(9000)), expected);
    }

    #[rstest]
    #[case(vec![1, 1, 1], 10_000, vec![3334, 3333, 3333])]
    #[case(vec![1, 2, 1], 10_000, vec![2500, 5000, 2500])]
    #[case(vec![1; 7], 10_000, vec![1429, 1429, 1429, 1429, 1428, 1428, 1428])]
    #[case(vec![0, 0], 10_000, vec![0, 0])]
    #[case(vec![], 10_000, vec![])]
    fn test_apportion(#[case] weights: Vec<u64>, #[case] total: u32, #[case] expected: Vec<u32>) {
        assert_eq!(apportion(&weights, total), expected);
    }

    #[rstest]
    fn test_valid_position_set(constraints: PositionConstraints) {
        let positions = [
            Position::new(-230_400, -214_000, 5000),
            Position::new(-214_000, -155_000, 3000),
            Position::new(-202_000, 887_200, 2000),
        ];
        assert!(validate_positions(&positions, &constraints).is_ok());
    }

    #[rstest]
    fn test_position_set_shortfall(constraints: PositionConstraints) {
        let positions = [
            Position::new(-230_400, -214_000, 5000),
            Position::new(-214_000, -155_000, 3000),
            Position::new(-202_000, 887_200, 1999),
        ];
        let err = validate_positions(&positions, &constraints).unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::Shares(ShareViolation::Shortfall {
                total: 9999,
                expected: 10_000,
                missing: 1,
            })
        );
    }

    #[rstest]
    #[case(Position::new(-230_400, -230_400, 10_000), "[0].tick_lower")]
    #[case(Position::new(-230_400, -214_100, 10_000), "[0].tick_upper")]
    #[case(Position::new(-230_500, -214_000, 10_000), "[0].tick_lower")]
    #[case(Position::new(-230_400, 887_400, 10_000), "[0].tick_upper")]
    #[case(Position::new(-230_400, -214_000, 0), "[0].bps")]
    fn test_position_structure_errors(
        constraints: PositionConstraints,
        #[case] position: Position,
        #[case] field: &str,
    ) {
        let err = validate_positions(&[position], &constraints).unwrap_err();
        assert_eq!(err.field, field);
    }

    #[rstest]
    fn test_position_below_starting_tick(constraints: PositionConstraints) {
        let err = validate_positions(&[Position::new(-230_600, -214_000, 10_000)], &constraints)
            .unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::BelowStartingTick {
                tick: -230_600,
                starting_tick: -230_400,
            }
        );
    }

    #[rstest]
    fn test_position_set_requires_liquidity_at_start(constraints: PositionConstraints) {
        let err = validate_positions(&[Position::new(-230_200, -214_000, 10_000)], &constraints)
            .unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::NoPositionAtStartingTick {
                starting_tick: -230_400
            }
        );
    }

    #[rstest]
    fn test_too_many_positions(constraints: PositionConstraints) {
        let positions = vec![Position::new(-230_400, -214_000, 1250); 8];
        let err = validate_positions(&positions, &constraints).unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::TooManyEntries { count: 8, max: 7 }
        );
    }

    #[rstest]
    fn test_presets_are_valid_at_reference_tick(constraints: PositionConstraints) {
        for preset in PositionPreset::iter() {
            let positions = preset.positions(-230_400, DEFAULT_TICK_SPACING).unwrap();
            assert!(
                validate_positions(&positions, &constraints).is_ok(),
                "{preset} preset should validate"
            );
        }
    }

    #[rstest]
    fn test_project_preset_shifts_with_starting_tick() {
        let positions = PositionPreset::Project
            .positions(-207_400, DEFAULT_TICK_SPACING)
            .unwrap();
        assert_eq!(positions[0], Position::new(-207_400, -191_000, 1000));
        let constraints = PositionConstraints {
            tick_spacing: DEFAULT_TICK_SPACING,
            starting_tick: Some(-207_400),
            max_positions: Some(7),
        };
        assert!(validate_positions(&positions, &constraints).is_ok());
    }

    #[rstest]
    #[case(Position::new(i32::MIN, -214_000, 10_000), "[0].tick_lower", i64::from(i32::MIN))]
    #[case(Position::new(-230_400, i32::MAX, 10_000), "[0].tick_upper", i64::from(i32::MAX))]
    #[case(Position::new(-887_400, -214_000, 10_000), "[0].tick_lower", -887_400)]
    fn test_position_outside_tick_domain(
        constraints: PositionConstraints,
        #[case] position: Position,
        #[case] field: &str,
        #[case] tick: i64,
    ) {
        let err = validate_positions(&[position], &constraints).unwrap_err();
        assert_eq!(err.field, field);
        assert_eq!(
            err.kind,
            ValidationErrorKind::TickOutOfRange {
                tick,
                min: MIN_TICK,
                max: MAX_TICK,
            }
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-200)]
    fn test_position_set_rejects_invalid_spacing(
        mut constraints: PositionConstraints,
        #[case] tick_spacing: i32,
    ) {
        constraints.tick_spacing = tick_spacing;
        let err = validate_positions(&[Position::new(-230_400, -214_000, 10_000)], &constraints)
            .unwrap_err();
        assert_eq!(err.field, "tick_spacing");
    }

    #[rstest]
    fn test_presets_reject_invalid_inputs() {
        for preset in PositionPreset::iter() {
            let err = preset.positions(-230_400, 0).unwrap_err();
            assert_eq!(err.field, "tick_spacing");

            let err = preset.positions(i32::MIN, DEFAULT_TICK_SPACING).unwrap_err();
            assert_eq!(err.field, "starting_tick");
        }
    }

    #[rstest]
    fn test_reward_splits_valid() {
        let entries = [split(1, 1, 7000), split(2, 2, 3000)];
        assert_eq!(
            validate_splits(&entries, &SplitConstraints::rewards(Some(7))),
            Ok(10_000)
        );
    }

    #[rstest]
    fn test_reward_splits_reject_duplicate_triplet() {
        let entries = [split(1, 1, 5000), split(2, 2, 2500), split(1, 1, 2500)];
        let err = validate_splits(&entries, &SplitConstraints::rewards(None)).unwrap_err();
        assert_eq!(err.field, "[2]");
        assert_eq!(err.kind, ValidationErrorKind::DuplicateEntry { first: 0 });
    }

    #[rstest]
    fn test_same_recipient_with_other_preference_is_distinct() {
        let mut other = split(1, 1, 5000);
        other.preference = FeePreference::Paired;
        let entries = [split(1, 1, 5000), other];
        assert!(validate_splits(&entries, &SplitConstraints::rewards(None)).is_ok());
    }

    #[rstest]
    fn test_splits_reject_zero_addresses() {
        let mut entry = split(1, 1, 10_000);
        entry.admin = Address::ZERO;
        let err = validate_splits(&[entry], &SplitConstraints::rewards(None)).unwrap_err();
        assert_eq!(err.field, "[0].admin");
        assert_eq!(err.kind, ValidationErrorKind::ZeroAddress);
    }

    #[rstest]
    fn test_carve_outs_allow_residual() {
        let entries = [split(1, 1, 1000), split(1, 1, 2000)];
        assert_eq!(
            validate_splits(&entries, &SplitConstraints::carve_outs(9000, Some(10))),
            Ok(3000)
        );
    }

    #[rstest]
    fn test_carve_outs_over_limit_report_entry() {
        let entries = [split(1, 1, 5000), split(2, 2, 4001)];
        let err =
            validate_splits(&entries, &SplitConstraints::carve_outs(9000, None)).unwrap_err();
        assert_eq!(err.field, "[1].bps");
    }

    #[rstest]
    #[case(FeePreference::Both, 0)]
    #[case(FeePreference::Paired, 1)]
    #[case(FeePreference::Token, 2)]
    fn test_fee_preference_discriminant(#[case] preference: FeePreference, #[case] expected: u8) {
        assert_eq!(preference.as_u8(), expected);
    }
}
