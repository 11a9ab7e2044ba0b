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

//! Error taxonomy for launch parameter computation.
//!
//! - [`ValidationError`]: bad input the caller can fix. Never retried.
//! - [`ConsistencyError`]: a recomputation disagreed with a claimed value. Signals a logic or
//!   data-integrity defect and must never be downgraded.
//! - [`CollaboratorError`]: an external service failed. Safe to retry at the caller's discretion.
//! - [`StateError`]: the request does not fit the selected contract schema.

use std::{fmt::Display, time::Duration};

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::allocation::ShareViolation;

/// The specific reason a field failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    /// The target valuation is not a finite positive number.
    #[error("valuation must be finite and > 0, was {value}")]
    InvalidValuation { value: f64 },
    /// The decimal count cannot be represented as a 256-bit power of ten.
    #[error("decimals {decimals} exceeds the supported maximum {max}")]
    InvalidDecimals { decimals: u8, max: u8 },
    /// The tick spacing is not a positive value within the tick domain.
    #[error("tick spacing must be in 1..={max}, was {spacing}")]
    InvalidTickSpacing { spacing: i32, max: i32 },
    /// The computed or supplied tick lies outside the valid tick domain.
    #[error("tick {tick} outside valid range [{min}, {max}]")]
    TickOutOfRange { tick: i64, min: i32, max: i32 },
    /// A basis-point partition does not meet its total-sum policy.
    #[error("{0}")]
    Shares(ShareViolation),
    /// A tick range where lower is not strictly below upper.
    #[error("tick range lower {lower} must be below upper {upper}")]
    InvertedRange { lower: i32, upper: i32 },
    /// A tick that is not a multiple of the grid spacing.
    #[error("tick {tick} is not a multiple of spacing {spacing}")]
    MisalignedTick { tick: i32, spacing: i32 },
    /// A position lower bound below the pool's starting tick.
    #[error("tick {tick} is below the starting tick {starting_tick}")]
    BelowStartingTick { tick: i32, starting_tick: i32 },
    /// A position upper bound above the largest usable tick.
    #[error("tick {tick} is above the max usable tick {max}")]
    AboveMaxTick { tick: i32, max: i32 },
    /// No position opens at the starting tick so the pool would start without active liquidity.
    #[error("no position starts at the starting tick {starting_tick}")]
    NoPositionAtStartingTick { starting_tick: i32 },
    /// An entry with a zero basis-point share where shares must be positive.
    #[error("share must be greater than zero")]
    ZeroShare,
    /// A list exceeding the schema's entry limit.
    #[error("{count} entries exceeds the maximum of {max}")]
    TooManyEntries { count: usize, max: usize },
    /// An entry repeating an earlier one where the schema forbids duplicates.
    #[error("duplicates entry {first}")]
    DuplicateEntry { first: usize },
    /// The zero address where a real account is required.
    #[error("address must not be the zero address")]
    ZeroAddress,
    /// A string that does not parse as an address.
    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },
    /// A fee (or other basis-point field) above its maximum.
    #[error("value {value} exceeds the maximum {max}")]
    OutOfRange { value: u64, max: u64 },
    /// An adaptive fee whose base fee exceeds its max fee.
    #[error("base fee {base_fee_bps} bps exceeds max fee {max_fee_bps} bps")]
    BaseFeeAboveMax { base_fee_bps: u16, max_fee_bps: u16 },
    /// A lockup or vesting duration below the contract minimum.
    #[error("duration {seconds}s is below the minimum {min_seconds}s")]
    DurationTooShort { seconds: u64, min_seconds: u64 },
    /// An allocation list with no entries.
    #[error("allocation list is empty")]
    EmptyAllocationList,
    /// The same beneficiary appearing twice where the policy forbids it.
    #[error("beneficiary {beneficiary} appears more than once")]
    DuplicateBeneficiary { beneficiary: Address },
    /// An amount that cannot be represented exactly in base units.
    #[error("invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },
    /// Airdropped amounts exceed the supply carved out for the airdrop.
    #[error("airdrop total {requested} exceeds the allocated {allocated} base units")]
    AirdropExceedsAllocation { requested: U256, allocated: U256 },
    /// A requested address suffix that is not valid hex.
    #[error("invalid address suffix '{suffix}': {reason}")]
    InvalidSuffix { suffix: String, reason: String },
    /// Some entries carry explicit shares while others rely on the even-split default.
    #[error("either all entries set bps or none do")]
    MixedShareAuthoring,
    /// A feature the selected contract generation cannot express.
    #[error("not supported by generation {generation}")]
    Unsupported { generation: String },
    /// A malformed value not covered by a more specific kind.
    #[error("{0}")]
    Invalid(String),
}

/// A validation failure anchored to the field that caused it.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationError {
    /// Dotted/indexed path of the offending field, e.g. `locker.positions[2].bps`.
    pub field: String,
    /// The reason for the failure.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a new [`ValidationError`] for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    /// Replaces the field path, for errors raised against a local name.
    #[must_use]
    pub fn renamed(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Re-anchors the error beneath a parent field.
    #[must_use]
    pub fn within(mut self, parent: &str) -> Self {
        self.field = join_field(parent, &self.field);
        self
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.field, self.kind)
        }
    }
}

/// Joins a parent and child field path, keeping index segments attached (`a[1]`, `a.b`).
#[must_use]
pub fn join_field(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (_, true) => parent.to_string(),
        _ if child.starts_with('[') => format!("{parent}{child}"),
        _ => format!("{parent}.{child}"),
    }
}

/// A locally recomputed value disagreed with a claimed or committed one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// The locally derived deployment address differs from the claimed address.
    #[error("address mismatch: derived {derived}, claimed {claimed}")]
    AddressMismatch { derived: Address, claimed: Address },
    /// The derived deployment address does not end with the required suffix.
    #[error("address {address} does not end with required suffix '{suffix}'")]
    SuffixMismatch { address: Address, suffix: String },
    /// An inclusion proof failed to verify against the committed root.
    #[error("proof for {beneficiary} ({amount}) does not verify against the root")]
    ProofVerificationFailed { beneficiary: Address, amount: U256 },
    /// A serialized tree whose nodes do not hash to their recorded values.
    #[error("merkle tree integrity check failed at index {index}: {reason}")]
    TreeIntegrity { index: usize, reason: String },
}

/// An external collaborator failed to answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// No answer arrived within the caller's timeout.
    #[error("{service} timed out after {after:?}")]
    Timeout { service: String, after: Duration },
    /// The request could not be delivered or the connection failed.
    #[error("{service} transport error: {message}")]
    Transport { service: String, message: String },
    /// An answer arrived but could not be understood.
    #[error("{service} returned an invalid response: {message}")]
    InvalidResponse { service: String, message: String },
}

/// The request is inconsistent with the selected contract schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The catalogue has no schema for the requested generation.
    #[error("no contract schema registered for generation {generation}")]
    SchemaNotFound { generation: String },
    /// The schema registered under a generation describes a different generation.
    #[error("schema registered for {requested} describes generation {found}")]
    SchemaMismatch { requested: String, found: String },
    /// The schema lacks a module the request needs.
    #[error("schema for {generation} has no {component} configured")]
    MissingComponent {
        generation: String,
        component: String,
    },
    /// A vanity suffix was requested but no salt search was supplied.
    #[error("vanity suffix '{suffix}' requires a salt search collaborator")]
    SearchRequired { suffix: String },
}

/// Umbrella error for launch planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchError {
    /// Caller-fixable input error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Integrity defect detected by recomputation.
    #[error("consistency error: {0}")]
    Consistency(#[from] ConsistencyError),
    /// External service failure.
    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
    /// Schema selection failure.
    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl LaunchError {
    /// Returns `true` if the caller may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Collaborator(_))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "bps", "bps")]
    #[case("locker", "", "locker")]
    #[case("locker.positions", "[2].bps", "locker.positions[2].bps")]
    #[case("locker", "positions[0]", "locker.positions[0]")]
    fn test_join_field(#[case] parent: &str, #[case] child: &str, #[case] expected: &str) {
        assert_eq!(join_field(parent, child), expected);
    }

    #[rstest]
    fn test_within_nests_path() {
        let err = ValidationError::new("[1].bps", ValidationErrorKind::ZeroShare)
            .within("positions")
            .within("locker");
        assert_eq!(err.field, "locker.positions[1].bps");
        assert_eq!(
            err.to_string(),
            "locker.positions[1].bps: share must be greater than zero"
        );
    }

    #[rstest]
    fn test_only_collaborator_errors_are_retryable() {
        let timeout = LaunchError::from(CollaboratorError::Timeout {
            service: "salt-search".to_string(),
            after: Duration::from_secs(5),
        });
        let mismatch = LaunchError::from(ConsistencyError::AddressMismatch {
            derived: Address::ZERO,
            claimed: Address::repeat_byte(1),
        });
        assert!(timeout.is_retryable());
        assert!(!mismatch.is_retryable());
    }
}
