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

//! Property-based tests for basis-point partitions.
//!
//! - Apportioned shares always sum to the requested total.
//! - Each apportioned share stays within one unit of its exact quota.
//! - Exact and at-most policies accept exactly the partitions they describe.

use launchkit_params::{
    SharePolicy, ShareViolation,
    allocation::{apportion, validate_shares},
};
use proptest::prelude::*;
use rstest::rstest;

proptest! {
    /// Property: Apportionment distributes the whole total, never more or less.
    #[rstest]
    fn apportion_sums_to_total(
        weights in prop::collection::vec(0u64..1_000_000, 1..16),
        total in 0u32..=10_000,
    ) {
        prop_assume!(weights.iter().any(|w| *w > 0));
        let parts = apportion(&weights, total);

        prop_assert_eq!(parts.len(), weights.len());
        prop_assert_eq!(parts.iter().sum::<u32>(), total);
    }

    /// Property: Every share is its exact quota rounded down or up.
    #[rstest]
    fn apportion_stays_near_quota(
        weights in prop::collection::vec(1u64..1_000, 1..16),
        total in 0u32..=10_000,
    ) {
        let weight_sum: u64 = weights.iter().sum();
        let parts = apportion(&weights, total);

        for (weight, part) in weights.iter().zip(&parts) {
            let floor = weight * u64::from(total) / weight_sum;
            prop_assert!(u64::from(*part) == floor || u64::from(*part) == floor + 1);
        }
    }

    /// Property: An exact policy accepts a partition if and only if it sums to the total.
    #[rstest]
    fn exact_policy_matches_sum(shares in prop::collection::vec(0u32..=10_000, 1..8)) {
        let sum: u32 = shares.iter().sum();
        let result = validate_shares(shares.iter().copied(), SharePolicy::FULL);

        match result {
            Ok(total) => prop_assert_eq!(total, 10_000),
            Err(ShareViolation::Shortfall { total, missing, .. }) => {
                prop_assert_eq!(total, sum);
                prop_assert_eq!(total + missing, 10_000);
            }
            Err(ShareViolation::Excess { .. }) => prop_assert!(sum > 10_000),
        }
        prop_assert_eq!(result.is_ok(), sum == 10_000);
    }

    /// Property: An at-most policy flags the first entry whose running total crosses the limit.
    #[rstest]
    fn at_most_policy_reports_first_excess(
        shares in prop::collection::vec(0u32..=5_000, 1..8),
        limit in 0u32..=10_000,
    ) {
        let result = validate_shares(shares.iter().copied(), SharePolicy::AtMost(limit));
        let first_excess = shares
            .iter()
            .scan(0u64, |running, share| {
                *running += u64::from(*share);
                Some(*running)
            })
            .position(|running| running > u64::from(limit));

        match (result, first_excess) {
            (Ok(total), None) => prop_assert!(total <= limit),
            (Err(ShareViolation::Excess { index, .. }), Some(expected)) => {
                prop_assert_eq!(index, expected);
            }
            (other, expected) => prop_assert!(false, "{other:?} vs first excess {expected:?}"),
        }
    }
}
