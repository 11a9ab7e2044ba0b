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

//! Pure parameter computation for AMM token launches.
//!
//! The `launchkit-params` crate turns declarative launch settings into exact, ABI-ready
//! numeric parameters. Everything here is synchronous and free of I/O, so independent
//! launch requests can be computed in parallel without coordination:
//!
//! - Conversion of a target valuation into a starting price tick on the pool grid.
//! - Basis-point partition checks for liquidity positions, reward splits and supply carve-outs.
//! - Encoding of flat and volatility-adaptive fee policies.
//! - A Merkle commitment over allocation lists with proofs interoperable with
//!   OpenZeppelin's `MerkleProof` verifier.
//! - Exact scaling of human-authored decimal amounts into base units.
//!
//! Errors follow one taxonomy shared with the `launchkit-deploy` crate, see [`error`].

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod allocation;
pub mod error;
pub mod fees;
pub mod math;
pub mod merkle;
pub mod tick_math;

// Re-exports
pub use crate::{
    allocation::{FeePreference, Position, SharePolicy, ShareViolation, SplitEntry},
    error::{
        CollaboratorError, ConsistencyError, LaunchError, StateError, ValidationError,
        ValidationErrorKind,
    },
    fees::{AdaptiveFee, EncodedFeePolicy, FeeModuleKind, FeePolicy},
    merkle::{AllocationEntry, AllocationProof, DuplicatePolicy, MerkleAllocationTree},
    tick_math::{StartingTick, TickMath, Valuation},
};
