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

//! Deployment planning for AMM token launches.
//!
//! The `launchkit-deploy` crate compiles a human-authored launch configuration into the exact
//! factory call that deploys a token, its pool, its liquidity locker and any supply
//! extensions:
//!
//! - A catalogue of contract schemas, one per factory generation and chain.
//! - ABI definitions of each generation's `deployToken` call.
//! - Deterministic CREATE2 address prediction, including vanity suffix search through an
//!   untrusted collaborator whose answers are re-derived locally.
//! - HTTP clients for the salt-search and allocation-registry collaborators.
//! - The deployment compiler, which validates everything before assembling a plan.
//!
//! Submitting the plan to a chain is left to the caller.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod address;
pub mod compiler;
pub mod config;
pub mod contracts;
pub mod http;
pub mod logging;
pub mod plan;
pub mod registry;
pub mod salt_search;
pub mod schema;

// Re-exports
pub use crate::{
    address::{AddressResolver, ResolvedAddress, VanitySuffix},
    compiler::DeploymentCompiler,
    config::LaunchConfig,
    plan::{DeploymentPlan, PlanSummary},
    registry::{AllocationRegistry, HttpAllocationRegistry, register_best_effort},
    salt_search::{HttpSaltSearchClient, SaltSearch},
    schema::{ContractGeneration, ContractSchema, SchemaCatalogue},
};
