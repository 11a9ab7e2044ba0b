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

//! Tracing setup and log markers for collaborator traffic.

use std::env;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Marks an outbound collaborator request.
pub const REQ: &str = "[REQ]";
/// Marks a collaborator response.
pub const RES: &str = "[RES]";

/// Environment variable holding the log filter directives.
pub const LOG_FILTER_ENV_VAR: &str = "RUST_LOG";

/// Parses filter directives such as `launchkit_deploy=debug,launchkit_params=info`.
///
/// # Errors
///
/// Returns an error naming the directives if any of them is malformed.
pub fn log_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("Invalid log filter '{directives}'"))
}

/// Installs a global fmt subscriber when `RUST_LOG` is set, returning whether one was
/// installed. Call once, before the first plan is compiled.
///
/// # Errors
///
/// Returns an error if the filter is malformed or a global subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<bool> {
    let Ok(directives) = env::var(LOG_FILTER_ENV_VAR) else {
        return Ok(false);
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives)?)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    tracing::info!(filter = %directives, "Initialized tracing");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("info")]
    #[case("launchkit_deploy=debug,launchkit_params=info")]
    #[case("launchkit_deploy::salt_search=trace")]
    fn test_log_filter_accepts_directives(#[case] directives: &str) {
        assert!(log_filter(directives).is_ok());
    }

    #[rstest]
    #[case("launchkit_deploy=loud")]
    #[case("launchkit_deploy=debug,[{}]")]
    fn test_log_filter_rejects_malformed_directives(#[case] directives: &str) {
        let err = log_filter(directives).unwrap_err();
        assert!(err.to_string().contains(directives));
    }
}
