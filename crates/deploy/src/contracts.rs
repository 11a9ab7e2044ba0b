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

//! ABI definitions of the factory generations and their module payloads.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolValue,
};

sol! {
    /// Hook-based factory: multi-position locker, pricing hooks and supply extensions.
    #[sol(all_derives)]
    contract TokenFactoryV4 {
        struct TokenConfig {
            address tokenAdmin;
            string name;
            string symbol;
            bytes32 salt;
            string image;
            string metadata;
            string context;
            uint256 originatingChainId;
        }

        struct PoolConfig {
            address hook;
            address pairedToken;
            int24 tickIfToken0IsNewToken;
            int24 tickSpacing;
            bytes poolData;
        }

        struct LockerConfig {
            address locker;
            address[] rewardAdmins;
            address[] rewardRecipients;
            uint16[] rewardBps;
            int24[] tickLower;
            int24[] tickUpper;
            uint16[] positionBps;
            bytes lockerData;
        }

        struct MevModuleConfig {
            address mevModule;
            bytes mevModuleData;
        }

        struct ExtensionConfig {
            address extension;
            uint256 msgValue;
            uint16 extensionBps;
            bytes extensionData;
        }

        struct DeploymentConfig {
            TokenConfig tokenConfig;
            PoolConfig poolConfig;
            LockerConfig lockerConfig;
            MevModuleConfig mevModuleConfig;
            ExtensionConfig[] extensionConfigs;
        }

        function deployToken(DeploymentConfig deploymentConfig)
            external
            payable
            returns (address tokenAddress);
    }
}

sol! {
    /// Single-position factory with a fixed creator/interface reward split.
    #[sol(all_derives)]
    contract TokenFactoryV3 {
        struct TokenConfig {
            string name;
            string symbol;
            bytes32 salt;
            string image;
            string metadata;
            string context;
            uint256 originatingChainId;
        }

        struct VaultConfig {
            uint8 vaultPercentage;
            uint256 vaultDuration;
        }

        struct PoolConfig {
            address pairedToken;
            int24 tickIfToken0IsNewToken;
        }

        struct InitialBuyConfig {
            uint24 pairedTokenPoolFee;
            uint256 pairedTokenSwapAmountOutMinimum;
        }

        struct RewardsConfig {
            uint256 creatorReward;
            address creatorAdmin;
            address creatorRewardRecipient;
            address interfaceAdmin;
            address interfaceRewardRecipient;
        }

        struct DeploymentConfig {
            TokenConfig tokenConfig;
            VaultConfig vaultConfig;
            PoolConfig poolConfig;
            InitialBuyConfig initialBuyConfig;
            RewardsConfig rewardsConfig;
        }

        function deployToken(DeploymentConfig deploymentConfig)
            external
            payable
            returns (address tokenAddress, uint256 positionId);
    }
}

sol! {
    /// Per-pool data read by the pricing hook on initialization.
    struct PoolInitializationData {
        address extension;
        bytes extensionData;
        bytes feeData;
    }

    /// Per-reward fee preference read by the locker.
    struct LockerFeeData {
        uint8[] feePreference;
    }

    /// Vault extension parameters.
    struct VaultExtensionData {
        address admin;
        uint256 lockupDuration;
        uint256 vestingDuration;
    }

    /// Airdrop extension parameters.
    struct AirdropExtensionData {
        address admin;
        bytes32 merkleRoot;
        uint256 lockupDuration;
        uint256 vestingDuration;
    }

    struct PoolKey {
        address currency0;
        address currency1;
        uint24 fee;
        int24 tickSpacing;
        address hooks;
    }

    /// Dev buy extension parameters. The pool key is only read when the paired token is not
    /// the wrapped native asset.
    struct DevBuyExtensionData {
        PoolKey pairedTokenPoolKey;
        uint128 pairedTokenAmountOutMinimum;
        address recipient;
    }
}

/// Constructor arguments of the launched token, shared by every generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConstructorArgs {
    pub name: String,
    pub symbol: String,
    pub max_supply: U256,
    pub admin: Address,
    pub image: String,
    pub metadata: String,
    pub context: String,
    pub originating_chain_id: u64,
}

impl TokenConstructorArgs {
    /// Returns the ABI-encoded constructor arguments.
    #[must_use]
    pub fn abi_encode(&self) -> Vec<u8> {
        (
            self.name.clone(),
            self.symbol.clone(),
            self.max_supply,
            self.admin,
            self.image.clone(),
            self.metadata.clone(),
            self.context.clone(),
            U256::from(self.originating_chain_id),
        )
            .abi_encode_params()
    }

    /// Returns the init code the factory deploys: `creation_code ++ abi.encode(args)`.
    #[must_use]
    pub fn init_code(&self, creation_code: &[u8]) -> Bytes {
        let args = self.abi_encode();
        let mut code = Vec::with_capacity(creation_code.len() + args.len());
        code.extend_from_slice(creation_code);
        code.extend_from_slice(&args);
        code.into()
    }
}
