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

//! Compiles a [`LaunchConfig`] into a [`DeploymentPlan`].
//!
//! Compilation is fail-closed: every validator runs before anything is assembled, and the
//! first failure aborts with its field path. A plan is only returned once the deployment
//! address has been derived locally and reconciled with every claim about it.

use alloy::{
    primitives::{
        Address, B256, Bytes, U256,
        aliases::{I24, U24},
    },
    sol_types::{SolCall, SolValue},
};
use launchkit_params::{
    ConsistencyError, FeePolicy, FeePreference, LaunchError, MerkleAllocationTree, Position,
    SplitEntry, StartingTick, StateError, TickMath, ValidationError, ValidationErrorKind,
    Valuation,
    allocation::{
        BPS_DENOMINATOR, PositionConstraints, PositionPreset, SharePolicy, SplitConstraints,
        apportion, validate_positions, validate_splits,
    },
    math::decimal_to_base_units,
    tick_math::{DEFAULT_TICK_SPACING, TOKEN_DECIMALS, max_usable_tick, token_supply_base_units},
};

use crate::{
    address::{AddressResolver, ResolvedAddress, VanitySuffix},
    config::{
        AirdropSpec, DevBuySpec, LaunchConfig, LegacyLaunchConfig, PositionLayout, RewardSpec,
        TokenSpec, V4LaunchConfig, VaultSpec,
    },
    contracts::{
        AirdropExtensionData, DevBuyExtensionData, LockerFeeData, PoolInitializationData,
        PoolKey, TokenConstructorArgs, TokenFactoryV3, TokenFactoryV4, VaultExtensionData,
    },
    plan::{DeploymentPlan, ExtensionKind, ExtensionSummary, PlanSummary},
    salt_search::SaltSearch,
    schema::{ContractGeneration, ContractSchema, SchemaCatalogue},
};

/// Minimum vault lockup accepted by the vault extension.
pub const VAULT_MIN_LOCKUP_SECS: u64 = 7 * 24 * 60 * 60;

/// Minimum airdrop lockup accepted by the airdrop extension.
pub const AIRDROP_MIN_LOCKUP_SECS: u64 = 24 * 60 * 60;

/// Largest creator share of the legacy reward split, in whole percent.
pub const LEGACY_MAX_CREATOR_PERCENT: u8 = 80;

/// Largest legacy vault, in whole percent of supply.
pub const LEGACY_MAX_VAULT_PERCENT: u8 = 30;

/// Decimals of the native asset paying for a dev buy.
pub(crate) const NATIVE_DECIMALS: u8 = 18;

/// Fee tier of the paired-token pool used by the legacy initial buy.
const LEGACY_PAIRED_POOL_FEE: u32 = 10_000;

/// A fully validated `deployToken` call still missing its salt.
#[derive(Debug, Clone, PartialEq)]
enum PendingCall {
    V3_1(TokenFactoryV3::DeploymentConfig),
    V4(TokenFactoryV4::DeploymentConfig),
}

impl PendingCall {
    fn encode(self, salt: B256) -> Bytes {
        match self {
            Self::V3_1(mut config) => {
                config.tokenConfig.salt = salt;
                TokenFactoryV3::deployTokenCall {
                    deploymentConfig: config,
                }
                .abi_encode()
                .into()
            }
            Self::V4(mut config) => {
                config.tokenConfig.salt = salt;
                TokenFactoryV4::deployTokenCall {
                    deploymentConfig: config,
                }
                .abi_encode()
                .into()
            }
        }
    }
}

/// Outcome of resolving an address without a salt search.
enum Resolution<'a> {
    Resolved(ResolvedAddress),
    Search(&'a VanitySuffix),
}

/// A validated deployment whose address has not been resolved yet.
#[derive(Debug)]
struct PreparedDeployment {
    generation: ContractGeneration,
    chain_id: u64,
    target: Address,
    resolver: AddressResolver,
    call: PendingCall,
    value: U256,
    starting_tick: StartingTick,
    effective_valuation: f64,
    tree: Option<MerkleAllocationTree>,
    vanity_suffix: Option<VanitySuffix>,
    expected_address: Option<Address>,
    salt: Option<B256>,
    summary: PlanSummary,
}

impl PreparedDeployment {
    /// Resolves the address from the configured salt, or the zero salt when no suffix is
    /// requested.
    fn resolve_locally(&self) -> Result<Resolution<'_>, LaunchError> {
        let salt = match (self.salt, &self.vanity_suffix) {
            (Some(salt), _) => salt,
            (None, None) => B256::ZERO,
            (None, Some(suffix)) => return Ok(Resolution::Search(suffix)),
        };

        let resolved = self
            .resolver
            .verify(&salt, self.expected_address.as_ref())?;
        if let Some(suffix) = &self.vanity_suffix
            && !suffix.matches(&resolved.address)
        {
            return Err(ConsistencyError::SuffixMismatch {
                address: resolved.address,
                suffix: suffix.to_string(),
            }
            .into());
        }
        Ok(Resolution::Resolved(resolved))
    }

    fn finalize(self, resolved: ResolvedAddress) -> DeploymentPlan {
        tracing::info!(
            generation = %self.generation,
            address = %resolved.address,
            tick = self.starting_tick.tick,
            "Assembled deployment plan"
        );

        DeploymentPlan {
            generation: self.generation,
            chain_id: self.chain_id,
            target: self.target,
            calldata: self.call.encode(resolved.salt),
            value: self.value,
            predicted_address: resolved.address,
            salt: resolved.salt,
            init_code_hash: self.resolver.init_code_hash(),
            starting_tick: self.starting_tick.tick,
            tick_spacing: self.starting_tick.tick_spacing,
            effective_valuation: self.effective_valuation,
            merkle_root: self.tree.as_ref().map(MerkleAllocationTree::root),
            allocation_tree: self.tree.as_ref().map(MerkleAllocationTree::dump),
            summary: self.summary,
        }
    }
}

/// Compiles launch configurations against a schema catalogue.
#[derive(Debug, Clone, Copy)]
pub struct DeploymentCompiler<'a> {
    catalogue: &'a SchemaCatalogue,
}

impl<'a> DeploymentCompiler<'a> {
    /// Creates a new [`DeploymentCompiler`].
    #[must_use]
    pub const fn new(catalogue: &'a SchemaCatalogue) -> Self {
        Self { catalogue }
    }

    /// Selects the schema and runs every validator, stopping short of address resolution.
    fn prepare(&self, config: &LaunchConfig) -> Result<PreparedDeployment, LaunchError> {
        let generation = config.generation();
        let schema = self.catalogue.select(generation)?;
        tracing::debug!(
            %generation,
            chain_id = schema.chain_id,
            factory = %schema.factory,
            "Selected contract schema"
        );

        match config {
            LaunchConfig::V3_1(config) => prepare_legacy(schema, config),
            LaunchConfig::V4(config) => prepare_v4(schema, config),
        }
    }

    /// Compiles a configuration that needs no salt search.
    ///
    /// # Errors
    ///
    /// Returns a state error if the catalogue cannot serve the requested generation, a
    /// validation error naming the first invalid field, [`StateError::SearchRequired`] if a
    /// vanity suffix is requested without a salt, or a consistency error if the derived
    /// address disagrees with the expected address or suffix.
    pub fn compile(&self, config: &LaunchConfig) -> Result<DeploymentPlan, LaunchError> {
        let prepared = self.prepare(config)?;
        let resolved = match prepared.resolve_locally()? {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Search(suffix) => {
                return Err(StateError::SearchRequired {
                    suffix: suffix.to_string(),
                }
                .into());
            }
        };
        Ok(prepared.finalize(resolved))
    }

    /// Compiles a configuration, asking `search` for a salt when a vanity suffix is requested
    /// without one.
    ///
    /// # Errors
    ///
    /// Returns any [`Self::compile`] error other than a missing search, or the collaborator
    /// error of a failed search.
    pub async fn compile_with_search(
        &self,
        config: &LaunchConfig,
        search: &dyn SaltSearch,
    ) -> Result<DeploymentPlan, LaunchError> {
        let prepared = self.prepare(config)?;
        let resolved = match prepared.resolve_locally()? {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Search(suffix) => {
                let resolved = prepared.resolver.search(suffix, search).await?;
                if let Some(expected) = prepared.expected_address
                    && expected != resolved.address
                {
                    return Err(ConsistencyError::AddressMismatch {
                        derived: resolved.address,
                        claimed: expected,
                    }
                    .into());
                }
                resolved
            }
        };
        Ok(prepared.finalize(resolved))
    }
}

fn prepare_v4(
    schema: &ContractSchema,
    config: &V4LaunchConfig,
) -> Result<PreparedDeployment, LaunchError> {
    let token = &config.token;
    let vanity_suffix = check_token(token)?;
    let limits = schema.limits();

    // Pool
    let paired_token = config.pool.paired_token.unwrap_or(schema.wrapped_native);
    let paired_decimals = match config.pool.paired_decimals {
        Some(decimals) => Some(decimals),
        None if paired_token == schema.wrapped_native => Some(NATIVE_DECIMALS),
        None => None,
    };
    let tick_math = TickMath::DecimalsAware {
        tick_spacing: config.pool.tick_spacing.unwrap_or(DEFAULT_TICK_SPACING),
    };
    let valuation = Valuation::new(config.pool.starting_valuation, paired_decimals);
    let starting_tick = tick_math
        .starting_tick(&valuation)
        .map_err(|e| value_error(e, "starting_valuation").within("pool"))?;

    let positions = layout_positions(&config.pool.positions, &tick_math, &valuation, starting_tick)
        .map_err(|e| e.within("pool"))?;
    validate_positions(
        &positions,
        &PositionConstraints {
            tick_spacing: starting_tick.tick_spacing,
            starting_tick: Some(starting_tick.tick),
            max_positions: Some(limits.max_positions),
        },
    )
    .map_err(|e| e.within("pool.positions"))?;

    // Fees
    let fees = config.fees.encode().map_err(|e| e.within("fees"))?;
    let hook = schema.hook(fees.module)?;

    // Rewards
    let rewards = resolve_rewards(&config.rewards, token.admin)?;
    validate_splits(&rewards, &SplitConstraints::rewards(Some(limits.max_rewards)))
        .map_err(|e| e.within("rewards"))?;

    // Extensions
    let mut extensions = Vec::new();
    let mut tree = None;
    if let Some(vault) = &config.vault {
        extensions.push(vault_extension(schema, vault, token.admin)?);
    }
    if let Some(airdrop) = &config.airdrop {
        let (extension, built) = airdrop_extension(schema, airdrop, token.admin)?;
        extensions.push(extension);
        tree = Some(built);
    }
    if let Some(dev_buy) = &config.dev_buy {
        extensions.push(dev_buy_extension(schema, dev_buy, paired_token, token.admin)?);
    }
    validate_carve_outs(&extensions, limits.max_extension_bps, limits.max_extensions)?;

    let mev_module = if config.mev_protection {
        schema.mev_module()?
    } else {
        Address::ZERO
    };

    // Token
    let args = token_args(token, schema)?;
    let init_code = args.init_code(&schema.token_creation_code);
    let resolver = AddressResolver::new(schema.factory, &init_code, token.admin);

    let mut tick_lower = Vec::with_capacity(positions.len());
    let mut tick_upper = Vec::with_capacity(positions.len());
    for (index, position) in positions.iter().enumerate() {
        let field = format!("pool.positions[{index}]");
        tick_lower.push(int24(position.tick_lower, &format!("{field}.tick_lower"))?);
        tick_upper.push(int24(position.tick_upper, &format!("{field}.tick_upper"))?);
    }

    let deployment = TokenFactoryV4::DeploymentConfig {
        tokenConfig: TokenFactoryV4::TokenConfig {
            tokenAdmin: token.admin,
            name: args.name.clone(),
            symbol: args.symbol.clone(),
            salt: B256::ZERO,
            image: args.image.clone(),
            metadata: args.metadata.clone(),
            context: args.context.clone(),
            originatingChainId: U256::from(args.originating_chain_id),
        },
        poolConfig: TokenFactoryV4::PoolConfig {
            hook,
            pairedToken: paired_token,
            tickIfToken0IsNewToken: int24(starting_tick.tick, "pool.starting_valuation")?,
            tickSpacing: int24(starting_tick.tick_spacing, "pool.tick_spacing")?,
            poolData: PoolInitializationData {
                extension: Address::ZERO,
                extensionData: Bytes::new(),
                feeData: fees.data.clone(),
            }
            .abi_encode()
            .into(),
        },
        lockerConfig: TokenFactoryV4::LockerConfig {
            locker: schema.locker()?,
            rewardAdmins: rewards.iter().map(|r| r.admin).collect(),
            rewardRecipients: rewards.iter().map(|r| r.recipient).collect(),
            rewardBps: rewards.iter().map(|r| r.bps).collect(),
            tickLower: tick_lower,
            tickUpper: tick_upper,
            positionBps: positions.iter().map(|p| p.bps).collect(),
            lockerData: LockerFeeData {
                feePreference: rewards.iter().map(|r| r.preference.as_u8()).collect(),
            }
            .abi_encode()
            .into(),
        },
        mevModuleConfig: TokenFactoryV4::MevModuleConfig {
            mevModule: mev_module,
            mevModuleData: Bytes::new(),
        },
        extensionConfigs: extensions
            .iter()
            .map(|extension| extension.config.clone())
            .collect(),
    };

    let value = extensions
        .iter()
        .fold(U256::ZERO, |total, extension| total + extension.config.msgValue);

    Ok(PreparedDeployment {
        generation: ContractGeneration::V4,
        chain_id: schema.chain_id,
        target: schema.factory,
        resolver,
        call: PendingCall::V4(deployment),
        value,
        starting_tick,
        effective_valuation: tick_math.valuation_at_tick(starting_tick.tick, &valuation),
        tree,
        vanity_suffix,
        expected_address: token.expected_address,
        salt: token.salt,
        summary: PlanSummary {
            name: args.name,
            symbol: args.symbol,
            admin: token.admin,
            paired_token,
            fee_module: Some(fees.module),
            fee: config.fees,
            positions,
            rewards,
            extensions: extensions.iter().map(|e| e.summary).collect(),
        },
    })
}

fn prepare_legacy(
    schema: &ContractSchema,
    config: &LegacyLaunchConfig,
) -> Result<PreparedDeployment, LaunchError> {
    let generation = ContractGeneration::V3_1;
    let unsupported = |field: &str| {
        ValidationError::new(
            field,
            ValidationErrorKind::Unsupported {
                generation: generation.to_string(),
            },
        )
    };

    let token = &config.token;
    let vanity_suffix = check_token(token)?;
    let limits = schema.limits();

    if config.airdrop.is_some() {
        return Err(unsupported("airdrop").into());
    }
    if config.dev_buy.is_some() {
        return Err(unsupported("dev_buy").into());
    }
    if config.fees != FeePolicy::default() {
        return Err(unsupported("fees").into());
    }

    // Pool
    let paired_token = config.pool.paired_token.unwrap_or(schema.wrapped_native);
    if paired_token != schema.wrapped_native {
        tracing::warn!(
            paired = %paired_token,
            "Legacy tick math assumes an 18-decimal paired asset"
        );
    }
    let tick_math = TickMath::Legacy;
    let valuation = Valuation::new(config.pool.starting_valuation, None);
    let starting_tick = tick_math
        .starting_tick(&valuation)
        .map_err(|e| value_error(e, "starting_valuation").within("pool"))?;

    let positions = PositionPreset::Standard
        .positions(starting_tick.tick, starting_tick.tick_spacing)
        .map_err(|e| e.within("pool"))?;
    validate_positions(
        &positions,
        &PositionConstraints {
            tick_spacing: starting_tick.tick_spacing,
            starting_tick: Some(starting_tick.tick),
            max_positions: Some(limits.max_positions),
        },
    )
    .map_err(|e| e.within("pool.positions"))?;

    // Rewards
    let creator_percent = config.rewards.creator_percent;
    if creator_percent > LEGACY_MAX_CREATOR_PERCENT {
        return Err(ValidationError::new(
            "rewards.creator_percent",
            ValidationErrorKind::OutOfRange {
                value: u64::from(creator_percent),
                max: u64::from(LEGACY_MAX_CREATOR_PERCENT),
            },
        )
        .into());
    }
    let creator_recipient = config.rewards.creator_recipient.unwrap_or(token.admin);
    let interface_admin = config.rewards.interface_admin.unwrap_or(token.admin);
    let interface_recipient = config.rewards.interface_recipient.unwrap_or(interface_admin);
    let rewards = vec![
        SplitEntry {
            recipient: creator_recipient,
            admin: token.admin,
            bps: u16::from(creator_percent) * 100,
            preference: FeePreference::Both,
        },
        SplitEntry {
            recipient: interface_recipient,
            admin: interface_admin,
            bps: u16::from(100 - creator_percent) * 100,
            preference: FeePreference::Both,
        },
    ];
    validate_splits(
        &rewards,
        &SplitConstraints {
            policy: SharePolicy::FULL,
            max_entries: Some(limits.max_rewards),
            allow_duplicates: true,
            require_positive: false,
        },
    )
    .map_err(|e| {
        rebase_indexed(e, "rewards", |index, tail| {
            ["creator", "interface"]
                .get(index)
                .map(|party| format!("rewards.{party}_{tail}"))
        })
    })?;

    // Vault
    let schema_max_percent = u8::try_from(limits.max_extension_bps / 100).unwrap_or(u8::MAX);
    let max_vault_percent = LEGACY_MAX_VAULT_PERCENT.min(schema_max_percent);
    let (vault_config, extensions) = match &config.vault {
        Some(vault) => {
            if vault.percent > max_vault_percent {
                return Err(ValidationError::new(
                    "vault.percent",
                    ValidationErrorKind::OutOfRange {
                        value: u64::from(vault.percent),
                        max: u64::from(max_vault_percent),
                    },
                )
                .into());
            }
            check_lockup(vault.lockup_seconds, VAULT_MIN_LOCKUP_SECS)
                .map_err(|e| e.within("vault"))?;

            let summary = ExtensionSummary {
                kind: ExtensionKind::Vault,
                // The legacy factory manages its vault itself
                address: schema.extensions.vault.unwrap_or(schema.factory),
                bps: u16::from(vault.percent) * 100,
                msg_value: U256::ZERO,
            };
            (
                TokenFactoryV3::VaultConfig {
                    vaultPercentage: vault.percent,
                    vaultDuration: U256::from(vault.lockup_seconds),
                },
                vec![summary],
            )
        }
        None => (
            TokenFactoryV3::VaultConfig {
                vaultPercentage: 0,
                vaultDuration: U256::ZERO,
            },
            Vec::new(),
        ),
    };

    // Token
    let args = token_args(token, schema)?;
    let init_code = args.init_code(&schema.token_creation_code);
    let resolver = AddressResolver::new(schema.factory, &init_code, token.admin);

    let deployment = TokenFactoryV3::DeploymentConfig {
        tokenConfig: TokenFactoryV3::TokenConfig {
            name: args.name.clone(),
            symbol: args.symbol.clone(),
            salt: B256::ZERO,
            image: args.image.clone(),
            metadata: args.metadata.clone(),
            context: args.context.clone(),
            originatingChainId: U256::from(args.originating_chain_id),
        },
        vaultConfig: vault_config,
        poolConfig: TokenFactoryV3::PoolConfig {
            pairedToken: paired_token,
            tickIfToken0IsNewToken: int24(starting_tick.tick, "pool.starting_valuation")?,
        },
        initialBuyConfig: TokenFactoryV3::InitialBuyConfig {
            pairedTokenPoolFee: U24::from(LEGACY_PAIRED_POOL_FEE),
            pairedTokenSwapAmountOutMinimum: U256::ZERO,
        },
        rewardsConfig: TokenFactoryV3::RewardsConfig {
            creatorReward: U256::from(creator_percent),
            creatorAdmin: token.admin,
            creatorRewardRecipient: creator_recipient,
            interfaceAdmin: interface_admin,
            interfaceRewardRecipient: interface_recipient,
        },
    };

    Ok(PreparedDeployment {
        generation,
        chain_id: schema.chain_id,
        target: schema.factory,
        resolver,
        call: PendingCall::V3_1(deployment),
        value: U256::ZERO,
        starting_tick,
        effective_valuation: tick_math.valuation_at_tick(starting_tick.tick, &valuation),
        tree: None,
        vanity_suffix,
        expected_address: token.expected_address,
        salt: token.salt,
        summary: PlanSummary {
            name: args.name,
            symbol: args.symbol,
            admin: token.admin,
            paired_token,
            fee_module: None,
            fee: config.fees,
            positions,
            rewards,
            extensions,
        },
    })
}

/// An extension ready for the factory, with the split entry it is validated as.
#[derive(Debug)]
struct ResolvedExtension {
    name: &'static str,
    split: SplitEntry,
    config: TokenFactoryV4::ExtensionConfig,
    summary: ExtensionSummary,
}

impl ResolvedExtension {
    fn new(
        kind: ExtensionKind,
        name: &'static str,
        address: Address,
        admin: Address,
        bps: u16,
        msg_value: U256,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name,
            split: SplitEntry {
                recipient: address,
                admin,
                bps,
                preference: FeePreference::Both,
            },
            config: TokenFactoryV4::ExtensionConfig {
                extension: address,
                msgValue: msg_value,
                extensionBps: bps,
                extensionData: data.into(),
            },
            summary: ExtensionSummary {
                kind,
                address,
                bps,
                msg_value,
            },
        }
    }
}

fn vault_extension(
    schema: &ContractSchema,
    vault: &VaultSpec,
    token_admin: Address,
) -> Result<ResolvedExtension, LaunchError> {
    check_lockup(vault.lockup_seconds, VAULT_MIN_LOCKUP_SECS).map_err(|e| e.within("vault"))?;
    let admin = vault.admin.unwrap_or(token_admin);

    let data = VaultExtensionData {
        admin,
        lockupDuration: U256::from(vault.lockup_seconds),
        vestingDuration: U256::from(vault.vesting_seconds),
    }
    .abi_encode();

    Ok(ResolvedExtension::new(
        ExtensionKind::Vault,
        "vault",
        schema.vault_extension()?,
        admin,
        vault.bps,
        U256::ZERO,
        data,
    ))
}

fn airdrop_extension(
    schema: &ContractSchema,
    airdrop: &AirdropSpec,
    token_admin: Address,
) -> Result<(ResolvedExtension, MerkleAllocationTree), LaunchError> {
    check_lockup(airdrop.lockup_seconds, AIRDROP_MIN_LOCKUP_SECS)
        .map_err(|e| e.within("airdrop"))?;

    let tree =
        MerkleAllocationTree::from_human(&airdrop.entries, TOKEN_DECIMALS, airdrop.duplicate_policy)
            .map_err(|e| e.within("airdrop.entries"))?;
    tree.verify_all()?;

    let allocated =
        token_supply_base_units() * U256::from(airdrop.bps) / U256::from(BPS_DENOMINATOR);
    let requested = tree.total_amount();
    if requested > allocated {
        return Err(ValidationError::new(
            "airdrop.entries",
            ValidationErrorKind::AirdropExceedsAllocation {
                requested,
                allocated,
            },
        )
        .into());
    }

    let admin = airdrop.admin.unwrap_or(token_admin);
    let data = AirdropExtensionData {
        admin,
        merkleRoot: tree.root(),
        lockupDuration: U256::from(airdrop.lockup_seconds),
        vestingDuration: U256::from(airdrop.vesting_seconds),
    }
    .abi_encode();
    tracing::debug!(root = %tree.root(), entries = tree.len(), "Built airdrop allocation tree");

    let extension = ResolvedExtension::new(
        ExtensionKind::Airdrop,
        "airdrop",
        schema.airdrop_extension()?,
        admin,
        airdrop.bps,
        U256::ZERO,
        data,
    );
    Ok((extension, tree))
}

fn dev_buy_extension(
    schema: &ContractSchema,
    dev_buy: &DevBuySpec,
    paired_token: Address,
    token_admin: Address,
) -> Result<ResolvedExtension, LaunchError> {
    if paired_token != schema.wrapped_native {
        return Err(ValidationError::new(
            "dev_buy",
            ValidationErrorKind::Invalid(
                "requires the pool to be paired with the wrapped native asset".to_string(),
            ),
        )
        .into());
    }

    let value = decimal_to_base_units(dev_buy.paired_amount, NATIVE_DECIMALS)
        .map_err(|e| e.within("dev_buy.paired_amount"))?;
    if value.is_zero() {
        return Err(ValidationError::new(
            "dev_buy.paired_amount",
            ValidationErrorKind::InvalidAmount {
                value: dev_buy.paired_amount.to_string(),
                reason: "must be greater than zero".to_string(),
            },
        )
        .into());
    }

    let amount_out_min = decimal_to_base_units(dev_buy.amount_out_min, TOKEN_DECIMALS)
        .and_then(|amount| {
            u128::try_from(amount).map_err(|_| {
                ValidationError::new(
                    "",
                    ValidationErrorKind::InvalidAmount {
                        value: dev_buy.amount_out_min.to_string(),
                        reason: "does not fit in 128 bits".to_string(),
                    },
                )
            })
        })
        .map_err(|e| e.within("dev_buy.amount_out_min"))?;

    let recipient = dev_buy.recipient.unwrap_or(token_admin);
    if recipient.is_zero() {
        return Err(
            ValidationError::new("dev_buy.recipient", ValidationErrorKind::ZeroAddress).into(),
        );
    }
    let data = DevBuyExtensionData {
        // Only read when the paired asset is not the wrapped native asset
        pairedTokenPoolKey: PoolKey {
            currency0: Address::ZERO,
            currency1: Address::ZERO,
            fee: U24::ZERO,
            tickSpacing: I24::ZERO,
            hooks: Address::ZERO,
        },
        pairedTokenAmountOutMinimum: amount_out_min,
        recipient,
    }
    .abi_encode();

    Ok(ResolvedExtension::new(
        ExtensionKind::DevBuy,
        "dev_buy",
        schema.dev_buy_extension()?,
        recipient,
        0,
        value,
        data,
    ))
}

fn validate_carve_outs(
    extensions: &[ResolvedExtension],
    max_bps: u32,
    max_extensions: usize,
) -> Result<(), ValidationError> {
    let splits: Vec<SplitEntry> = extensions.iter().map(|e| e.split).collect();
    validate_splits(
        &splits,
        &SplitConstraints::carve_outs(max_bps, Some(max_extensions)),
    )
    .map_err(|e| {
        rebase_indexed(e, "extensions", |index, tail| {
            extensions
                .get(index)
                .map(|extension| format!("{}.{tail}", extension.name))
        })
    })?;
    Ok(())
}

fn check_token(token: &TokenSpec) -> Result<Option<VanitySuffix>, ValidationError> {
    let empty = |field: &str| {
        ValidationError::new(
            field,
            ValidationErrorKind::Invalid("must not be empty".to_string()),
        )
    };

    if token.name.trim().is_empty() {
        return Err(empty("token.name"));
    }
    if token.symbol.trim().is_empty() {
        return Err(empty("token.symbol"));
    }
    if token.admin.is_zero() {
        return Err(ValidationError::new(
            "token.admin",
            ValidationErrorKind::ZeroAddress,
        ));
    }

    token
        .vanity_suffix
        .as_deref()
        .map(str::parse::<VanitySuffix>)
        .transpose()
        .map_err(|e| e.within("token.vanity_suffix"))
}

fn token_args(
    token: &TokenSpec,
    schema: &ContractSchema,
) -> Result<TokenConstructorArgs, ValidationError> {
    let json = |field: &str, result: serde_json::Result<String>| {
        result.map_err(|e| {
            ValidationError::new(field, ValidationErrorKind::Invalid(e.to_string()))
        })
    };

    Ok(TokenConstructorArgs {
        name: token.name.clone(),
        symbol: token.symbol.clone(),
        max_supply: token_supply_base_units(),
        admin: token.admin,
        image: token.image.clone(),
        metadata: json("token.metadata", serde_json::to_string(&token.metadata))?,
        context: json("token.context", serde_json::to_string(&token.context))?,
        originating_chain_id: token.originating_chain_id.unwrap_or(schema.chain_id),
    })
}

fn resolve_rewards(
    rewards: &[RewardSpec],
    token_admin: Address,
) -> Result<Vec<SplitEntry>, ValidationError> {
    if rewards.is_empty() {
        return Ok(vec![SplitEntry {
            recipient: token_admin,
            admin: token_admin,
            bps: BPS_DENOMINATOR as u16,
            preference: FeePreference::Both,
        }]);
    }

    let shares = match rewards.iter().map(|r| r.bps).collect::<Option<Vec<u16>>>() {
        Some(shares) => shares,
        None if rewards.iter().all(|r| r.bps.is_none()) => {
            apportion(&vec![1; rewards.len()], BPS_DENOMINATOR)
                .into_iter()
                .map(|share| share as u16)
                .collect()
        }
        None => {
            return Err(ValidationError::new(
                "rewards",
                ValidationErrorKind::MixedShareAuthoring,
            ));
        }
    };

    Ok(rewards
        .iter()
        .zip(shares)
        .map(|(reward, bps)| SplitEntry {
            recipient: reward.recipient,
            admin: reward.admin.unwrap_or(reward.recipient),
            bps,
            preference: reward.preference,
        })
        .collect())
}

fn layout_positions(
    layout: &PositionLayout,
    tick_math: &TickMath,
    valuation: &Valuation,
    starting_tick: StartingTick,
) -> Result<Vec<Position>, ValidationError> {
    match layout {
        PositionLayout::Preset { preset } => {
            preset.positions(starting_tick.tick, starting_tick.tick_spacing)
        }
        PositionLayout::Ticks { positions } => Ok(positions.clone()),
        PositionLayout::Valuations { ranges } => ranges
            .iter()
            .enumerate()
            .map(|(index, range)| {
                let tick_at = |value: f64, field: &str| {
                    tick_math
                        .starting_tick(&Valuation { value, ..*valuation })
                        .map(|tick| tick.tick)
                        .map_err(|e| value_error(e, &format!("positions[{index}].{field}")))
                };

                let lower = tick_at(range.lower_valuation, "lower_valuation")?;
                let upper = match range.upper_valuation {
                    Some(value) => tick_at(value, "upper_valuation")?,
                    None => max_usable_tick(starting_tick.tick_spacing),
                };
                Ok(Position::new(lower, upper, range.bps))
            })
            .collect(),
    }
}

fn check_lockup(seconds: u64, min_seconds: u64) -> Result<(), ValidationError> {
    if seconds < min_seconds {
        return Err(ValidationError::new(
            "lockup_seconds",
            ValidationErrorKind::DurationTooShort {
                seconds,
                min_seconds,
            },
        ));
    }
    Ok(())
}

fn int24(value: i32, field: &str) -> Result<I24, ValidationError> {
    I24::try_from(value).map_err(|_| {
        ValidationError::new(
            field,
            ValidationErrorKind::Invalid(format!("{value} does not fit in int24")),
        )
    })
}

/// Renames the tick math's `value` field to the configuration field it came from.
fn value_error(mut error: ValidationError, field: &str) -> ValidationError {
    if error.field == "value" {
        error.field = field.to_string();
    }
    error
}

/// Replaces a leading `[index].` segment with a named field, or nests the error under
/// `fallback` when there is none.
fn rebase_indexed(
    mut error: ValidationError,
    fallback: &str,
    name: impl Fn(usize, &str) -> Option<String>,
) -> ValidationError {
    let renamed = error
        .field
        .strip_prefix('[')
        .and_then(|rest| rest.split_once("]."))
        .and_then(|(index, tail)| name(index.parse().ok()?, tail));

    match renamed {
        Some(field) => {
            error.field = field;
            error
        }
        None => error.within(fallback),
    }
}

#[cfg(test)]
mod tests {
    use launchkit_params::ShareViolation;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_rebase_indexed_names_extension() {
        let error = ValidationError::new(
            "[1].bps",
            ValidationErrorKind::Shares(ShareViolation::Excess {
                index: 1,
                total: 9_500,
                limit: 9_000,
                excess: 500,
            }),
        );
        let names = ["vault", "airdrop"];
        let rebased = rebase_indexed(error, "extensions", |index, tail| {
            names.get(index).map(|name| format!("{name}.{tail}"))
        });
        assert_eq!(rebased.field, "airdrop.bps");
    }

    #[rstest]
    fn test_rebase_indexed_falls_back_for_set_errors() {
        let error = ValidationError::new(
            "",
            ValidationErrorKind::TooManyEntries { count: 11, max: 10 },
        );
        let rebased = rebase_indexed(error, "extensions", |_, _| None);
        assert_eq!(rebased.field, "extensions");
    }

    #[rstest]
    fn test_even_split_when_all_shares_omitted() {
        let reward = |byte| RewardSpec {
            recipient: Address::repeat_byte(byte),
            admin: None,
            bps: None,
            preference: FeePreference::Both,
        };
        let splits = resolve_rewards(&[reward(1), reward(2), reward(3)], Address::ZERO).unwrap();

        let shares: Vec<u16> = splits.iter().map(|s| s.bps).collect();
        assert_eq!(shares, vec![3_334, 3_333, 3_333]);
        assert_eq!(splits[0].admin, Address::repeat_byte(1));
    }

    #[rstest]
    fn test_mixed_share_authoring_rejected() {
        let rewards = [
            RewardSpec {
                recipient: Address::repeat_byte(1),
                admin: None,
                bps: Some(5_000),
                preference: FeePreference::Both,
            },
            RewardSpec {
                recipient: Address::repeat_byte(2),
                admin: None,
                bps: None,
                preference: FeePreference::Both,
            },
        ];
        let err = resolve_rewards(&rewards, Address::ZERO).unwrap_err();
        assert_eq!(err.field, "rewards");
        assert_eq!(err.kind, ValidationErrorKind::MixedShareAuthoring);
    }

    #[rstest]
    #[case(-230_400)]
    #[case(887_200)]
    fn test_int24_accepts_tick_domain(#[case] tick: i32) {
        assert!(int24(tick, "tick").is_ok());
    }

    #[rstest]
    fn test_int24_rejects_overflow() {
        assert_eq!(int24(1 << 23, "tick").unwrap_err().field, "tick");
    }
}
