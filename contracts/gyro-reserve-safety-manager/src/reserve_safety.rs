use gyro_common::{
    Error, Metadata, Order, SafetyConfig, VaultMetadata, VaultWithAmount, fixed_point::ONE,
};
use soroban_sdk::{
    Address, BytesN, Env, Symbol, Vec, contract, contractimpl, contracttype, log, symbol_short,
};

use crate::events::{AssetRegistrySet, PoolProviderSet, PriceOracleSet, SafetyConfigUpdated};
use crate::{metadata, price_safety, weights};

/// Weights may drift 20% (relative) from ideal before an order must be corrective
pub const DEFAULT_MAX_ALLOWED_VAULT_DEVIATION: i128 = ONE / 5;
/// Stablecoins count as on peg within $0.06 of $1
pub const DEFAULT_STABLECOIN_MAX_DEVIATION: i128 = 60_000_000_000_000_000;
pub const DEFAULT_MIN_TOKEN_PRICE: i128 = 10_000_000_000_000;

pub fn default_safety_config() -> SafetyConfig {
    SafetyConfig {
        max_allowed_vault_deviation: DEFAULT_MAX_ALLOWED_VAULT_DEVIATION,
        stablecoin_max_deviation: DEFAULT_STABLECOIN_MAX_DEVIATION,
        min_token_price: DEFAULT_MIN_TOKEN_PRICE,
    }
}

const ADMIN_KEY: Symbol = symbol_short!("ADMIN");
const STORAGE: Symbol = symbol_short!("STORAGE");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SafetyStorage {
    pub config: SafetyConfig,
    /// Checked USD price oracle
    pub price_oracle: Address,
    /// Source of the tokens and balances of each vault's pool
    pub pool_provider: Address,
    /// Registry telling which tokens are stablecoins
    pub asset_registry: Address,
}

impl SafetyStorage {
    /// Get current state of the contract
    pub fn get_state(env: &Env) -> SafetyStorage {
        env.storage()
            .instance()
            .get(&STORAGE)
            .expect("safety manager not initialized")
    }

    pub fn set_state(env: &Env, storage: &SafetyStorage) {
        env.storage().instance().set(&STORAGE, storage);
    }
}

fn validate_config(config: &SafetyConfig) -> Result<(), Error> {
    if config.max_allowed_vault_deviation < 0
        || config.stablecoin_max_deviation < 0
        || config.min_token_price < 0
    {
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

/// Decides whether mint and redeem orders keep the reserve balanced and
/// priced safely. Holds no state beyond its configuration; every check reads
/// pool composition and prices fresh.
#[contract]
pub struct ReserveSafetyManager;

#[contractimpl]
impl ReserveSafetyManager {
    pub fn __constructor(
        env: &Env,
        admin: Address,
        config: SafetyConfig,
        price_oracle: Address,
        pool_provider: Address,
        asset_registry: Address,
    ) -> Result<(), Error> {
        validate_config(&config)?;
        Self::set_admin(env, &admin);
        SafetyStorage::set_state(
            env,
            &SafetyStorage {
                config,
                price_oracle,
                pool_provider,
                asset_registry,
            },
        );
        Ok(())
    }

    /// Ok when minting `order` keeps the reserve safe, otherwise the most
    /// specific reason it does not.
    pub fn is_mint_safe(env: &Env, order: Order) -> Result<(), Error> {
        Self::check_order(env, order, true)
    }

    /// Ok when redeeming `order` keeps the reserve safe, otherwise the most
    /// specific reason it does not.
    pub fn is_redeem_safe(env: &Env, order: Order) -> Result<(), Error> {
        Self::check_order(env, order, false)
    }

    pub fn calculate_ideal_weights(
        env: &Env,
        vaults: Vec<VaultWithAmount>,
    ) -> Result<Vec<i128>, Error> {
        weights::calculate_ideal_weights(env, &vaults)
    }

    pub fn calculate_weights_and_total(
        env: &Env,
        amounts: Vec<i128>,
        prices: Vec<i128>,
    ) -> Result<(Vec<i128>, i128), Error> {
        weights::calculate_weights_and_total(env, &amounts, &prices)
    }

    pub fn build_metadata(env: &Env, order: Order) -> Result<Metadata, Error> {
        metadata::build_metadata(env, &order, &SafetyStorage::get_state(env).config)
    }

    pub fn update_metadata_epsilon_status(
        env: &Env,
        metadata: Metadata,
    ) -> Result<Metadata, Error> {
        let config = SafetyStorage::get_state(env).config;
        metadata::update_metadata_with_epsilon_status(env, metadata, &config)
    }

    pub fn vault_weight_off_peg_falls(metadata: Metadata) -> Result<bool, Error> {
        metadata::vault_weight_off_peg_falls(&metadata)
    }

    pub fn update_vault_with_price_safety(
        env: &Env,
        vault_metadata: VaultMetadata,
    ) -> Result<VaultMetadata, Error> {
        price_safety::update_vault_with_price_safety(
            env,
            vault_metadata,
            &SafetyStorage::get_state(env),
        )
    }

    pub fn update_metadata_price_safety(
        env: &Env,
        metadata: Metadata,
    ) -> Result<Metadata, Error> {
        let storage = SafetyStorage::get_state(env);
        price_safety::update_metadata_with_price_safety(env, metadata, &storage)
    }

    pub fn safe_to_execute_outside_epsilon(metadata: Metadata) -> Result<bool, Error> {
        metadata::safe_to_execute_outside_epsilon(&metadata)
    }

    /// Replace the safety thresholds. Admin-only.
    pub fn set_config(env: &Env, config: SafetyConfig) -> Result<(), Error> {
        Self::require_admin(env);
        validate_config(&config)?;
        let mut storage = SafetyStorage::get_state(env);
        storage.config = config.clone();
        SafetyStorage::set_state(env, &storage);
        SafetyConfigUpdated { config }.publish(env);
        Ok(())
    }

    pub fn set_price_oracle(env: &Env, oracle: Address) {
        Self::require_admin(env);
        let mut storage = SafetyStorage::get_state(env);
        storage.price_oracle = oracle.clone();
        SafetyStorage::set_state(env, &storage);
        PriceOracleSet { oracle }.publish(env);
    }

    pub fn set_pool_provider(env: &Env, provider: Address) {
        Self::require_admin(env);
        let mut storage = SafetyStorage::get_state(env);
        storage.pool_provider = provider.clone();
        SafetyStorage::set_state(env, &storage);
        PoolProviderSet { provider }.publish(env);
    }

    pub fn set_asset_registry(env: &Env, registry: Address) {
        Self::require_admin(env);
        let mut storage = SafetyStorage::get_state(env);
        storage.asset_registry = registry.clone();
        SafetyStorage::set_state(env, &storage);
        AssetRegistrySet { registry }.publish(env);
    }

    pub fn get_config(env: &Env) -> SafetyConfig {
        SafetyStorage::get_state(env).config
    }

    pub fn get_price_oracle(env: &Env) -> Address {
        SafetyStorage::get_state(env).price_oracle
    }

    pub fn get_pool_provider(env: &Env) -> Address {
        SafetyStorage::get_state(env).pool_provider
    }

    pub fn get_asset_registry(env: &Env) -> Address {
        SafetyStorage::get_state(env).asset_registry
    }

    /// Upgrade the contract to new wasm. Admin-only.
    pub fn upgrade(env: &Env, new_wasm_hash: BytesN<32>) {
        Self::require_admin(env);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    fn check_order(env: &Env, order: Order, mint: bool) -> Result<(), Error> {
        if order.mint != mint {
            log!(env, "order direction does not match the check", order.mint);
            return Err(if mint {
                Error::NotSafeToMint
            } else {
                Error::NotSafeToRedeem
            });
        }
        if order.vaults_with_amount.is_empty() {
            return Err(Error::InvalidArgument);
        }
        if !mint {
            for vault in order.vaults_with_amount.iter() {
                if vault.amount > vault.vault_info.reserve_balance {
                    log!(env, "redeem exceeds reserve balance", vault.vault_info.vault);
                    return Err(Error::TryingToRedeemMoreThanVaultContains);
                }
            }
        }

        let storage = SafetyStorage::get_state(env);
        let metadata = metadata::build_metadata(env, &order, &storage.config)?;
        let metadata = price_safety::update_metadata_with_price_safety(env, metadata, &storage)?;

        if !metadata.all_prices_large_enough {
            return Err(Error::TokenPricesTooSmall);
        }
        if (metadata.all_vaults_within_epsilon && metadata.all_stablecoins_on_peg)
            || metadata::safe_to_execute_outside_epsilon(&metadata)?
        {
            return Ok(());
        }
        if !metadata.all_stablecoins_on_peg {
            return Err(Error::AVaultHasAllStablecoinsOffPeg);
        }
        Err(Error::WouldUnbalanceGyroscope)
    }

    fn admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&ADMIN_KEY)
    }

    /// Set the admin address. Can only be called once.
    fn set_admin(env: &Env, admin: &Address) {
        if env.storage().instance().has(&ADMIN_KEY) {
            panic!("admin already set");
        }
        env.storage().instance().set(&ADMIN_KEY, admin);
    }

    fn require_admin(env: &Env) {
        let admin = Self::admin(env).expect("admin not set");
        admin.require_auth();
    }
}
