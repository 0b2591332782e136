use gyro_common::fixed_point::{self, ONE};
use gyro_common::interfaces::{AssetRegistryClient, PoolTokenProviderClient, PriceOracleClient};
use gyro_common::{Error, Metadata, VaultMetadata};
use soroban_sdk::{Address, Env, Vec, log};

use crate::reserve_safety::SafetyStorage;

/// USD prices of `tokens`. Oracle errors are passed through; a call that
/// fails without one is treated as a stale price.
fn prices_usd(env: &Env, oracle: &Address, tokens: &Vec<Address>) -> Result<Vec<i128>, Error> {
    let prices = match PriceOracleClient::new(env, oracle).try_get_prices_usd(tokens) {
        Ok(Ok(prices)) => prices,
        Err(Ok(error)) => return Err(error),
        _ => return Err(Error::StalePrice),
    };
    if prices.len() != tokens.len() {
        return Err(Error::AmountAndPriceLengthDiffer);
    }
    Ok(prices)
}

/// Settle the peg and price floor flags of one vault from the live
/// composition of its pool.
pub fn update_vault_with_price_safety(
    env: &Env,
    mut vault: VaultMetadata,
    storage: &SafetyStorage,
) -> Result<VaultMetadata, Error> {
    let (tokens, balances) =
        PoolTokenProviderClient::new(env, &storage.pool_provider).get_pool_tokens(&vault.pool_id);
    if tokens.len() != balances.len() {
        return Err(Error::TokenAndAmountsLengthDiffer);
    }

    let registry = AssetRegistryClient::new(env, &storage.asset_registry);
    let prices = prices_usd(env, &storage.price_oracle, &tokens)?;
    let config = &storage.config;

    let mut on_peg = true;
    // one token at or above the floor is enough to price the pool
    let mut large_enough = tokens.is_empty();
    for (token, price) in tokens.iter().zip(prices.iter()) {
        if price >= config.min_token_price {
            large_enough = true;
        }
        if registry.is_stable_asset(&token)
            && fixed_point::abs_diff(price, ONE)? > config.stablecoin_max_deviation
        {
            log!(env, "stablecoin off peg", token, price);
            on_peg = false;
        }
    }

    if !large_enough {
        log!(env, "every pool token priced below the floor", vault.pool_id.clone());
    }
    vault.all_stablecoins_on_peg = on_peg;
    vault.all_token_prices_large_enough = large_enough;
    Ok(vault)
}

pub fn update_metadata_with_price_safety(
    env: &Env,
    mut metadata: Metadata,
    storage: &SafetyStorage,
) -> Result<Metadata, Error> {
    let mut all_on_peg = true;
    let mut all_large_enough = true;
    for index in 0..metadata.vault_metadata.len() {
        let vault = update_vault_with_price_safety(
            env,
            metadata.vault_metadata.get_unchecked(index),
            storage,
        )?;
        all_on_peg &= vault.all_stablecoins_on_peg;
        all_large_enough &= vault.all_token_prices_large_enough;
        metadata.vault_metadata.set(index, vault);
    }
    metadata.all_stablecoins_on_peg = all_on_peg;
    metadata.all_prices_large_enough = all_large_enough;
    Ok(metadata)
}
