use gyro_common::fixed_point;
use gyro_common::{Error, Metadata, Order, SafetyConfig, VaultMetadata};
use soroban_sdk::{Env, Vec};

use crate::weights;

/// Per-vault view of the reserve after `order` is applied, with epsilon
/// status filled in. Peg and price flags start out true and are settled by
/// the price safety step.
pub fn build_metadata(env: &Env, order: &Order, config: &SafetyConfig) -> Result<Metadata, Error> {
    let vaults = &order.vaults_with_amount;
    let ideal_weights = weights::calculate_ideal_weights(env, vaults)?;

    let mut resulting_amounts = Vec::new(env);
    let mut prices = Vec::new(env);
    for vault in vaults.iter() {
        if vault.amount < 0 {
            return Err(Error::InvalidArgument);
        }
        let balance = vault.vault_info.reserve_balance;
        let resulting = if order.mint {
            fixed_point::add(balance, vault.amount)?
        } else {
            fixed_point::sub(balance, vault.amount)?
        };
        resulting_amounts.push_back(resulting);
        prices.push_back(vault.vault_info.price);
    }
    let (resulting_weights, _) =
        weights::calculate_weights_and_total(env, &resulting_amounts, &prices)?;

    let mut vault_metadata = Vec::new(env);
    for (index, vault) in vaults.iter().enumerate() {
        let index = index as u32;
        let ideal_weight = ideal_weights.get_unchecked(index);
        let resulting_weight = resulting_weights.get_unchecked(index);
        vault_metadata.push_back(VaultMetadata {
            pool_id: vault.vault_info.persisted_metadata.pool_id,
            ideal_weight,
            current_weight: vault.vault_info.current_weight,
            resulting_weight,
            delta_weight: fixed_point::abs_diff(resulting_weight, ideal_weight)?,
            price: vault.vault_info.price,
            all_stablecoins_on_peg: true,
            all_token_prices_large_enough: true,
            vault_within_epsilon: true,
        });
    }

    let metadata = Metadata {
        vault_metadata,
        all_vaults_within_epsilon: true,
        all_stablecoins_on_peg: true,
        all_prices_large_enough: true,
        mint: order.mint,
    };
    update_metadata_with_epsilon_status(env, metadata, config)
}

/// A vault is within epsilon when its resulting weight is no further from
/// ideal than `max_allowed_vault_deviation` times the ideal weight.
pub fn update_metadata_with_epsilon_status(
    env: &Env,
    mut metadata: Metadata,
    config: &SafetyConfig,
) -> Result<Metadata, Error> {
    let mut all_within = true;
    for index in 0..metadata.vault_metadata.len() {
        let mut vault = metadata.vault_metadata.get_unchecked(index);
        let allowed =
            fixed_point::mul_up(env, vault.ideal_weight, config.max_allowed_vault_deviation)?;
        vault.vault_within_epsilon = vault.delta_weight <= allowed;
        all_within &= vault.vault_within_epsilon;
        metadata.vault_metadata.set(index, vault);
    }
    metadata.all_vaults_within_epsilon = all_within;
    Ok(metadata)
}

/// True when every vault outside epsilon ends up strictly closer to its
/// ideal weight than it currently is.
pub fn vault_weight_off_peg_falls(metadata: &Metadata) -> Result<bool, Error> {
    for vault in metadata.vault_metadata.iter() {
        if vault.vault_within_epsilon {
            continue;
        }
        let current_delta = fixed_point::abs_diff(vault.current_weight, vault.ideal_weight)?;
        if vault.delta_weight >= current_delta {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether an order that leaves some vault outside epsilon may still go
/// through: prices must be trustworthy and every such vault must be moving
/// back toward its ideal weight.
pub fn safe_to_execute_outside_epsilon(metadata: &Metadata) -> Result<bool, Error> {
    if !metadata.all_stablecoins_on_peg || !metadata.all_prices_large_enough {
        return Ok(false);
    }
    vault_weight_off_peg_falls(metadata)
}
