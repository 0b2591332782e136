//! Vault weight arithmetic. Weights are 18-decimal fractions of the total
//! reserve value.

use gyro_common::fixed_point;
use gyro_common::{Error, VaultWithAmount};
use soroban_sdk::{Env, Vec};

/// Target weight of every vault, renormalized by the price it was registered at:
/// `w_i = p0_i * w0_i / sum_j(p0_j * w0_j)`.
pub fn calculate_ideal_weights(
    env: &Env,
    vaults: &Vec<VaultWithAmount>,
) -> Result<Vec<i128>, Error> {
    let mut values = Vec::new(env);
    let mut total = 0;
    for vault in vaults.iter() {
        let persisted = vault.vault_info.persisted_metadata;
        let value =
            fixed_point::mul_down(env, persisted.initial_price, persisted.initial_weight)?;
        total = fixed_point::add(total, value)?;
        values.push_back(value);
    }

    let mut weights = Vec::new(env);
    for value in values.iter() {
        weights.push_back(fixed_point::div_down(env, value, total)?);
    }
    Ok(weights)
}

/// Value share of each position and the total value, where a position is
/// worth `amount * price`. A zero total yields zero weights.
pub fn calculate_weights_and_total(
    env: &Env,
    amounts: &Vec<i128>,
    prices: &Vec<i128>,
) -> Result<(Vec<i128>, i128), Error> {
    if amounts.len() != prices.len() {
        return Err(Error::AmountAndPriceLengthDiffer);
    }

    let mut values = Vec::new(env);
    let mut total = 0;
    for (amount, price) in amounts.iter().zip(prices.iter()) {
        let value = fixed_point::mul_down(env, amount, price)?;
        total = fixed_point::add(total, value)?;
        values.push_back(value);
    }

    let mut weights = Vec::new(env);
    for value in values.iter() {
        let weight = if total == 0 {
            0
        } else {
            fixed_point::div_down(env, value, total)?
        };
        weights.push_back(weight);
    }
    Ok((weights, total))
}
