//! Reads from the raw price sources. Every price leaving this module is in
//! 18 decimals and strictly positive. A source that traps or returns something
//! undecodable is reported as a stale price.

use gyro_common::fixed_point::{self, ONE};
use gyro_common::interfaces::{PriceFeedClient, RelativePriceOracleClient};
use gyro_common::{Asset, Error, OracleConfig, PriceData};
use soroban_sdk::{Address, Env, Vec, log};

use crate::aggregation::{self, MedianRounding};

fn is_fresh(env: &Env, timestamp: u64, config: &OracleConfig) -> bool {
    env.ledger().timestamp().saturating_sub(timestamp) <= config.max_price_age
}

fn ensure_positive(env: &Env, price: i128) -> Result<i128, Error> {
    if price <= 0 {
        log!(env, "source reported a non-positive price", price);
        return Err(Error::NegativePrice);
    }
    Ok(price)
}

/// Latest report of `asset` on a SEP-40 feed
fn feed_price(env: &Env, feed: &Address, asset: &Address) -> Result<Option<PriceData>, Error> {
    let client = PriceFeedClient::new(env, feed);
    let decimals = match client.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(Error::StalePrice),
    };
    let report = match client.try_lastprice(&Asset::Stellar(asset.clone())) {
        Ok(Ok(report)) => report,
        _ => return Err(Error::StalePrice),
    };

    match report {
        Some(PriceData { price, timestamp }) => {
            let price = fixed_point::scale_to_one(ensure_positive(env, price)?, decimals)?;
            Ok(Some(PriceData { price, timestamp }))
        }
        None => Ok(None),
    }
}

/// Price of `asset` on the direct USD feed. A price older than the allowed
/// age is an error rather than a missing price.
pub fn usd_feed_price(
    env: &Env,
    feed: &Address,
    asset: &Address,
    config: &OracleConfig,
) -> Result<Option<i128>, Error> {
    match feed_price(env, feed, asset)? {
        Some(report) if !is_fresh(env, report.timestamp, config) => {
            log!(env, "usd feed price too old", asset.clone(), report.timestamp);
            Err(Error::StalePrice)
        }
        Some(report) => Ok(Some(report.price)),
        None => Ok(None),
    }
}

/// Median of the fresh reports of `asset` across the signed sources. Stale
/// reports are skipped; `None` when no source has a fresh one.
pub fn signed_price(
    env: &Env,
    sources: &Vec<Address>,
    asset: &Address,
    config: &OracleConfig,
) -> Result<Option<i128>, Error> {
    let mut prices = Vec::new(env);
    for source in sources.iter() {
        if let Some(report) = feed_price(env, &source, asset)? {
            if is_fresh(env, report.timestamp, config) {
                prices.push_back(report.price);
            }
        }
    }
    if prices.is_empty() {
        return Ok(None);
    }
    aggregation::median(&prices, MedianRounding::Down).map(Some)
}

/// Every token quoted by at least one signed source. A source whose asset
/// list cannot be read adds no references.
pub fn signed_assets(env: &Env, sources: &Vec<Address>) -> Vec<Address> {
    let mut assets: Vec<Address> = Vec::new(env);
    for source in sources.iter() {
        let quoted = match PriceFeedClient::new(env, &source).try_assets() {
            Ok(Ok(quoted)) => quoted,
            _ => {
                log!(env, "signed source did not list its assets", source);
                continue;
            }
        };
        for asset in quoted.iter() {
            if let Asset::Stellar(token) = asset {
                if !assets.contains(&token) {
                    assets.push_back(token);
                }
            }
        }
    }
    assets
}

fn relative_observations(
    env: &Env,
    oracle: &Address,
    base: &Address,
    quote: &Address,
) -> Result<Vec<i128>, Error> {
    match RelativePriceOracleClient::new(env, oracle).try_relative_prices(base, quote) {
        Ok(Ok(observations)) => Ok(observations),
        _ => Err(Error::StalePrice),
    }
}

/// Price of `base` in units of `quote`, aggregated over the relative oracle's
/// observations. Observations of the reversed pair are inverted. `None` when
/// the oracle supports neither direction.
pub fn relative_price(
    env: &Env,
    oracle: &Address,
    base: &Address,
    quote: &Address,
) -> Result<Option<i128>, Error> {
    let mut observations = relative_observations(env, oracle, base, quote)?;
    for observation in observations.iter() {
        ensure_positive(env, observation)?;
    }

    if observations.is_empty() {
        for observation in relative_observations(env, oracle, quote, base)?.iter() {
            let inverted = fixed_point::div_down(env, ONE, ensure_positive(env, observation)?)?;
            observations.push_back(inverted);
        }
    }
    if observations.is_empty() {
        return Ok(None);
    }
    aggregation::compute_min_or_second_min(&observations).map(Some)
}
