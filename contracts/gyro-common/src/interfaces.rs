//! Capabilities the reserve contracts consume from other contracts. Each trait
//! only generates a client, so any contract exposing these functions can be
//! plugged in: a production feed, an AMM-backed oracle, or a test mock.

use soroban_sdk::{Address, BytesN, Env, Symbol, Vec, contractclient};

use crate::{Asset, Error, PriceData};

/// Consumer subset of a SEP-40 price feed
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// Return all assets quoted by the price feed
    fn assets(env: Env) -> Vec<Asset>;

    /// Return the number of decimals for all assets quoted by the feed
    fn decimals(env: Env) -> u32;

    /// Get the most recent price for an asset
    fn lastprice(env: Env, asset: Asset) -> Option<PriceData>;
}

/// On-chain relative prices, typically time-weighted averages read from AMM pools
#[contractclient(name = "RelativePriceOracleClient")]
pub trait RelativePriceOracle {
    /// Observations of `base` priced in `quote` (18 decimals), one per pool or
    /// window. Empty when the pair is not supported.
    fn relative_prices(env: Env, base: Address, quote: Address) -> Vec<i128>;
}

/// Trusted USD prices, one per requested asset and in the same order
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn get_prices_usd(env: Env, assets: Vec<Address>) -> Result<Vec<i128>, Error>;
}

/// Read-only view of the pools backing the reserve vaults
#[contractclient(name = "PoolTokenProviderClient")]
pub trait PoolTokenProvider {
    /// Tokens of a pool and their balances, index-aligned
    fn get_pool_tokens(env: Env, pool_id: BytesN<32>) -> (Vec<Address>, Vec<i128>);
}

#[contractclient(name = "AssetRegistryClient")]
pub trait AssetRegistry {
    fn is_stable_asset(env: Env, asset: Address) -> bool;

    fn get_asset_address(env: Env, symbol: Symbol) -> Result<Address, Error>;
}
