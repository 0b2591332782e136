use crate::{Asset, Error, PriceData};
use soroban_sdk::{Env, Vec};

/// SEP-40 consumer interface
pub trait IsSep40 {
    /// Assets this feed quotes
    fn assets(env: &Env) -> Vec<Asset>;

    /// Asset all prices are denominated in
    fn base(env: &Env) -> Asset;

    /// Decimals of every reported price
    fn decimals(env: &Env) -> u32;

    /// Latest reported price for an asset
    fn lastprice(env: &Env, asset: Asset) -> Option<PriceData>;

    /// Price reported at exactly `timestamp`
    fn price(env: &Env, asset: Asset, timestamp: u64) -> Option<PriceData>;

    /// Up to `records` most recent prices, newest first
    fn prices(env: &Env, asset: Asset, records: u32) -> Option<Vec<PriceData>>;

    /// Expected update period in seconds
    fn resolution(env: &Env) -> u32;
}

/// Signer side of the feed. Only the trusted signer may call these.
pub trait IsSep40Admin {
    /// Start quoting `assets`. Fails if any of them is already quoted.
    fn add_assets(env: &Env, assets: Vec<Asset>) -> Result<(), Error>;

    /// Attest `price` for `asset` as of `timestamp`
    fn set_asset_price(env: &Env, asset: Asset, price: i128, timestamp: u64) -> Result<(), Error>;

    /// Attest several prices sharing one timestamp
    fn set_asset_prices(
        env: &Env,
        updates: Vec<(Asset, i128)>,
        timestamp: u64,
    ) -> Result<(), Error>;
}
