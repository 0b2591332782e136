use soroban_sdk::{
    Address, BytesN, Env, Map, Symbol, Vec, contract, contractimpl, contracttype, log,
    symbol_short,
};

use crate::events::{AssetsAdded, PricePosted};
use crate::sep40::{IsSep40, IsSep40Admin};
use crate::{Asset, Error, PriceData};

const ADMIN_KEY: Symbol = symbol_short!("ADMIN");
const STORAGE: Symbol = symbol_short!("STORAGE");

#[contracttype]
#[derive(Clone, Debug)]
pub struct PriceFeedStorage {
    assets: Vec<Asset>,
    base: Asset,
    decimals: u32,
    resolution: u32,
    last_timestamp: u64,
}

impl PriceFeedStorage {
    pub fn get_state(env: &Env) -> PriceFeedStorage {
        env.storage()
            .instance()
            .get(&STORAGE)
            .expect("price feed not initialized")
    }

    pub fn set_state(env: &Env, storage: &PriceFeedStorage) {
        env.storage().instance().set(&STORAGE, storage);
    }
}

#[contracttype]
enum DataKey {
    Prices(Asset),
}

fn new_asset_prices_map(env: &Env) -> Map<u64, i128> {
    Map::new(env)
}

/// Price feed whose admin is the trusted price signer. Posting a price
/// requires the signer's authorization, which stands in for a signed price
/// message.
#[contract]
pub struct PriceFeed;

#[contractimpl]
impl PriceFeed {
    pub fn __constructor(
        env: &Env,
        admin: Address,
        assets: Vec<Asset>,
        base: Asset,
        decimals: u32,
        resolution: u32,
    ) -> Result<(), Error> {
        env.storage().instance().set(&ADMIN_KEY, &admin);
        PriceFeedStorage::set_state(
            env,
            &PriceFeedStorage {
                assets: Vec::new(env),
                base,
                decimals,
                resolution,
                last_timestamp: 0,
            },
        );
        Self::add_assets_internal(env, assets)
    }

    fn require_admin(env: &Env) {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN_KEY)
            .expect("Admin must be set");
        admin.require_auth();
    }

    /// Upgrade the contract to new wasm
    pub fn upgrade(env: &Env, new_wasm_hash: BytesN<32>) {
        Self::require_admin(env);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    /// Timestamp of the most recent price posted for any asset
    pub fn last_timestamp(env: &Env) -> u64 {
        PriceFeedStorage::get_state(env).last_timestamp
    }

    fn get_asset_prices(env: &Env, asset: &Asset) -> Option<Map<u64, i128>> {
        env.storage()
            .persistent()
            .get(&DataKey::Prices(asset.clone()))
    }

    fn add_assets_internal(env: &Env, assets: Vec<Asset>) -> Result<(), Error> {
        let mut state = PriceFeedStorage::get_state(env);
        for asset in assets.iter() {
            if state.assets.contains(&asset) {
                return Err(Error::InvalidArgument);
            }
            state.assets.push_back(asset.clone());
            env.storage()
                .persistent()
                .set(&DataKey::Prices(asset), &new_asset_prices_map(env));
        }
        PriceFeedStorage::set_state(env, &state);
        AssetsAdded { assets }.publish(env);
        Ok(())
    }

    fn set_asset_price_internal(
        env: &Env,
        asset: Asset,
        price: i128,
        timestamp: u64,
    ) -> Result<(), Error> {
        if price <= 0 {
            log!(env, "rejected non-positive price", price);
            return Err(Error::NegativePrice);
        }
        let mut history = Self::get_asset_prices(env, &asset).ok_or(Error::AssetNotSupported)?;
        history.set(timestamp, price);
        env.storage()
            .persistent()
            .set(&DataKey::Prices(asset.clone()), &history);

        let mut state = PriceFeedStorage::get_state(env);
        if timestamp > state.last_timestamp {
            state.last_timestamp = timestamp;
            PriceFeedStorage::set_state(env, &state);
        }

        PricePosted {
            asset,
            price,
            timestamp,
        }
        .publish(env);
        Ok(())
    }
}

#[contractimpl]
impl IsSep40Admin for PriceFeed {
    fn add_assets(env: &Env, assets: Vec<Asset>) -> Result<(), Error> {
        Self::require_admin(env);
        Self::add_assets_internal(env, assets)
    }

    fn set_asset_price(env: &Env, asset: Asset, price: i128, timestamp: u64) -> Result<(), Error> {
        Self::require_admin(env);
        Self::set_asset_price_internal(env, asset, price, timestamp)
    }

    fn set_asset_prices(
        env: &Env,
        updates: Vec<(Asset, i128)>,
        timestamp: u64,
    ) -> Result<(), Error> {
        Self::require_admin(env);
        for (asset, price) in updates.iter() {
            Self::set_asset_price_internal(env, asset, price, timestamp)?;
        }
        Ok(())
    }
}

#[contractimpl]
impl IsSep40 for PriceFeed {
    fn assets(env: &Env) -> Vec<Asset> {
        PriceFeedStorage::get_state(env).assets
    }

    fn base(env: &Env) -> Asset {
        PriceFeedStorage::get_state(env).base
    }

    fn decimals(env: &Env) -> u32 {
        PriceFeedStorage::get_state(env).decimals
    }

    fn lastprice(env: &Env, asset: Asset) -> Option<PriceData> {
        let history = Self::get_asset_prices(env, &asset)?;
        let timestamp = history.keys().last()?;
        let price = history.get(timestamp)?;
        Some(PriceData { price, timestamp })
    }

    fn price(env: &Env, asset: Asset, timestamp: u64) -> Option<PriceData> {
        let history = Self::get_asset_prices(env, &asset)?;
        let price = history.get(timestamp)?;
        Some(PriceData { price, timestamp })
    }

    fn prices(env: &Env, asset: Asset, records: u32) -> Option<Vec<PriceData>> {
        let history = Self::get_asset_prices(env, &asset)?;
        let mut prices = Vec::new(env);
        history
            .keys()
            .iter()
            .rev()
            .take(records as usize)
            .for_each(|timestamp| {
                prices.push_back(PriceData {
                    price: history.get_unchecked(timestamp),
                    timestamp,
                })
            });
        Some(prices)
    }

    fn resolution(env: &Env) -> u32 {
        PriceFeedStorage::get_state(env).resolution
    }
}
