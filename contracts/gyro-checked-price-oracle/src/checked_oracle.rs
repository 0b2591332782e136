use gyro_common::fixed_point::{self, ONE};
use gyro_common::interfaces::PriceOracle;
use gyro_common::{AssetPrice, Error, OracleConfig};
use soroban_sdk::{
    Address, BytesN, Env, Map, Symbol, Vec, contract, contractimpl, contracttype, log,
    symbol_short,
};

use crate::aggregation::{self, MedianRounding};
use crate::events::{
    OracleConfigUpdated, QuoteAssetAdded, QuoteAssetRemoved, RelativeOracleSet,
    SignedSourceAdded, SignedSourceRemoved, UsdFeedSet,
};
use crate::sources;

const ADMIN_KEY: Symbol = symbol_short!("ADMIN");
const STORAGE: Symbol = symbol_short!("STORAGE");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleStorage {
    /// SEP-40 feed quoting assets directly in USD
    pub usd_feed: Address,
    /// Source of relative (TWAP) prices between pairs of assets
    pub relative_oracle: Address,
    /// SEP-40 feeds whose prices are posted by trusted signers
    pub signed_sources: Vec<Address>,
    /// Stable assets trusted to sit at the $1 peg
    pub quote_assets: Vec<Address>,
    pub config: OracleConfig,
}

impl OracleStorage {
    pub fn get_state(env: &Env) -> OracleStorage {
        env.storage()
            .instance()
            .get(&STORAGE)
            .expect("oracle not initialized")
    }

    pub fn set_state(env: &Env, storage: &OracleStorage) {
        env.storage().instance().set(&STORAGE, storage);
    }
}

fn validate_config(config: &OracleConfig) -> Result<(), Error> {
    if config.max_relative_deviation <= 0 || config.max_relative_deviation > ONE {
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

/// Fails with `StalePrice` when `actual` is further than the tolerance from `expected`.
fn check_deviation(
    env: &Env,
    actual: i128,
    expected: i128,
    config: &OracleConfig,
) -> Result<(), Error> {
    let deviation = aggregation::relative_deviation(env, actual, expected)?;
    if deviation > config.max_relative_deviation {
        log!(env, "price deviation too large", actual, expected, deviation);
        return Err(Error::StalePrice);
    }
    Ok(())
}

/// Reference price of `asset` and its direct USD feed price, if any.
///
/// Signed assets are priced at the signed median, which must agree with the
/// USD feed when that also quotes them. Quote assets sit at the peg, or at
/// their feed price when it is close enough to the peg.
fn seed_price(
    env: &Env,
    state: &OracleStorage,
    asset: &Address,
) -> Result<(Option<i128>, Option<i128>), Error> {
    let config = &state.config;
    let usd_price = sources::usd_feed_price(env, &state.usd_feed, asset, config)?;

    let reference = match sources::signed_price(env, &state.signed_sources, asset, config)? {
        Some(signed) => {
            if let Some(price) = usd_price {
                check_deviation(env, price, signed, config)?;
            }
            Some(signed)
        }
        None if state.quote_assets.contains(asset) => match usd_price {
            Some(price) => {
                check_deviation(env, price, ONE, config)?;
                Some(price)
            }
            None => Some(ONE),
        },
        None => None,
    };
    Ok((usd_price, reference))
}

/// USD price of `asset` through its relative price to the verified `anchor`.
/// A direct feed price is the answer once it agrees with the relative price.
fn price_through(
    env: &Env,
    state: &OracleStorage,
    direct: &Map<Address, i128>,
    asset: &Address,
    anchor: &Address,
    anchor_price: i128,
) -> Result<Option<i128>, Error> {
    let Some(relative) = sources::relative_price(env, &state.relative_oracle, asset, anchor)?
    else {
        return Ok(None);
    };
    match direct.get(asset.clone()) {
        Some(price) => {
            let implied = fixed_point::div_down(env, price, anchor_price)?;
            check_deviation(env, relative, implied, &state.config)?;
            Ok(Some(price))
        }
        None => fixed_point::mul_down(env, relative, anchor_price).map(Some),
    }
}

/// Prices every asset in `universe` could be verified at.
struct Verification {
    prices: Map<Address, i128>,
    /// First failure on an asset outside the requested batch
    dropped: Option<Error>,
}

/// Assets dropped from the search after a failure
struct Exclusions {
    assets: Vec<Address>,
    first_error: Option<Error>,
}

impl Exclusions {
    /// Fails on a requested asset, otherwise drops `asset` from the search.
    fn exclude(
        &mut self,
        env: &Env,
        requested: &Vec<Address>,
        asset: Address,
        error: Error,
    ) -> Result<(), Error> {
        if requested.contains(&asset) {
            return Err(error);
        }
        log!(env, "dropping unrequested reference", asset.clone(), error as u32);
        self.assets.push_back(asset);
        self.first_error.get_or_insert(error);
        Ok(())
    }
}

/// Walks the relative-price graph outward from the reference points.
///
/// A failure on a requested asset fails the whole call. An asset that was
/// only pulled in as a possible reference is dropped from the search instead.
fn verify_prices(
    env: &Env,
    state: &OracleStorage,
    requested: &Vec<Address>,
    universe: &Vec<Address>,
) -> Result<Verification, Error> {
    let mut direct: Map<Address, i128> = Map::new(env);
    let mut verified: Map<Address, i128> = Map::new(env);
    let mut excluded = Exclusions {
        assets: Vec::new(env),
        first_error: None,
    };
    let mut frontier: Vec<Address> = Vec::new(env);

    for asset in universe.iter() {
        match seed_price(env, state, &asset) {
            Ok((usd_price, reference)) => {
                if let Some(price) = usd_price {
                    direct.set(asset.clone(), price);
                }
                if let Some(price) = reference {
                    verified.set(asset.clone(), price);
                    frontier.push_back(asset);
                }
            }
            Err(error) => excluded.exclude(env, requested, asset, error)?,
        }
    }

    let mut next = 0;
    while next < frontier.len() {
        let anchor = frontier.get_unchecked(next);
        let anchor_price = verified.get_unchecked(anchor.clone());
        next += 1;

        for asset in universe.iter() {
            if verified.contains_key(asset.clone()) || excluded.assets.contains(&asset) {
                continue;
            }
            match price_through(env, state, &direct, &asset, &anchor, anchor_price) {
                Ok(Some(price)) => {
                    verified.set(asset.clone(), price);
                    frontier.push_back(asset);
                }
                Ok(None) => {}
                Err(error) => excluded.exclude(env, requested, asset, error)?,
            }
        }
    }

    Ok(Verification {
        prices: verified,
        dropped: excluded.first_error,
    })
}

/// USD oracle that only answers with prices it could cross-check: signer
/// attested prices, stablecoins at the peg, and direct feed prices confirmed
/// by on-chain relative prices.
#[contract]
pub struct CheckedPriceOracle;

#[contractimpl]
impl CheckedPriceOracle {
    pub fn __constructor(
        env: &Env,
        admin: Address,
        usd_feed: Address,
        relative_oracle: Address,
        config: OracleConfig,
    ) -> Result<(), Error> {
        validate_config(&config)?;
        env.storage().instance().set(&ADMIN_KEY, &admin);
        OracleStorage::set_state(
            env,
            &OracleStorage {
                usd_feed,
                relative_oracle,
                signed_sources: Vec::new(env),
                quote_assets: Vec::new(env),
                config,
            },
        );
        Ok(())
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

    /// Checked USD price of a single asset
    pub fn get_price_usd(env: &Env, asset: Address) -> Result<i128, Error> {
        let prices = Self::prices_usd(env, Vec::from_array(env, [asset]))?;
        Ok(prices.get_unchecked(0))
    }

    /// Checked USD prices stamped with the ledger time they were verified at
    pub fn get_asset_prices(env: &Env, assets: Vec<Address>) -> Result<Vec<AssetPrice>, Error> {
        let prices = Self::prices_usd(env, assets.clone())?;
        let timestamp = env.ledger().timestamp();
        let mut records = Vec::new(env);
        for (asset, price) in assets.iter().zip(prices.iter()) {
            records.push_back(AssetPrice {
                asset,
                price,
                timestamp,
            });
        }
        Ok(records)
    }

    /// Median of `values`; the two middle values are averaged for even lengths.
    pub fn median(values: Vec<i128>, rounding: MedianRounding) -> Result<i128, Error> {
        aggregation::median(&values, rounding)
    }

    pub fn compute_min_or_second_min(values: Vec<i128>) -> Result<i128, Error> {
        aggregation::compute_min_or_second_min(&values)
    }

    /// Trust prices posted to `source` by its signer. Admin-only.
    pub fn add_signed_price_source(env: &Env, source: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut state = OracleStorage::get_state(env);
        if state.signed_sources.contains(&source) {
            return Err(Error::InvalidArgument);
        }
        state.signed_sources.push_back(source.clone());
        OracleStorage::set_state(env, &state);
        SignedSourceAdded { source }.publish(env);
        Ok(())
    }

    pub fn remove_signed_price_source(env: &Env, source: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut state = OracleStorage::get_state(env);
        let index = state
            .signed_sources
            .first_index_of(&source)
            .ok_or(Error::KeyNotFound)?;
        state.signed_sources.remove(index);
        OracleStorage::set_state(env, &state);
        SignedSourceRemoved { source }.publish(env);
        Ok(())
    }

    /// Treat `asset` as a $1 reference point. Admin-only.
    pub fn add_quote_asset(env: &Env, asset: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut state = OracleStorage::get_state(env);
        if state.quote_assets.contains(&asset) {
            return Err(Error::InvalidArgument);
        }
        state.quote_assets.push_back(asset.clone());
        OracleStorage::set_state(env, &state);
        QuoteAssetAdded { asset }.publish(env);
        Ok(())
    }

    pub fn remove_quote_asset(env: &Env, asset: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut state = OracleStorage::get_state(env);
        let index = state
            .quote_assets
            .first_index_of(&asset)
            .ok_or(Error::KeyNotFound)?;
        state.quote_assets.remove(index);
        OracleStorage::set_state(env, &state);
        QuoteAssetRemoved { asset }.publish(env);
        Ok(())
    }

    pub fn set_usd_feed(env: &Env, feed: Address) {
        Self::require_admin(env);
        let mut state = OracleStorage::get_state(env);
        state.usd_feed = feed.clone();
        OracleStorage::set_state(env, &state);
        UsdFeedSet { feed }.publish(env);
    }

    pub fn set_relative_oracle(env: &Env, oracle: Address) {
        Self::require_admin(env);
        let mut state = OracleStorage::get_state(env);
        state.relative_oracle = oracle.clone();
        OracleStorage::set_state(env, &state);
        RelativeOracleSet { oracle }.publish(env);
    }

    /// Replace the deviation tolerance and maximum price age. Admin-only.
    pub fn set_config(env: &Env, config: OracleConfig) -> Result<(), Error> {
        Self::require_admin(env);
        validate_config(&config)?;
        let mut state = OracleStorage::get_state(env);
        state.config = config.clone();
        OracleStorage::set_state(env, &state);
        OracleConfigUpdated { config }.publish(env);
        Ok(())
    }

    pub fn get_signed_price_sources(env: &Env) -> Vec<Address> {
        OracleStorage::get_state(env).signed_sources
    }

    pub fn get_quote_assets(env: &Env) -> Vec<Address> {
        OracleStorage::get_state(env).quote_assets
    }

    pub fn get_usd_feed(env: &Env) -> Address {
        OracleStorage::get_state(env).usd_feed
    }

    pub fn get_relative_oracle(env: &Env) -> Address {
        OracleStorage::get_state(env).relative_oracle
    }

    pub fn get_config(env: &Env) -> OracleConfig {
        OracleStorage::get_state(env).config
    }

    fn prices_usd(env: &Env, assets: Vec<Address>) -> Result<Vec<i128>, Error> {
        if assets.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let state = OracleStorage::get_state(env);

        let mut universe: Vec<Address> = Vec::new(env);
        let signed_assets = sources::signed_assets(env, &state.signed_sources);
        for candidates in [&assets, &signed_assets, &state.quote_assets] {
            for asset in candidates.iter() {
                if !universe.contains(&asset) {
                    universe.push_back(asset);
                }
            }
        }

        let verification = verify_prices(env, &state, &assets, &universe)?;
        let mut prices = Vec::new(env);
        for asset in assets.iter() {
            match verification.prices.get(asset.clone()) {
                Some(price) => prices.push_back(price),
                None => {
                    log!(env, "no verified price path", asset);
                    // a dropped reference may have been the only way there
                    return Err(verification.dropped.unwrap_or(Error::AssetNotSupported));
                }
            }
        }
        Ok(prices)
    }
}

#[contractimpl]
impl PriceOracle for CheckedPriceOracle {
    /// Checked USD prices in 18 decimals, in the order of `assets`
    fn get_prices_usd(env: Env, assets: Vec<Address>) -> Result<Vec<i128>, Error> {
        Self::prices_usd(&env, assets)
    }
}
