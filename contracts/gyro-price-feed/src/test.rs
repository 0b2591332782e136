#![cfg(test)]
extern crate std;

use crate::price_feed::{PriceFeed, PriceFeedClient};
use crate::{Asset, Error};

use soroban_sdk::{Address, Env, Symbol, Vec, testutils::Address as _, vec};

fn create_price_feed_contract<'a>(e: &Env) -> PriceFeedClient<'a> {
    let asset_eth: Asset = Asset::Other(Symbol::new(e, "ETH"));
    let asset_usd: Asset = Asset::Other(Symbol::new(e, "USD"));
    let asset_vec = Vec::from_array(e, [asset_eth.clone()]);
    let admin = Address::generate(e);
    let contract_id = e.register(PriceFeed, (admin, asset_vec, asset_usd, 6u32, 300u32));

    PriceFeedClient::new(e, &contract_id)
}

#[test]
fn test_price_feed_initialization() {
    let e = Env::default();
    e.mock_all_auths();

    let feed = create_price_feed_contract(&e);

    assert_eq!(feed.assets().len(), 1);
    assert_eq!(feed.base(), Asset::Other(Symbol::new(&e, "USD")));
    assert_eq!(feed.decimals(), 6);
    assert_eq!(feed.resolution(), 300);
    assert_eq!(feed.last_timestamp(), 0);
}

#[test]
fn test_post_and_read_prices() {
    let e = Env::default();
    e.mock_all_auths();

    let feed = create_price_feed_contract(&e);
    let eth = Asset::Other(Symbol::new(&e, "ETH"));

    assert!(feed.lastprice(&eth).is_none());

    feed.set_asset_price(&eth, &2_700_000_000, &1_000);
    feed.set_asset_price(&eth, &2_710_000_000, &1_300);

    let last = feed.lastprice(&eth).unwrap();
    assert_eq!(last.price, 2_710_000_000);
    assert_eq!(last.timestamp, 1_300);

    let at = feed.price(&eth, &1_000).unwrap();
    assert_eq!(at.price, 2_700_000_000);
    assert!(feed.price(&eth, &1_100).is_none());

    let history = feed.prices(&eth, &5).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.get(0).unwrap().timestamp, 1_300);
    assert_eq!(history.get(1).unwrap().timestamp, 1_000);
    assert_eq!(feed.last_timestamp(), 1_300);
}

#[test]
fn test_batch_price_post() {
    let e = Env::default();
    e.mock_all_auths();

    let feed = create_price_feed_contract(&e);
    let eth = Asset::Other(Symbol::new(&e, "ETH"));
    let btc_token = Asset::Stellar(Address::generate(&e));
    feed.add_assets(&vec![&e, btc_token.clone()]);

    feed.set_asset_prices(
        &vec![&e, (eth.clone(), 2_700_000_000i128), (btc_token.clone(), 37_324_000_000i128)],
        &2_000,
    );

    assert_eq!(feed.lastprice(&eth).unwrap().price, 2_700_000_000);
    assert_eq!(feed.lastprice(&btc_token).unwrap().price, 37_324_000_000);
    assert_eq!(feed.assets().len(), 2);
}

#[test]
fn test_rejected_posts() {
    let e = Env::default();
    e.mock_all_auths();

    let feed = create_price_feed_contract(&e);
    let eth = Asset::Other(Symbol::new(&e, "ETH"));
    let unknown = Asset::Other(Symbol::new(&e, "CRV"));

    let result = feed.try_set_asset_price(&eth, &0, &1_000);
    assert_eq!(result.unwrap_err().unwrap(), Error::NegativePrice);

    let result = feed.try_set_asset_price(&eth, &-5, &1_000);
    assert_eq!(result.unwrap_err().unwrap(), Error::NegativePrice);

    let result = feed.try_set_asset_price(&unknown, &1_000_000, &1_000);
    assert_eq!(result.unwrap_err().unwrap(), Error::AssetNotSupported);

    let result = feed.try_add_assets(&vec![&e, eth.clone()]);
    assert_eq!(result.unwrap_err().unwrap(), Error::InvalidArgument);
}

#[test]
#[should_panic]
fn test_posting_requires_signer_auth() {
    let e = Env::default();
    let feed = create_price_feed_contract(&e);
    let eth = Asset::Other(Symbol::new(&e, "ETH"));

    feed.set_asset_price(&eth, &2_700_000_000, &1_000);
}
