#![cfg(test)]
extern crate std;

use crate::price_feed::{PriceFeed, PriceFeedClient};
use crate::{Asset, Error};

use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, Symbol, Vec};

fn create_price_feed<'a>(e: &Env, controller: &Address) -> PriceFeedClient<'a> {
    let tsla = Asset::Other(Symbol::new(e, "TSLA"));
    let amzn = Asset::Other(Symbol::new(e, "AMZN"));
    let usd = Asset::Other(Symbol::new(e, "USD"));
    let contract_id = e.register(
        PriceFeed,
        (
            controller.clone(),
            Vec::from_array(e, [tsla, amzn]),
            usd,
            8u32,
            300u32,
        ),
    );
    PriceFeedClient::new(e, &contract_id)
}

#[test]
fn test_feed_initialization() {
    let e = Env::default();
    e.mock_all_auths();
    let controller = Address::generate(&e);
    let feed = create_price_feed(&e, &controller);

    assert_eq!(feed.assets().len(), 2);
    assert_eq!(feed.base(), Asset::Other(Symbol::new(&e, "USD")));
    assert_eq!(feed.decimals(), 8);
    assert_eq!(feed.resolution(), 300);
    assert_eq!(feed.controller(), controller);
    assert_eq!(feed.last_timestamp(), 0);

    // No price has been published yet
    assert!(feed.lastprice(&Asset::Other(Symbol::new(&e, "TSLA"))).is_none());
}

#[test]
fn test_set_price_uses_ledger_time() {
    let e = Env::default();
    e.mock_all_auths();
    e.ledger().set_timestamp(10_000);
    let controller = Address::generate(&e);
    let feed = create_price_feed(&e, &controller);
    let tsla = Asset::Other(Symbol::new(&e, "TSLA"));

    feed.set_price(&controller, &tsla, &25_000_000_000);

    let last = feed.lastprice(&tsla).unwrap();
    assert_eq!(last.price, 25_000_000_000);
    assert_eq!(last.timestamp, 10_000);
    assert_eq!(feed.last_timestamp(), 10_000);
}

#[test]
fn test_set_price_restricted_to_controller() {
    let e = Env::default();
    e.mock_all_auths();
    let controller = Address::generate(&e);
    let outsider = Address::generate(&e);
    let feed = create_price_feed(&e, &controller);
    let tsla = Asset::Other(Symbol::new(&e, "TSLA"));

    let result = feed.try_set_price(&outsider, &tsla, &1);
    assert_eq!(result.unwrap_err().unwrap(), Error::Unauthorized);

    let result = feed.try_set_asset_price(&outsider, &tsla, &1, &1);
    assert_eq!(result.unwrap_err().unwrap(), Error::Unauthorized);

    let extra = Vec::from_array(&e, [Asset::Other(Symbol::new(&e, "AMD"))]);
    let result = feed.try_add_assets(&outsider, &extra);
    assert_eq!(result.unwrap_err().unwrap(), Error::Unauthorized);
}

#[test]
fn test_rejects_unknown_asset_and_bad_price() {
    let e = Env::default();
    e.mock_all_auths();
    let controller = Address::generate(&e);
    let feed = create_price_feed(&e, &controller);

    let nflx = Asset::Other(Symbol::new(&e, "NFLX"));
    let result = feed.try_set_price(&controller, &nflx, &50_000_000_000);
    assert_eq!(result.unwrap_err().unwrap(), Error::AssetNotFound);

    let tsla = Asset::Other(Symbol::new(&e, "TSLA"));
    let result = feed.try_set_price(&controller, &tsla, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::InvalidPrice);
    let result = feed.try_set_price(&controller, &tsla, &-5);
    assert_eq!(result.unwrap_err().unwrap(), Error::InvalidPrice);
}

#[test]
fn test_add_assets() {
    let e = Env::default();
    e.mock_all_auths();
    let controller = Address::generate(&e);
    let feed = create_price_feed(&e, &controller);

    let amd = Asset::Other(Symbol::new(&e, "AMD"));
    feed.add_assets(&controller, &Vec::from_array(&e, [amd.clone()]));
    assert_eq!(feed.assets().len(), 3);

    feed.set_asset_price(&controller, &amd, &12_000_000_000, &500);
    assert_eq!(feed.lastprice(&amd).unwrap().price, 12_000_000_000);

    let result = feed.try_add_assets(&controller, &Vec::from_array(&e, [amd]));
    assert_eq!(result.unwrap_err().unwrap(), Error::AssetAlreadyExists);
}

#[test]
fn test_price_history() {
    let e = Env::default();
    e.mock_all_auths();
    let controller = Address::generate(&e);
    let feed = create_price_feed(&e, &controller);
    let tsla = Asset::Other(Symbol::new(&e, "TSLA"));

    feed.set_asset_price(&controller, &tsla, &100, &1_000);
    feed.set_asset_price(&controller, &tsla, &200, &2_000);
    feed.set_asset_price(&controller, &tsla, &300, &3_000);

    let last = feed.lastprice(&tsla).unwrap();
    assert_eq!(last.price, 300);
    assert_eq!(last.timestamp, 3_000);

    let at = feed.price(&tsla, &2_000).unwrap();
    assert_eq!(at.price, 200);
    assert!(feed.price(&tsla, &2_500).is_none());

    let recent = feed.prices(&tsla, &2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent.get(0).unwrap().price, 300);
    assert_eq!(recent.get(1).unwrap().price, 200);

    // An older snapshot does not move the feed-wide timestamp back
    feed.set_asset_price(&controller, &tsla, &50, &500);
    assert_eq!(feed.last_timestamp(), 3_000);
    assert_eq!(feed.lastprice(&tsla).unwrap().price, 300);
}
