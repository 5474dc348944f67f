use soroban_sdk::{
    Address, Env, Map, Symbol, Vec, contract, contractevent, contractimpl, contracttype,
    symbol_short,
};

use crate::error::Error;
use crate::sep40::{IsSep40, IsSep40Admin};
use crate::{Asset, PriceData};

const CONTROLLER_KEY: Symbol = symbol_short!("CONTROL");
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
            .expect("feed not initialized")
    }

    pub fn set_state(env: &Env, storage: &PriceFeedStorage) {
        env.storage().instance().set(&STORAGE, storage);
    }
}

#[contracttype]
enum DataKey {
    Prices(Asset),
}

#[contractevent(topics = ["price"])]
pub struct PriceUpdated {
    #[topic]
    pub asset: Asset,
    pub price: i128,
    pub timestamp: u64,
}

#[contract]
pub struct PriceFeed;

#[contractimpl]
impl PriceFeed {
    pub fn __constructor(
        env: &Env,
        controller: Address,
        assets: Vec<Asset>,
        base: Asset,
        decimals: u32,
        resolution: u32,
    ) {
        env.storage().instance().set(&CONTROLLER_KEY, &controller);
        PriceFeedStorage::set_state(
            env,
            &PriceFeedStorage {
                assets: assets.clone(),
                base,
                decimals,
                resolution,
                last_timestamp: 0,
            },
        );
        for asset in assets.into_iter() {
            Self::set_history(env, &asset, &Map::new(env));
        }
    }

    /// Address allowed to publish prices
    pub fn controller(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&CONTROLLER_KEY)
            .expect("controller must be set")
    }

    /// Timestamp of the most recent update across all assets
    pub fn last_timestamp(env: &Env) -> u64 {
        PriceFeedStorage::get_state(env).last_timestamp
    }

    fn require_controller(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        if *caller != Self::controller(env) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn history(env: &Env, asset: &Asset) -> Option<Map<u64, i128>> {
        env.storage()
            .persistent()
            .get(&DataKey::Prices(asset.clone()))
    }

    fn set_history(env: &Env, asset: &Asset, history: &Map<u64, i128>) {
        let key = DataKey::Prices(asset.clone());
        env.storage().persistent().set(&key, history);
        let ttl = env.storage().max_ttl();
        env.storage().persistent().extend_ttl(&key, ttl, ttl);
    }

    fn record_price(env: &Env, asset: Asset, price: i128, timestamp: u64) -> Result<(), Error> {
        if price <= 0 {
            return Err(Error::InvalidPrice);
        }
        let mut history = Self::history(env, &asset).ok_or(Error::AssetNotFound)?;
        history.set(timestamp, price);
        Self::set_history(env, &asset, &history);

        let mut state = PriceFeedStorage::get_state(env);
        if timestamp > state.last_timestamp {
            state.last_timestamp = timestamp;
            PriceFeedStorage::set_state(env, &state);
        }

        PriceUpdated {
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
    fn add_assets(env: &Env, caller: Address, assets: Vec<Asset>) -> Result<(), Error> {
        Self::require_controller(env, &caller)?;
        let mut state = PriceFeedStorage::get_state(env);

        for asset in assets.iter() {
            if state.assets.contains(&asset) {
                return Err(Error::AssetAlreadyExists);
            }
            state.assets.push_back(asset.clone());
            Self::set_history(env, &asset, &Map::new(env));
        }

        PriceFeedStorage::set_state(env, &state);
        Ok(())
    }

    fn set_asset_price(
        env: &Env,
        caller: Address,
        asset: Asset,
        price: i128,
        timestamp: u64,
    ) -> Result<(), Error> {
        Self::require_controller(env, &caller)?;
        Self::record_price(env, asset, price, timestamp)
    }

    fn set_price(env: &Env, caller: Address, asset: Asset, price: i128) -> Result<(), Error> {
        Self::require_controller(env, &caller)?;
        Self::record_price(env, asset, price, env.ledger().timestamp())
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
        let history = Self::history(env, &asset)?;
        let timestamp = history.keys().last()?;
        let price = history.get(timestamp)?;
        Some(PriceData { price, timestamp })
    }

    fn price(env: &Env, asset: Asset, timestamp: u64) -> Option<PriceData> {
        let price = Self::history(env, &asset)?.get(timestamp)?;
        Some(PriceData { price, timestamp })
    }

    fn prices(env: &Env, asset: Asset, records: u32) -> Option<Vec<PriceData>> {
        let history = Self::history(env, &asset)?;
        let mut prices = Vec::new(env);
        for timestamp in history.keys().iter().rev().take(records as usize) {
            prices.push_back(PriceData {
                price: history.get_unchecked(timestamp),
                timestamp,
            });
        }
        Some(prices)
    }

    fn resolution(env: &Env) -> u32 {
        PriceFeedStorage::get_state(env).resolution
    }
}
