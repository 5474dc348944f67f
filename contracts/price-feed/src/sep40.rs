use crate::{Asset, Error, PriceData};
use soroban_sdk::{Address, Env, Vec};

/// Oracle Consumer Interface from SEP-0040
pub trait IsSep40 {
    /// Return all assets quoted by the price feed
    fn assets(env: &Env) -> Vec<Asset>;

    /// Return the base asset the price is reported in
    fn base(env: &Env) -> Asset;

    /// Return the number of decimals for all assets quoted by the oracle
    fn decimals(env: &Env) -> u32;

    /// Get the most recent price for an asset
    fn lastprice(env: &Env, asset: Asset) -> Option<PriceData>;

    /// Get price in base asset at specific timestamp
    fn price(env: &Env, asset: Asset, timestamp: u64) -> Option<PriceData>;

    /// Get last N price records
    fn prices(env: &Env, asset: Asset, records: u32) -> Option<Vec<PriceData>>;

    /// Return default tick period timeframe (in seconds)
    fn resolution(env: &Env) -> u32;
}

/// Controller interface. Every call is checked against the stored controller,
/// never against the owner of a contract that consumes this feed.
pub trait IsSep40Admin {
    /// Adds given assets to the quoted assets list.
    fn add_assets(env: &Env, caller: Address, assets: Vec<Asset>) -> Result<(), Error>;

    /// Record a price snapshot at an explicit timestamp.
    fn set_asset_price(
        env: &Env,
        caller: Address,
        asset: Asset,
        price: i128,
        timestamp: u64,
    ) -> Result<(), Error>;

    /// Record a price at the current ledger time.
    fn set_price(env: &Env, caller: Address, asset: Asset, price: i128) -> Result<(), Error>;
}
