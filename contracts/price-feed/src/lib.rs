#![no_std]

use soroban_sdk::{self, Address, Symbol, contracttype};

mod error;
pub mod price_feed;
mod sep40;

pub use error::Error;
pub use price_feed::{PriceFeed, PriceFeedClient};
pub use sep40::{IsSep40, IsSep40Admin};

/// Quoted asset definition (SEP-40 compatible)
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum Asset {
    /// Can be a Stellar Classic or Soroban asset
    Stellar(Address),
    /// For any external tokens/assets/symbols
    Other(Symbol),
}

/// Price record definition (SEP-40 compatible)
#[contracttype]
#[derive(Debug, Clone, PartialEq)]
pub struct PriceData {
    pub price: i128,    // asset price at given point in time
    pub timestamp: u64, // recording timestamp
}

mod test;
