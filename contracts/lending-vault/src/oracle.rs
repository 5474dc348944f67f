use soroban_sdk::{Address, Env, Symbol, contractclient, contracttype};

use crate::{Error, storage::PriceSource};

/// Decimals every price is quoted with when no feed is involved
pub const PRICE_DECIMALS: u32 = 8;

/// Quoted asset definition (SEP-40 compatible)
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum FeedAsset {
    Stellar(Address),
    Other(Symbol),
}

/// Price record definition (SEP-40 compatible)
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct PriceData {
    pub price: i128,    // asset price at given point in time
    pub timestamp: u64, // recording timestamp
}

/// The subset of SEP-40 the vault consumes
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeedInterface {
    fn lastprice(env: Env, asset: FeedAsset) -> Option<PriceData>;
    fn decimals(env: Env) -> u32;
}

/// A raw price read, before any staleness handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quote {
    pub price: i128,
    pub decimals: u32,
    pub updated_at: u64,
}

impl Quote {
    /// The 1:1 price, always fresh
    pub fn unit(updated_at: u64) -> Quote {
        Quote {
            price: 10i128.pow(PRICE_DECIMALS),
            decimals: PRICE_DECIMALS,
            updated_at,
        }
    }

    pub fn one(&self) -> Result<i128, Error> {
        10i128
            .checked_pow(self.decimals)
            .ok_or(Error::ArithmeticError)
    }

    /// Value of `amount` in the quote currency, same scale as `amount`
    pub fn value_of(&self, amount: i128) -> Result<i128, Error> {
        let one = self.one()?;
        amount
            .checked_mul(self.price)
            .map(|v| v / one)
            .ok_or(Error::ArithmeticError)
    }

    /// Amount whose value in the quote currency is `value`
    pub fn amount_for(&self, value: i128) -> Result<i128, Error> {
        if self.price <= 0 {
            return Err(Error::OraclePriceFetchFailed);
        }
        let one = self.one()?;
        value
            .checked_mul(one)
            .map(|v| v / self.price)
            .ok_or(Error::ArithmeticError)
    }

    /// Price rescaled to `decimals` places
    pub fn scaled(&self, decimals: u32) -> Result<i128, Error> {
        if decimals >= self.decimals {
            let factor = 10i128
                .checked_pow(decimals - self.decimals)
                .ok_or(Error::ArithmeticError)?;
            self.price.checked_mul(factor).ok_or(Error::ArithmeticError)
        } else {
            let factor = 10i128
                .checked_pow(self.decimals - decimals)
                .ok_or(Error::ArithmeticError)?;
            Ok(self.price / factor)
        }
    }
}

pub struct OracleAdapter;

impl OracleAdapter {
    /// Read the last price and update time for `symbol` from `source`.
    ///
    /// The null source answers 1:1 stamped with the current ledger time.
    /// No staleness handling happens here: callers decide what an old
    /// `updated_at` means for them.
    pub fn price(env: &Env, source: &PriceSource, symbol: &Symbol) -> Result<Quote, Error> {
        let feed = match source {
            PriceSource::Fixed => return Ok(Quote::unit(env.ledger().timestamp())),
            PriceSource::Feed(feed) => feed,
        };
        let client = PriceFeedClient::new(env, feed);

        let data = match client.try_lastprice(&FeedAsset::Other(symbol.clone())) {
            Ok(Ok(Some(data))) => data,
            _ => return Err(Error::OraclePriceFetchFailed),
        };
        let decimals = match client.try_decimals() {
            Ok(Ok(decimals)) => decimals,
            _ => return Err(Error::OracleDecimalsFetchFailed),
        };
        if data.price <= 0 {
            return Err(Error::OraclePriceFetchFailed);
        }

        Ok(Quote {
            price: data.price,
            decimals,
            updated_at: data.timestamp,
        })
    }

    /// Whether a quote is older than `window` seconds at the current ledger time
    pub fn is_stale(env: &Env, quote: &Quote, window: u64) -> bool {
        env.ledger().timestamp().saturating_sub(quote.updated_at) > window
    }
}
