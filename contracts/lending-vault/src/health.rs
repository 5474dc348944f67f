use soroban_sdk::{Address, Env, Symbol, log};

use crate::{
    Error,
    collateral::CollateralLedger,
    interest::BASIS_POINTS,
    loan::LoanBook,
    oracle::{OracleAdapter, Quote},
    storage::{CollateralAsset, PriceSource, VaultStorage},
};

/// Health factor at which a position sits exactly at the liquidation threshold
pub const HEALTH_FACTOR_ONE: u32 = 100;

/// Decimals of prices reported by `token_price`
pub const WAD_DECIMALS: u32 = 18;

/// `collateral_value * 10000 / (debt_value * threshold_pct)`, saturating at
/// `u32::MAX`. A position without debt is maximally healthy.
pub fn health_factor(
    collateral_value: i128,
    debt_value: i128,
    liquidation_threshold_pct: u32,
) -> Result<u32, Error> {
    if debt_value <= 0 {
        return Ok(u32::MAX);
    }
    let numerator = collateral_value
        .checked_mul(BASIS_POINTS as i128)
        .ok_or(Error::ArithmeticError)?;
    let denominator = debt_value
        .checked_mul(liquidation_threshold_pct as i128)
        .ok_or(Error::ArithmeticError)?;
    let factor = numerator / denominator;
    Ok(factor.clamp(0, u32::MAX as i128) as u32)
}

/// Value still borrowable against `collateral_value`, floored at zero
pub fn borrow_capacity(
    collateral_value: i128,
    debt_value: i128,
    collateral_factor_pct: u32,
) -> Result<i128, Error> {
    let limit = collateral_value
        .checked_mul(collateral_factor_pct as i128)
        .ok_or(Error::ArithmeticError)?
        / 100;
    Ok((limit - debt_value).max(0))
}

pub struct HealthEngine;

impl HealthEngine {
    /// Price used for valuation. A feed price older than the staleness
    /// window is replaced by 1:1 instead of failing.
    pub fn valuation_quote(
        env: &Env,
        vault: &VaultStorage,
        source: &PriceSource,
        symbol: &Symbol,
    ) -> Result<Quote, Error> {
        let source = if vault.config.capabilities.oracle_pricing {
            source
        } else {
            &PriceSource::Fixed
        };
        let quote = OracleAdapter::price(env, source, symbol)?;
        if OracleAdapter::is_stale(env, &quote, vault.config.staleness_window) {
            log!(env, "stale price, valuing 1:1", symbol.clone(), quote.updated_at);
            return Ok(Quote {
                price: quote.one()?,
                ..quote
            });
        }
        Ok(quote)
    }

    pub fn asset_quote(
        env: &Env,
        vault: &VaultStorage,
        asset: &CollateralAsset,
    ) -> Result<Quote, Error> {
        Self::valuation_quote(env, vault, &asset.source, &asset.symbol)
    }

    pub fn base_quote(env: &Env, vault: &VaultStorage) -> Result<Quote, Error> {
        Self::valuation_quote(env, vault, &vault.base_source, &vault.base_symbol)
    }

    /// Valuation price of a supported asset, with 18 decimals
    pub fn token_price(env: &Env, asset: &Address) -> Result<i128, Error> {
        let vault = VaultStorage::get_state(env);
        let asset = vault.asset(asset).ok_or(Error::UnsupportedAsset)?;
        Self::asset_quote(env, &vault, &asset)?.scaled(WAD_DECIMALS)
    }

    fn collateral_value_with(
        env: &Env,
        vault: &VaultStorage,
        account: &Address,
        removed: Option<(&Address, i128)>,
    ) -> Result<i128, Error> {
        let mut total: i128 = 0;
        for asset in vault.assets.iter() {
            let mut amount = CollateralLedger::balance(env, account, &asset.token);
            if let Some((token, removed)) = removed {
                if *token == asset.token {
                    amount -= removed;
                }
            }
            if amount <= 0 {
                continue;
            }
            let value = Self::asset_quote(env, vault, &asset)?.value_of(amount)?;
            total = total.checked_add(value).ok_or(Error::ArithmeticError)?;
        }
        Ok(total)
    }

    /// Sum of every position valued at its current price, in the quote currency
    pub fn collateral_value(
        env: &Env,
        vault: &VaultStorage,
        account: &Address,
    ) -> Result<i128, Error> {
        Self::collateral_value_with(env, vault, account, None)
    }

    /// Accrued debt valued in the quote currency
    pub fn debt_value(env: &Env, vault: &VaultStorage, account: &Address) -> Result<i128, Error> {
        let debt = LoanBook::accrued_debt(env, account)?;
        if debt == 0 {
            return Ok(0);
        }
        Self::base_quote(env, vault)?.value_of(debt)
    }

    pub fn health_factor(env: &Env, account: &Address) -> Result<u32, Error> {
        let vault = VaultStorage::get_state(env);
        let debt_value = Self::debt_value(env, &vault, account)?;
        if debt_value == 0 {
            return Ok(u32::MAX);
        }
        health_factor(
            Self::collateral_value(env, &vault, account)?,
            debt_value,
            vault.config.risk.liquidation_threshold_pct,
        )
    }

    /// Health factor the account would have after withdrawing `amount` of `asset`
    pub fn health_factor_after_withdrawal(
        env: &Env,
        account: &Address,
        asset: &Address,
        amount: i128,
    ) -> Result<u32, Error> {
        let vault = VaultStorage::get_state(env);
        let debt_value = Self::debt_value(env, &vault, account)?;
        if debt_value == 0 {
            return Ok(u32::MAX);
        }
        health_factor(
            Self::collateral_value_with(env, &vault, account, Some((asset, amount)))?,
            debt_value,
            vault.config.risk.liquidation_threshold_pct,
        )
    }

    /// Additional base currency the account may borrow
    pub fn max_borrow(env: &Env, account: &Address) -> Result<i128, Error> {
        let vault = VaultStorage::get_state(env);
        let capacity = borrow_capacity(
            Self::collateral_value(env, &vault, account)?,
            Self::debt_value(env, &vault, account)?,
            vault.config.risk.collateral_factor_pct,
        )?;
        if capacity == 0 {
            return Ok(0);
        }
        Self::base_quote(env, &vault)?.amount_for(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAD: i128 = 1_000_000_000_000_000_000;

    #[test]
    fn health_factor_at_threshold_is_one_hundred() {
        assert_eq!(health_factor(125 * WAD, 100 * WAD, 125).unwrap(), 100);
    }

    #[test]
    fn health_factor_after_price_drop() {
        // 10 units at $100 against 1250 of debt with a 125% threshold
        assert_eq!(health_factor(1_000 * WAD, 1_250 * WAD, 125).unwrap(), 64);
    }

    #[test]
    fn health_factor_without_debt_is_maximal() {
        assert_eq!(health_factor(1_000 * WAD, 0, 125).unwrap(), u32::MAX);
        assert_eq!(health_factor(0, 0, 125).unwrap(), u32::MAX);
    }

    #[test]
    fn health_factor_moves_with_collateral_and_debt() {
        let base = health_factor(1_000 * WAD, 500 * WAD, 125).unwrap();
        assert!(health_factor(1_100 * WAD, 500 * WAD, 125).unwrap() > base);
        assert!(health_factor(1_000 * WAD, 600 * WAD, 125).unwrap() < base);
    }

    #[test]
    fn health_factor_overflow_is_an_error() {
        assert_eq!(
            health_factor(i128::MAX, WAD, 125),
            Err(Error::ArithmeticError)
        );
    }

    #[test]
    fn borrow_capacity_floors_at_zero() {
        assert_eq!(borrow_capacity(2_500 * WAD, 0, 50).unwrap(), 1_250 * WAD);
        assert_eq!(
            borrow_capacity(2_500 * WAD, 1_000 * WAD, 50).unwrap(),
            250 * WAD
        );
        assert_eq!(borrow_capacity(1_000 * WAD, 1_250 * WAD, 50).unwrap(), 0);
    }
}
