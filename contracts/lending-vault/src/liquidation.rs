use soroban_sdk::{Address, Env};

use crate::{
    Error,
    collateral::CollateralLedger,
    events,
    health::{HEALTH_FACTOR_ONE, HealthEngine},
    loan::LoanBook,
    pool::LendingPool,
    storage::{LiquidationOutcome, VaultStorage},
};

pub struct LiquidationEngine;

impl LiquidationEngine {
    /// Seize all collateral of an account whose health factor is below 100
    /// and close its loan against the seized value. `liquidator` is paid the
    /// bonus in the seized collateral itself, so idle pool liquidity is never
    /// needed.
    ///
    /// A shortfall does not abort: it is recorded as pool bad debt, published,
    /// and returned in the outcome.
    pub fn liquidate(
        env: &Env,
        liquidator: &Address,
        account: &Address,
    ) -> Result<LiquidationOutcome, Error> {
        if !LoanBook::get(env, account).active {
            return Err(Error::NotLiquidatable);
        }
        let health_factor = HealthEngine::health_factor(env, account)?;
        if health_factor >= HEALTH_FACTOR_ONE {
            return Err(Error::NotLiquidatable);
        }

        let vault = VaultStorage::get_state(env);
        let bonus_pct = vault.config.risk.liquidation_bonus_pct;
        let debt = LoanBook::accrue(env, account)?.principal;

        // Value in the quote currency first, converted to base currency once
        let collateral_value = HealthEngine::collateral_value(env, &vault, account)?;
        let base_quote = HealthEngine::base_quote(env, &vault)?;
        let collateral_value = base_quote.amount_for(collateral_value)?;

        for asset in vault.assets.iter() {
            CollateralLedger::seize(env, account, &asset.token, liquidator, bonus_pct)?;
        }

        let bonus = collateral_value
            .checked_mul(bonus_pct as i128)
            .ok_or(Error::ArithmeticError)?
            / 100;
        let owed = debt.checked_add(bonus).ok_or(Error::ArithmeticError)?;
        let shortfall = (owed - collateral_value).max(0);

        let pool = LendingPool::record_liquidation(env, debt, shortfall)?;
        LoanBook::close(env, account);

        events::Liquidation {
            account: account.clone(),
            liquidator: liquidator.clone(),
            debt_repaid: debt,
            collateral_value,
            bonus,
            bad_debt: shortfall,
            health_factor,
            ledger: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        }
        .publish(env);

        if shortfall > 0 {
            events::BadDebt {
                account: account.clone(),
                shortfall,
                total_bad_debt: pool.bad_debt,
            }
            .publish(env);
        }

        Ok(LiquidationOutcome {
            debt_repaid: debt,
            collateral_value,
            bonus,
            bad_debt: shortfall,
        })
    }
}
