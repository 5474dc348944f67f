use soroban_sdk::Env;

use crate::{
    Error, events,
    storage::{PoolState, VaultStorage},
};

impl PoolState {
    /// Base currency held by the pool and not lent out
    pub fn available_liquidity(&self) -> i128 {
        self.total_reserve - self.total_borrowed
    }
}

pub struct LendingPool;

impl LendingPool {
    pub fn state(env: &Env) -> PoolState {
        VaultStorage::get_pool(env)
    }

    fn set_state(env: &Env, pool: &PoolState) {
        VaultStorage::set_pool(env, pool);
        events::Pool {
            total_reserve: pool.total_reserve,
            total_borrowed: pool.total_borrowed,
            bad_debt: pool.bad_debt,
            ledger: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        }
        .publish(env);
    }

    pub fn fund(env: &Env, amount: i128) -> Result<PoolState, Error> {
        let mut pool = Self::state(env);
        pool.total_reserve = pool
            .total_reserve
            .checked_add(amount)
            .ok_or(Error::ArithmeticError)?;
        Self::set_state(env, &pool);
        Ok(pool)
    }

    /// Take idle reserve out of the pool. Refused while bad debt is outstanding.
    pub fn defund(env: &Env, amount: i128) -> Result<PoolState, Error> {
        let mut pool = Self::state(env);
        if pool.bad_debt > 0 {
            return Err(Error::BadDebt);
        }
        if amount > pool.available_liquidity() {
            return Err(Error::PoolInsufficientLiquidity);
        }
        pool.total_reserve -= amount;
        Self::set_state(env, &pool);
        Ok(pool)
    }

    /// Restore reserve lost to liquidation shortfalls. Never pays in more than is missing.
    pub fn cover_bad_debt(env: &Env, amount: i128) -> Result<PoolState, Error> {
        let mut pool = Self::state(env);
        if amount > pool.bad_debt {
            return Err(Error::ExceedsBadDebt);
        }
        pool.bad_debt -= amount;
        pool.total_reserve = pool
            .total_reserve
            .checked_add(amount)
            .ok_or(Error::ArithmeticError)?;
        Self::set_state(env, &pool);
        Ok(pool)
    }

    /// Lend `amount` out. Rejected, never clamped, when headroom is short.
    pub fn record_borrow(env: &Env, amount: i128) -> Result<PoolState, Error> {
        let mut pool = Self::state(env);
        if amount > pool.available_liquidity() {
            return Err(Error::PoolInsufficientLiquidity);
        }
        pool.total_borrowed += amount;
        Self::set_state(env, &pool);
        Ok(pool)
    }

    pub fn record_repay(env: &Env, amount: i128) -> Result<PoolState, Error> {
        let mut pool = Self::state(env);
        pool.total_borrowed = pool
            .total_borrowed
            .checked_sub(amount)
            .filter(|v| *v >= 0)
            .ok_or(Error::ArithmeticError)?;
        Self::set_state(env, &pool);
        Ok(pool)
    }

    /// Interest committed to a loan becomes both debt owed to the pool and
    /// reserve the pool owns.
    pub fn record_interest(env: &Env, interest: i128) -> Result<PoolState, Error> {
        let mut pool = Self::state(env);
        if interest == 0 {
            return Ok(pool);
        }
        pool.total_borrowed = pool
            .total_borrowed
            .checked_add(interest)
            .ok_or(Error::ArithmeticError)?;
        pool.total_reserve = pool
            .total_reserve
            .checked_add(interest)
            .ok_or(Error::ArithmeticError)?;
        Self::set_state(env, &pool);
        Ok(pool)
    }

    /// Close `debt` against seized collateral. The lent funds leave the
    /// reserve; `shortfall` is added to the pool's bad debt.
    /// Idle liquidity is not touched.
    pub fn record_liquidation(
        env: &Env,
        debt: i128,
        shortfall: i128,
    ) -> Result<PoolState, Error> {
        let mut pool = Self::state(env);
        let total_borrowed = pool
            .total_borrowed
            .checked_sub(debt)
            .filter(|v| *v >= 0)
            .ok_or(Error::ArithmeticError)?;
        let total_reserve = pool
            .total_reserve
            .checked_sub(debt)
            .ok_or(Error::ArithmeticError)?;
        let bad_debt = pool
            .bad_debt
            .checked_add(shortfall)
            .ok_or(Error::ArithmeticError)?;

        pool.total_borrowed = total_borrowed;
        pool.total_reserve = total_reserve;
        pool.bad_debt = bad_debt;
        Self::set_state(env, &pool);
        Ok(pool)
    }
}
