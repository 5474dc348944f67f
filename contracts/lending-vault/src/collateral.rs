use soroban_sdk::{Address, Env};

use crate::{
    Error, events,
    storage::{DataKey, PositionKey, VaultStorage, persist},
    transfer::{transfer_in, transfer_out},
};

fn position_key(account: &Address, asset: &Address) -> DataKey {
    DataKey::Collateral(PositionKey {
        account: account.clone(),
        asset: asset.clone(),
    })
}

pub struct CollateralLedger;

impl CollateralLedger {
    /// Deposited amount of `asset` held for `account`
    pub fn balance(env: &Env, account: &Address, asset: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&position_key(account, asset))
            .unwrap_or(0)
    }

    fn set_balance(env: &Env, account: &Address, asset: &Address, amount: i128) {
        persist(env, &position_key(account, asset), &amount);
        events::CollateralPosition {
            account: account.clone(),
            asset: asset.clone(),
            amount,
            ledger: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        }
        .publish(env);
    }

    /// Pull `amount` of `asset` from `account` and credit its position.
    pub fn deposit(
        env: &Env,
        account: &Address,
        asset: &Address,
        amount: i128,
    ) -> Result<i128, Error> {
        if amount <= 0 {
            return Err(Error::ValueNotPositive);
        }
        if VaultStorage::get_state(env).asset(asset).is_none() {
            return Err(Error::UnsupportedAsset);
        }

        // Check for overflow before we transfer
        let Some(position) = Self::balance(env, account, asset).checked_add(amount) else {
            return Err(Error::ArithmeticError);
        };
        transfer_in(env, asset, account, amount)?;

        Self::set_balance(env, account, asset, position);
        Ok(position)
    }

    /// Debit the position and send the tokens back to `account`.
    /// Loan and health gating is the caller's responsibility.
    pub fn withdraw(
        env: &Env,
        account: &Address,
        asset: &Address,
        amount: i128,
    ) -> Result<i128, Error> {
        if amount <= 0 {
            return Err(Error::ValueNotPositive);
        }
        let balance = Self::balance(env, account, asset);
        if amount > balance {
            return Err(Error::InsufficientBalance);
        }

        let position = balance - amount;
        transfer_out(env, asset, account, amount)?;

        Self::set_balance(env, account, asset, position);
        Ok(position)
    }

    /// Take the whole position of `asset`. `bonus_pct` percent of it goes to
    /// `liquidator`, the rest to the protocol's seized balance.
    /// Returns the amount paid to the liquidator.
    pub fn seize(
        env: &Env,
        account: &Address,
        asset: &Address,
        liquidator: &Address,
        bonus_pct: u32,
    ) -> Result<i128, Error> {
        let amount = Self::balance(env, account, asset);
        if amount == 0 {
            return Ok(0);
        }
        let bonus = amount
            .checked_mul(bonus_pct as i128)
            .ok_or(Error::ArithmeticError)?
            / 100;
        let seized = Self::seized(env, asset)
            .checked_add(amount - bonus)
            .ok_or(Error::ArithmeticError)?;

        persist(env, &DataKey::Seized(asset.clone()), &seized);
        Self::set_balance(env, account, asset, 0);
        if bonus > 0 {
            transfer_out(env, asset, liquidator, bonus)?;
        }
        Ok(bonus)
    }

    /// Collateral taken by liquidations and not yet claimed by the owner
    pub fn seized(env: &Env, asset: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Seized(asset.clone()))
            .unwrap_or(0)
    }

    /// Send every seized unit of `asset` to `to`.
    pub fn release_seized(env: &Env, asset: &Address, to: &Address) -> Result<i128, Error> {
        let amount = Self::seized(env, asset);
        if amount == 0 {
            return Err(Error::InsufficientBalance);
        }
        transfer_out(env, asset, to, amount)?;
        persist(env, &DataKey::Seized(asset.clone()), &0i128);
        Ok(amount)
    }
}
