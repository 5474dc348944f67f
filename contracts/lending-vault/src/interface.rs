use soroban_sdk::{Address, Env, String, Vec};

use crate::{
    Error,
    storage::{
        CollateralAsset, LiquidationOutcome, Loan, PoolState, RateModel, RiskParams, VaultConfig,
        WithdrawalPolicy,
    },
};

/// Per-account operations: collateral, borrowing and liquidation.
pub trait IsLendingVault {
    /// Transfer `amount` of a supported `asset` from `account` into the vault
    /// and credit its collateral position. Returns the new position.
    fn deposit_collateral(
        env: &Env,
        account: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, Error>;

    /// Return collateral to `account`. While a loan is active this is either
    /// refused outright or allowed only if the health factor stays at or above
    /// 100, depending on the configured [`WithdrawalPolicy`].
    fn withdraw_collateral(
        env: &Env,
        account: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, Error>;

    /// Open a loan of `amount` base currency and send the funds to `account`.
    fn take_loan(env: &Env, account: Address, amount: i128) -> Result<Loan, Error>;

    /// Accrue interest, then pay down the debt by `amount` base currency.
    /// Paying more than the accrued debt is rejected. The loan deactivates when
    /// nothing is left to pay.
    fn repay_loan(env: &Env, account: Address, amount: i128) -> Result<Loan, Error>;

    /// Liquidate `account` if its health factor is below 100. Callable by anyone;
    /// the bonus is paid to `liquidator` out of the seized collateral.
    fn liquidate(
        env: &Env,
        liquidator: Address,
        account: Address,
    ) -> Result<LiquidationOutcome, Error>;

    /// Collateral position of `account` in `asset`
    fn get_collateral_balance(env: &Env, account: Address, asset: Address) -> i128;

    /// All collateral of `account` valued at current prices
    fn get_collateral_value_usd(env: &Env, account: Address) -> Result<i128, Error>;

    /// The stored loan record, without pending interest
    fn get_loan_details(env: &Env, account: Address) -> Loan;

    /// Principal plus interest accrued up to now
    fn get_loan_debt_with_accrued(env: &Env, account: Address) -> Result<i128, Error>;

    /// Base currency `account` may still borrow
    fn get_max_borrow(env: &Env, account: Address) -> Result<i128, Error>;

    /// 100 means collateral sits exactly at the liquidation threshold.
    /// `u32::MAX` when there is no debt.
    fn get_health_factor(env: &Env, account: Address) -> Result<u32, Error>;

    /// Valuation price of `asset` with 18 decimals, after the staleness fallback
    fn get_token_price_usd(env: &Env, asset: Address) -> Result<i128, Error>;

    /// Supported collateral, in a fixed order
    fn get_supported_assets(env: &Env) -> Vec<CollateralAsset>;
}

/// Base-currency reserve funded by the owner.
pub trait IsLendingPool {
    /// Add `amount` base currency to the reserve. Owner only.
    fn deposit_lending_pool(env: &Env, from: Address, amount: i128) -> Result<PoolState, Error>;

    /// Take idle reserve back out. Owner only; refused while bad debt is outstanding.
    fn withdraw_lending_pool(env: &Env, to: Address, amount: i128) -> Result<PoolState, Error>;

    /// Pay in base currency against outstanding bad debt. Owner only.
    fn cover_bad_debt(env: &Env, from: Address, amount: i128) -> Result<PoolState, Error>;

    /// Send all collateral of `asset` taken by liquidations to the owner.
    fn claim_seized_collateral(env: &Env, to: Address, asset: Address) -> Result<i128, Error>;

    /// Collateral of `asset` taken by liquidations and not yet claimed
    fn get_seized_collateral(env: &Env, asset: Address) -> i128;

    /// Base currency available to borrow
    fn pool_balance(env: &Env) -> i128;

    /// Borrowed share of the reserve, in basis points
    fn get_utilization(env: &Env) -> u32;

    /// Annual borrow rate, in basis points
    fn get_current_borrow_rate(env: &Env) -> u32;

    fn get_pool_state(env: &Env) -> PoolState;
}

pub trait IsVaultAdmin {
    fn set_rate_model(env: &Env, model: RateModel) -> Result<VaultConfig, Error>;

    fn set_risk_params(env: &Env, risk: RiskParams) -> Result<VaultConfig, Error>;

    fn set_staleness_window(env: &Env, seconds: u64) -> Result<VaultConfig, Error>;

    fn set_withdrawal_policy(env: &Env, policy: WithdrawalPolicy) -> Result<VaultConfig, Error>;

    fn get_config(env: &Env) -> VaultConfig;

    /// Owner and pool funder
    fn owner(env: &Env) -> Address;

    /// Report the version of this contract
    fn version(env: &Env) -> String;
}
