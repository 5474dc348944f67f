use soroban_sdk::{Address, Env, String, Symbol, Vec, contract, contractimpl};

use crate::{
    Error,
    collateral::CollateralLedger,
    health::{HEALTH_FACTOR_ONE, HealthEngine},
    interest::{BASIS_POINTS, InterestRateModel},
    interface::{IsLendingPool, IsLendingVault, IsVaultAdmin},
    liquidation::LiquidationEngine,
    loan::LoanBook,
    pool::LendingPool,
    storage::{
        ADMIN_KEY, CollateralAsset, LiquidationOutcome, Loan, PoolState, PriceSource, RateModel,
        RiskParams, VaultConfig, VaultStorage, WithdrawalPolicy,
    },
    transfer::{transfer_in, transfer_out},
};

const VERSION_STRING: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR"),
    ".",
    env!("CARGO_PKG_VERSION_PATCH")
);

fn assert_positive(amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::ValueNotPositive);
    }
    Ok(())
}

impl RiskParams {
    /// A position opened at the collateral factor must not start out liquidatable.
    pub fn is_valid(&self) -> bool {
        self.collateral_factor_pct > 0
            && self.collateral_factor_pct <= 100
            && self.liquidation_threshold_pct > 100
            && self.liquidation_bonus_pct <= 100
            && self.collateral_factor_pct as u64 * self.liquidation_threshold_pct as u64
                <= BASIS_POINTS as u64
    }
}

fn validate_assets(config: &VaultConfig, assets: &Vec<CollateralAsset>) -> Result<(), Error> {
    if assets.is_empty() {
        return Err(Error::InvalidConfig);
    }
    if !config.capabilities.multi_asset && assets.len() > 1 {
        return Err(Error::InvalidConfig);
    }
    for (i, asset) in assets.iter().enumerate() {
        if assets
            .iter()
            .skip(i + 1)
            .any(|other| other.token == asset.token)
        {
            return Err(Error::InvalidConfig);
        }
    }
    Ok(())
}

#[contract]
pub struct LendingVault;

#[contractimpl]
impl LendingVault {
    pub fn __constructor(
        env: &Env,
        admin: Address,
        base_token: Address,
        base_symbol: Symbol,
        base_source: PriceSource,
        assets: Vec<CollateralAsset>,
        config: VaultConfig,
    ) -> Result<(), Error> {
        if !config.risk.is_valid() || !config.rate_model.is_valid() {
            return Err(Error::InvalidConfig);
        }
        validate_assets(&config, &assets)?;

        env.storage().instance().set(&ADMIN_KEY, &admin);
        VaultStorage::set_state(
            env,
            &VaultStorage {
                base_token,
                base_symbol,
                base_source,
                assets,
                config,
            },
        );
        VaultStorage::set_pool(env, &PoolState::default());
        Ok(())
    }

    fn require_admin(env: &Env) {
        VaultStorage::admin(env).require_auth();
    }

    /// Capability check for calls naming the caller explicitly
    fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        if *caller != VaultStorage::admin(env) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }
}

impl LendingVault {
    fn update_config<F>(env: &Env, update: F) -> Result<VaultConfig, Error>
    where
        F: FnOnce(&mut VaultConfig),
    {
        Self::require_admin(env);
        let mut state = VaultStorage::get_state(env);
        update(&mut state.config);
        if !state.config.risk.is_valid() || !state.config.rate_model.is_valid() {
            return Err(Error::InvalidConfig);
        }
        VaultStorage::set_state(env, &state);
        Ok(state.config)
    }
}

#[contractimpl]
impl IsLendingVault for LendingVault {
    fn deposit_collateral(
        env: &Env,
        account: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        account.require_auth();
        CollateralLedger::deposit(env, &account, &asset, amount)
    }

    fn withdraw_collateral(
        env: &Env,
        account: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        account.require_auth();
        assert_positive(amount)?;
        if amount > CollateralLedger::balance(env, &account, &asset) {
            return Err(Error::InsufficientBalance);
        }

        if LoanBook::get(env, &account).active {
            match VaultStorage::get_state(env).config.withdrawal_policy {
                WithdrawalPolicy::NoActiveLoan => return Err(Error::LoanAlreadyActive),
                WithdrawalPolicy::HealthFactorGated => {
                    let health_factor = HealthEngine::health_factor_after_withdrawal(
                        env, &account, &asset, amount,
                    )?;
                    if health_factor < HEALTH_FACTOR_ONE {
                        return Err(Error::WithdrawalWouldUndercollateralize);
                    }
                }
            }
        }

        CollateralLedger::withdraw(env, &account, &asset, amount)
    }

    fn take_loan(env: &Env, account: Address, amount: i128) -> Result<Loan, Error> {
        account.require_auth();
        assert_positive(amount)?;

        if LoanBook::get(env, &account).active {
            return Err(Error::LoanAlreadyActive);
        }
        if amount > LendingPool::state(env).available_liquidity() {
            return Err(Error::PoolInsufficientLiquidity);
        }
        if amount > HealthEngine::max_borrow(env, &account)? {
            return Err(Error::ExceedsMaxBorrow);
        }

        LendingPool::record_borrow(env, amount)?;
        let loan = LoanBook::open(env, &account, amount)?;
        transfer_out(env, &VaultStorage::get_state(env).base_token, &account, amount)?;
        Ok(loan)
    }

    fn repay_loan(env: &Env, account: Address, amount: i128) -> Result<Loan, Error> {
        account.require_auth();
        assert_positive(amount)?;

        let loan = LoanBook::repay(env, &account, amount)?;
        transfer_in(env, &VaultStorage::get_state(env).base_token, &account, amount)?;
        LendingPool::record_repay(env, amount)?;
        Ok(loan)
    }

    fn liquidate(
        env: &Env,
        liquidator: Address,
        account: Address,
    ) -> Result<LiquidationOutcome, Error> {
        liquidator.require_auth();
        LiquidationEngine::liquidate(env, &liquidator, &account)
    }

    fn get_collateral_balance(env: &Env, account: Address, asset: Address) -> i128 {
        CollateralLedger::balance(env, &account, &asset)
    }

    fn get_collateral_value_usd(env: &Env, account: Address) -> Result<i128, Error> {
        HealthEngine::collateral_value(env, &VaultStorage::get_state(env), &account)
    }

    fn get_loan_details(env: &Env, account: Address) -> Loan {
        LoanBook::get(env, &account)
    }

    fn get_loan_debt_with_accrued(env: &Env, account: Address) -> Result<i128, Error> {
        LoanBook::accrued_debt(env, &account)
    }

    fn get_max_borrow(env: &Env, account: Address) -> Result<i128, Error> {
        HealthEngine::max_borrow(env, &account)
    }

    fn get_health_factor(env: &Env, account: Address) -> Result<u32, Error> {
        HealthEngine::health_factor(env, &account)
    }

    fn get_token_price_usd(env: &Env, asset: Address) -> Result<i128, Error> {
        HealthEngine::token_price(env, &asset)
    }

    fn get_supported_assets(env: &Env) -> Vec<CollateralAsset> {
        VaultStorage::get_state(env).assets
    }
}

#[contractimpl]
impl IsLendingPool for LendingVault {
    fn deposit_lending_pool(env: &Env, from: Address, amount: i128) -> Result<PoolState, Error> {
        Self::require_owner(env, &from)?;
        assert_positive(amount)?;
        transfer_in(env, &VaultStorage::get_state(env).base_token, &from, amount)?;
        LendingPool::fund(env, amount)
    }

    fn withdraw_lending_pool(env: &Env, to: Address, amount: i128) -> Result<PoolState, Error> {
        Self::require_owner(env, &to)?;
        assert_positive(amount)?;
        let pool = LendingPool::defund(env, amount)?;
        transfer_out(env, &VaultStorage::get_state(env).base_token, &to, amount)?;
        Ok(pool)
    }

    fn cover_bad_debt(env: &Env, from: Address, amount: i128) -> Result<PoolState, Error> {
        Self::require_owner(env, &from)?;
        assert_positive(amount)?;
        let pool = LendingPool::cover_bad_debt(env, amount)?;
        transfer_in(env, &VaultStorage::get_state(env).base_token, &from, amount)?;
        Ok(pool)
    }

    fn claim_seized_collateral(env: &Env, to: Address, asset: Address) -> Result<i128, Error> {
        Self::require_owner(env, &to)?;
        CollateralLedger::release_seized(env, &asset, &to)
    }

    fn get_seized_collateral(env: &Env, asset: Address) -> i128 {
        CollateralLedger::seized(env, &asset)
    }

    fn pool_balance(env: &Env) -> i128 {
        LendingPool::state(env).available_liquidity()
    }

    fn get_utilization(env: &Env) -> u32 {
        InterestRateModel::utilization(env)
    }

    fn get_current_borrow_rate(env: &Env) -> u32 {
        InterestRateModel::current_rate(env)
    }

    fn get_pool_state(env: &Env) -> PoolState {
        LendingPool::state(env)
    }
}

#[contractimpl]
impl IsVaultAdmin for LendingVault {
    fn set_rate_model(env: &Env, model: RateModel) -> Result<VaultConfig, Error> {
        Self::update_config(env, |config| config.rate_model = model)
    }

    fn set_risk_params(env: &Env, risk: RiskParams) -> Result<VaultConfig, Error> {
        Self::update_config(env, |config| config.risk = risk)
    }

    fn set_staleness_window(env: &Env, seconds: u64) -> Result<VaultConfig, Error> {
        Self::update_config(env, |config| config.staleness_window = seconds)
    }

    fn set_withdrawal_policy(env: &Env, policy: WithdrawalPolicy) -> Result<VaultConfig, Error> {
        Self::update_config(env, |config| config.withdrawal_policy = policy)
    }

    fn get_config(env: &Env) -> VaultConfig {
        VaultStorage::get_state(env).config
    }

    fn owner(env: &Env) -> Address {
        VaultStorage::admin(env)
    }

    fn version(env: &Env) -> String {
        String::from_str(env, VERSION_STRING)
    }
}
