use soroban_sdk::{Address, Env, Symbol, Vec, contracttype, symbol_short};

pub(crate) const ADMIN_KEY: Symbol = symbol_short!("ADMIN");
const STORAGE: Symbol = symbol_short!("STORAGE");
const POOL: Symbol = symbol_short!("POOL");

/// Where an asset's price comes from.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PriceSource {
    /// Null source: always valued 1:1 against the quote currency
    Fixed,
    /// SEP-40 feed contract quoting the asset under its symbol
    Feed(Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralAsset {
    /// Token contract holding the asset
    pub token: Address,
    /// Symbol the price feed quotes this asset under
    pub symbol: Symbol,
    pub source: PriceSource,
}

/// Kinked utilization curve. All values in basis points.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateModel {
    pub base_rate_bps: u32,
    /// Rate added across the whole [0, 100%] range below the kink
    pub slope1_bps: u32,
    /// Rate added across the whole [0, 100%] range above the kink
    pub slope2_bps: u32,
    pub kink_bps: u32,
}

/// Feature switches distinguishing vault versions.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    pub multi_asset: bool,
    pub dynamic_rate: bool,
    pub oracle_pricing: bool,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WithdrawalPolicy {
    /// Collateral is locked while any loan is active
    NoActiveLoan,
    /// Collateral may leave while the health factor stays at or above 100
    HealthFactorGated,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RiskParams {
    /// Share of collateral value that may be borrowed, in percent
    pub collateral_factor_pct: u32,
    /// Collateralization ratio below which a position is liquidatable, in percent
    pub liquidation_threshold_pct: u32,
    /// Liquidator reward on seized collateral value, in percent
    pub liquidation_bonus_pct: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    pub risk: RiskParams,
    /// Seconds after which a feed price is replaced by the 1:1 fallback
    pub staleness_window: u64,
    pub rate_model: RateModel,
    pub capabilities: Capabilities,
    pub withdrawal_policy: WithdrawalPolicy,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PoolState {
    pub total_reserve: i128,
    pub total_borrowed: i128,
    /// Unrecovered liquidation shortfall
    pub bad_debt: i128,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Loan {
    /// Outstanding debt as of `checkpoint`, interest included
    pub principal: i128,
    /// Last time (in seconds) interest was committed
    pub checkpoint: u64,
    pub active: bool,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LiquidationOutcome {
    /// Accrued debt closed by the liquidation, in base currency
    pub debt_repaid: i128,
    /// Oracle value of everything seized, in base currency
    pub collateral_value: i128,
    /// Value paid to the liquidator in seized collateral, in base currency
    pub bonus: i128,
    /// Part of `debt_repaid + bonus` the seized value did not cover
    pub bad_debt: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct PositionKey {
    pub account: Address,
    pub asset: Address,
}

// Persistent storage keys
#[contracttype]
pub enum DataKey {
    /// Collateral deposited by an account, per asset
    Collateral(PositionKey),
    /// Each address holds at most one loan record
    Loan(Address),
    /// Collateral taken by liquidations, per asset, claimable by the owner
    Seized(Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultStorage {
    /// Token lent out and repaid
    pub base_token: Address,
    /// Symbol the base currency is quoted under
    pub base_symbol: Symbol,
    /// Price of the base currency in the oracle quote currency
    pub base_source: PriceSource,
    /// Supported collateral, in display order
    pub assets: Vec<CollateralAsset>,
    pub config: VaultConfig,
}

impl VaultStorage {
    pub fn get_state(env: &Env) -> VaultStorage {
        env.storage()
            .instance()
            .get(&STORAGE)
            .expect("vault not initialized")
    }

    pub fn set_state(env: &Env, storage: &VaultStorage) {
        env.storage().instance().set(&STORAGE, storage);
    }

    pub fn get_pool(env: &Env) -> PoolState {
        env.storage().instance().get(&POOL).unwrap_or_default()
    }

    pub fn set_pool(env: &Env, pool: &PoolState) {
        env.storage().instance().set(&POOL, pool);
    }

    pub fn asset(&self, token: &Address) -> Option<CollateralAsset> {
        self.assets.iter().find(|a| a.token == *token)
    }

    pub fn admin(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&ADMIN_KEY)
            .expect("admin not set")
    }
}

pub(crate) fn persist<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    let ttl = env.storage().max_ttl();
    env.storage().persistent().extend_ttl(key, ttl, ttl);
}
