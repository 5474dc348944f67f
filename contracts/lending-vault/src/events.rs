use soroban_sdk::{Address, contractevent};

#[contractevent(topics = ["collateral"])]
pub struct CollateralPosition {
    #[topic]
    pub account: Address,
    #[topic]
    pub asset: Address,
    pub amount: i128,
    pub ledger: u32,
    pub timestamp: u64,
}

#[contractevent(topics = ["loan"])]
pub struct LoanRecord {
    #[topic]
    pub account: Address,
    pub principal: i128,
    pub checkpoint: u64,
    pub active: bool,
    pub ledger: u32,
    pub timestamp: u64,
}

#[contractevent(topics = ["pool"])]
pub struct Pool {
    pub total_reserve: i128,
    pub total_borrowed: i128,
    pub bad_debt: i128,
    pub ledger: u32,
    pub timestamp: u64,
}

#[contractevent(topics = ["liquidation"])]
pub struct Liquidation {
    #[topic]
    pub account: Address,
    #[topic]
    pub liquidator: Address,
    pub debt_repaid: i128,
    pub collateral_value: i128,
    pub bonus: i128,
    pub bad_debt: i128,
    pub health_factor: u32,
    pub ledger: u32,
    pub timestamp: u64,
}

#[contractevent(topics = ["bad_debt"])]
pub struct BadDebt {
    #[topic]
    pub account: Address,
    pub shortfall: i128,
    pub total_bad_debt: i128,
}
