#![no_std]

mod collateral;
mod error;
mod events;
mod health;
mod interest;
mod interface;
mod liquidation;
mod loan;
mod oracle;
mod pool;
mod storage;
mod transfer;
pub mod vault;

pub use error::Error;
pub use interface::{IsLendingPool, IsLendingVault, IsVaultAdmin};
pub use storage::{
    Capabilities, CollateralAsset, LiquidationOutcome, Loan, PoolState, PriceSource, RateModel,
    RiskParams, VaultConfig, WithdrawalPolicy,
};
pub use vault::{LendingVault, LendingVaultClient};
