use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Amount exceeds the collateral position
    InsufficientBalance = 1,

    /// Account already has an active loan
    LoanAlreadyActive = 2,

    /// Account has no active loan
    NoActiveLoan = 3,

    /// Repayment exceeds the accrued debt
    OverRepayment = 4,

    /// Borrow exceeds the account's maximum borrow
    ExceedsMaxBorrow = 5,

    /// Pool reserve headroom is too small
    PoolInsufficientLiquidity = 6,

    /// Caller does not hold the required role
    Unauthorized = 7,

    /// Health factor is not below 100
    NotLiquidatable = 8,

    /// Outstanding liquidation shortfall must be covered first
    BadDebt = 9,

    /// Value must be greater than 0
    ValueNotPositive = 10,

    /// Asset is not in the vault's collateral list
    UnsupportedAsset = 11,

    /// Configuration parameters are out of range
    InvalidConfig = 12,

    /// Withdrawal would leave the health factor below 100
    WithdrawalWouldUndercollateralize = 13,

    /// Failed to fetch price data from the Oracle
    OraclePriceFetchFailed = 14,

    /// Failed to fetch decimals from the Oracle
    OracleDecimalsFetchFailed = 15,

    /// Token transfer failed
    TransferFailed = 16,

    /// Arithmetic overflow or underflow occurred
    ArithmeticError = 17,

    /// Payment exceeds the outstanding bad debt
    ExceedsBadDebt = 18,
}
