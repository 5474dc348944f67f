use soroban_sdk::{Address, Env};

use crate::{
    Error, events,
    interest::{InterestRateModel, simple_interest},
    pool::LendingPool,
    storage::{DataKey, Loan, persist},
};

impl Loan {
    fn opened(principal: i128, now: u64) -> Loan {
        Loan {
            principal,
            checkpoint: now,
            active: true,
        }
    }
}

pub struct LoanBook;

impl LoanBook {
    /// Loan record for `account`; an inactive zero loan if none was ever opened
    pub fn get(env: &Env, account: &Address) -> Loan {
        env.storage()
            .persistent()
            .get(&DataKey::Loan(account.clone()))
            .unwrap_or_default()
    }

    fn set(env: &Env, account: &Address, loan: &Loan) {
        persist(env, &DataKey::Loan(account.clone()), loan);
        events::LoanRecord {
            account: account.clone(),
            principal: loan.principal,
            checkpoint: loan.checkpoint,
            active: loan.active,
            ledger: env.ledger().sequence(),
            timestamp: env.ledger().timestamp(),
        }
        .publish(env);
    }

    /// Interest owed on top of `loan.principal` as of now, at the current rate
    pub fn pending_interest(env: &Env, loan: &Loan) -> Result<i128, Error> {
        if !loan.active {
            return Ok(0);
        }
        let elapsed = env.ledger().timestamp().saturating_sub(loan.checkpoint);
        simple_interest(loan.principal, InterestRateModel::current_rate(env), elapsed)
    }

    /// Principal plus pending interest, computed without committing anything
    pub fn accrued_debt(env: &Env, account: &Address) -> Result<i128, Error> {
        let loan = Self::get(env, account);
        let interest = Self::pending_interest(env, &loan)?;
        loan.principal
            .checked_add(interest)
            .ok_or(Error::ArithmeticError)
    }

    /// Capitalize pending interest into the principal and move the checkpoint to now.
    pub fn accrue(env: &Env, account: &Address) -> Result<Loan, Error> {
        let mut loan = Self::get(env, account);
        if !loan.active {
            return Err(Error::NoActiveLoan);
        }
        let now = env.ledger().timestamp();
        if now <= loan.checkpoint {
            return Ok(loan);
        }

        let interest = Self::pending_interest(env, &loan)?;
        loan.principal = loan
            .principal
            .checked_add(interest)
            .ok_or(Error::ArithmeticError)?;
        loan.checkpoint = now;

        LendingPool::record_interest(env, interest)?;
        Self::set(env, account, &loan);
        Ok(loan)
    }

    pub fn open(env: &Env, account: &Address, amount: i128) -> Result<Loan, Error> {
        if Self::get(env, account).active {
            return Err(Error::LoanAlreadyActive);
        }
        let loan = Loan::opened(amount, env.ledger().timestamp());
        Self::set(env, account, &loan);
        Ok(loan)
    }

    /// Reduce the committed debt by `amount`. Paying more than is owed is rejected.
    pub fn repay(env: &Env, account: &Address, amount: i128) -> Result<Loan, Error> {
        let mut loan = Self::accrue(env, account)?;
        if amount > loan.principal {
            return Err(Error::OverRepayment);
        }

        loan.principal -= amount;
        if loan.principal == 0 {
            loan.active = false;
        }
        Self::set(env, account, &loan);
        Ok(loan)
    }

    /// Zero the loan after its debt was settled by liquidation
    pub fn close(env: &Env, account: &Address) -> Loan {
        let loan = Loan {
            principal: 0,
            checkpoint: env.ledger().timestamp(),
            active: false,
        };
        Self::set(env, account, &loan);
        loan
    }
}
