use soroban_sdk::{Address, Env, token::TokenClient};

use crate::Error;

/// Pull `amount` of `token` from `from` into the vault
pub fn transfer_in(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    match TokenClient::new(env, token).try_transfer(from, &env.current_contract_address(), &amount)
    {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

/// Send `amount` of `token` from the vault to `to`
pub fn transfer_out(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    match TokenClient::new(env, token).try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}
