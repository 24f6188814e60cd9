//! Adapter over the asset contract that holds real balances.
//!
//! Every call goes through the client's `try_*` variant so a failing asset
//! contract surfaces as an explicit outcome the engine checks, never as a
//! trap inside the ledger.

use soroban_sdk::{token, Address, Env};

/// Moves `amount` of `asset` from `from` to `to`. Returns `false` if the
/// asset contract rejected the transfer.
pub fn transfer(env: &Env, asset: &Address, from: &Address, to: &Address, amount: i128) -> bool {
    let result = token::Client::new(env, asset).try_transfer(from, to, &amount);
    matches!(result, Ok(Ok(())))
}

/// Balance of `account`, or `None` if the asset contract could not answer.
pub fn balance_of(env: &Env, asset: &Address, account: &Address) -> Option<i128> {
    match token::Client::new(env, asset).try_balance(account) {
        Ok(Ok(balance)) => Some(balance),
        _ => None,
    }
}

/// Display decimals of `asset`, or `None` if it does not report them.
pub fn decimals(env: &Env, asset: &Address) -> Option<u32> {
    match token::Client::new(env, asset).try_decimals() {
        Ok(Ok(decimals)) => Some(decimals),
        _ => None,
    }
}
