//! Whole-position transfers and the allowances that gate delegated ones.
//!
//! A position never splits: every move takes the sender's entire balance and
//! either lands as-is on an empty recipient or merges into the recipient's
//! existing position.

use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol};

use crate::events;
use crate::position::{self, Position};
use crate::ContractError;

// Allowances use tuple keys: (ALLOW, owner, spender)
const ALLOWANCE: Symbol = symbol_short!("ALLOW");
// Approval generation per owner: (ALLOW_GEN, owner)
const GENERATION: Symbol = symbol_short!("ALLOW_GEN");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Permission for a spender to move one specific position of the owner.
///
/// `lock_start` and `generation` pin the allowance to the position it was
/// granted for. The owner's generation moves on whenever a position leaves
/// the account, so neither a later position of the same size nor the same
/// position coming back inherits it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allowance {
    pub amount: i128,
    pub lock_start: u64,
    pub generation: u32,
}

fn allowance_key(owner: &Address, spender: &Address) -> (Symbol, Address, Address) {
    (ALLOWANCE, owner.clone(), spender.clone())
}

fn generation_key(owner: &Address) -> (Symbol, Address) {
    (GENERATION, owner.clone())
}

/// Current approval generation of `owner`.
pub fn generation(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&generation_key(owner))
        .unwrap_or(0)
}

/// Invalidates every allowance `owner` has granted so far.
pub fn revoke_all(env: &Env, owner: &Address) {
    let key = generation_key(owner);
    let next = generation(env, owner).wrapping_add(1);
    env.storage().persistent().set(&key, &next);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Allowance that lets a spender move exactly `current` of `owner`.
pub fn allowance_for(env: &Env, owner: &Address, current: &Position) -> Allowance {
    Allowance {
        amount: current.amount,
        lock_start: current.lock_start,
        generation: generation(env, owner),
    }
}

pub fn get_allowance(env: &Env, owner: &Address, spender: &Address) -> Option<Allowance> {
    env.storage()
        .persistent()
        .get(&allowance_key(owner, spender))
}

pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, allowance: &Allowance) {
    let key = allowance_key(owner, spender);
    env.storage().persistent().set(&key, allowance);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn clear_allowance(env: &Env, owner: &Address, spender: &Address) {
    env.storage()
        .persistent()
        .remove(&allowance_key(owner, spender));
}

/// Loads `owner`'s position and checks that `amount` names all of it.
pub fn whole_position(env: &Env, owner: &Address, amount: i128) -> Result<Position, ContractError> {
    let current = position::get(env, owner);
    if current.is_empty() {
        return Err(ContractError::NoPosition);
    }
    if amount != current.amount {
        log!(env, "amount must equal position", amount, current.amount);
        return Err(ContractError::AmountBelowPosition);
    }
    Ok(current)
}

/// Checks that `spender` was approved for exactly `outgoing`.
pub fn check_allowance(
    env: &Env,
    owner: &Address,
    spender: &Address,
    outgoing: &Position,
) -> Result<(), ContractError> {
    let expected = allowance_for(env, owner, outgoing);
    match get_allowance(env, owner, spender) {
        Some(allowance) if allowance == expected => Ok(()),
        _ => Err(ContractError::AllowanceMismatch),
    }
}

/// Moves `outgoing` from `from` to `to`, merging with any position `to`
/// already holds, and clears `from` along with its allowances.
pub fn deliver(
    env: &Env,
    from: &Address,
    to: &Address,
    outgoing: Position,
) -> Result<(), ContractError> {
    if from == to {
        return Err(ContractError::SelfTransfer);
    }

    let existing = position::get(env, to);
    let received = if existing.is_empty() {
        outgoing.clone()
    } else {
        existing
            .merge(&outgoing)
            .ok_or(ContractError::MathOverflow)?
    };

    position::set(env, to, &received);
    position::clear(env, from);
    revoke_all(env, from);

    events::publish_position_transferred(env, from.clone(), to.clone(), outgoing.amount);

    Ok(())
}
