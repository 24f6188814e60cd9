#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub asset: Address,
    pub lock_duration: u64,
    pub reward_pool: i128,
    pub capacity: i128,
    pub user_stake_limit: i128,
    pub min_stake: i128,
    pub yield_rate: u32,
    pub timestamp: u64,
}

/// Fired when an account opens a position.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a position is settled; `total_paid` is principal plus yield.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub total_paid: i128,
    pub timestamp: u64,
}

/// Fired when a whole position moves to another account.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionTransferredEvent {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired after every stake and withdrawal with the pool figures that remain.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeLimitsUpdatedEvent {
    pub remaining_capacity: i128,
    pub remaining_reward_pool: i128,
    pub timestamp: u64,
}

/// Fired when an owner lets a spender move its position.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn publish_initialized(
    env: &Env,
    asset: Address,
    lock_duration: u64,
    reward_pool: i128,
    capacity: i128,
    user_stake_limit: i128,
    min_stake: i128,
    yield_rate: u32,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            asset,
            lock_duration,
            reward_pool,
            capacity,
            user_stake_limit,
            min_stake,
            yield_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, total_paid: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            total_paid,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_position_transferred(env: &Env, from: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("POS_XFER"), from.clone(), to.clone()),
        PositionTransferredEvent {
            from,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_limits_updated(
    env: &Env,
    remaining_capacity: i128,
    remaining_reward_pool: i128,
) {
    env.events().publish(
        (symbol_short!("LIMITS"),),
        StakeLimitsUpdatedEvent {
            remaining_capacity,
            remaining_reward_pool,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_approval(env: &Env, owner: Address, spender: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("APPROVE"), owner.clone()),
        ApprovalEvent {
            owner,
            spender,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
