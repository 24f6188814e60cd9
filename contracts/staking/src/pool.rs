//! Capacity and yield accounting.
//!
//! `PoolState` owns every global number the ledger has to keep consistent:
//! how much principal the contract will still accept, how large a single
//! position may be, and how much of the reward pool is still unpaid. All
//! transitions are pure methods so they can be exercised without a host.

use soroban_sdk::{contracttype, log, symbol_short, Env, Symbol};

use crate::ContractError;

const POOL: Symbol = symbol_short!("POOL");

/// Number of decimals carried by `yield_rate` on top of its percentage.
pub const YIELD_DECIMALS: u32 = 4;

/// Divisor turning `amount * yield_rate` back into asset units
/// (`100 * 10^YIELD_DECIMALS`).
pub const YIELD_SCALE: i128 = 100 * 10i128.pow(YIELD_DECIMALS);

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Principal the contract will still accept. Never restored.
    pub remaining_capacity: i128,
    /// Rewards still reserved for future yields.
    pub remaining_reward_pool: i128,
    /// Largest position a single stake may open.
    pub user_stake_limit: i128,
    /// `reward_pool / capacity` scaled by [`YIELD_SCALE`], fixed at creation.
    pub yield_rate: u32,
    /// Seconds a position stays locked after its lock start.
    pub lock_duration: u64,
    /// Smallest accepted stake.
    pub min_stake: i128,
}

impl PoolState {
    /// Validates the construction parameters and derives the yield rate.
    pub fn new(
        capacity: i128,
        user_stake_limit: i128,
        reward_pool: i128,
        lock_duration: u64,
        min_stake: i128,
    ) -> Result<Self, ContractError> {
        if capacity <= 0 || user_stake_limit <= 0 || user_stake_limit > capacity {
            return Err(ContractError::InvalidStakeLimit);
        }
        if reward_pool < 0 {
            return Err(ContractError::InvalidRewardPool);
        }
        if min_stake <= 0 || min_stake > user_stake_limit {
            return Err(ContractError::InvalidMinimumStake);
        }

        let yield_rate = reward_pool
            .checked_mul(YIELD_SCALE)
            .map(|scaled| scaled / capacity)
            .ok_or(ContractError::YieldRateTooLarge)?;
        let yield_rate = u32::try_from(yield_rate).map_err(|_| ContractError::YieldRateTooLarge)?;

        Ok(Self {
            remaining_capacity: capacity,
            remaining_reward_pool: reward_pool,
            user_stake_limit,
            yield_rate,
            lock_duration,
            min_stake,
        })
    }

    /// Yield earned by `principal` at the pool's fixed rate, rounded down.
    pub fn yield_for(&self, principal: i128) -> Result<i128, ContractError> {
        principal
            .checked_mul(i128::from(self.yield_rate))
            .map(|scaled| scaled / YIELD_SCALE)
            .ok_or(ContractError::MathOverflow)
    }

    /// Rejects a stake the pool cannot take right now.
    pub fn check_stake(&self, env: &Env, amount: i128) -> Result<(), ContractError> {
        if amount < self.min_stake {
            log!(env, "stake too low", amount, self.min_stake);
            return Err(ContractError::StakeTooLow);
        }
        if amount > self.user_stake_limit || amount > self.remaining_capacity {
            log!(
                env,
                "stake too high",
                self.user_stake_limit,
                self.remaining_capacity
            );
            return Err(ContractError::StakeTooHigh);
        }
        Ok(())
    }

    /// Retires `amount` of capacity after a successful stake.
    ///
    /// Once the remaining capacity drops under the per-user limit the limit
    /// is clamped to it and the reward pool is recomputed from the fixed
    /// rate, so the pool never promises more than the capacity left can earn.
    ///
    /// Returns the `(remaining_capacity, remaining_reward_pool)` pair that is
    /// published after every stake.
    pub fn consume(&mut self, amount: i128) -> Result<(i128, i128), ContractError> {
        let remaining = self
            .remaining_capacity
            .checked_sub(amount)
            .filter(|remaining| *remaining >= 0)
            .ok_or(ContractError::MathOverflow)?;
        self.remaining_capacity = remaining;

        if self.remaining_capacity < self.user_stake_limit {
            self.user_stake_limit = self.remaining_capacity;
            self.remaining_reward_pool = self.yield_for(self.remaining_capacity)?;
        }

        Ok((self.remaining_capacity, self.remaining_reward_pool))
    }

    /// Computes the yield owed on `principal` and draws it from the pool.
    ///
    /// Capacity is not given back. The pool bottoms out at zero: a rebalance
    /// only reserves what the unallocated capacity could earn, so positions
    /// opened before it may be owed more than the recomputed figure.
    pub fn settle(&mut self, principal: i128) -> Result<i128, ContractError> {
        let owed = self.yield_for(principal)?;
        self.remaining_reward_pool = self.remaining_reward_pool.saturating_sub(owed).max(0);
        Ok(owed)
    }

    /// Timestamp from which a position started at `lock_start` may withdraw.
    pub fn unlock_time(&self, lock_start: u64) -> u64 {
        lock_start.saturating_add(self.lock_duration)
    }
}

// ── Storage ─────────────────────────────────────────────────────────────────

pub fn load(env: &Env) -> Result<PoolState, ContractError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
}
