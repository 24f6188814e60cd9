#![no_std]

//! Bounded-capacity, fixed-term staking ledger.
//!
//! Accounts deposit the configured asset and receive a position that can only
//! move whole. After the lock duration a position settles for its principal
//! plus a yield drawn at a fixed rate from a reward pool that shrinks with the
//! capacity left to allocate.

pub mod asset;
pub mod events;
pub mod pool;
pub mod position;
pub mod transfer;

use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, String, Symbol};

pub use pool::{PoolState, YIELD_DECIMALS, YIELD_SCALE};
pub use position::Position;
pub use transfer::Allowance;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const ASSET: Symbol = symbol_short!("ASSET");
const DECIMALS: Symbol = symbol_short!("DECIMALS");

const INSTANCE_TTL_THRESHOLD: u32 = 5184000;
const INSTANCE_TTL_EXTEND_TO: u32 = 10368000;

const POSITION_NAME: &str = "StakedToken";
const POSITION_SYMBOL: &str = "STKN";

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidStakeLimit = 3,
    YieldRateTooLarge = 4,
    InvalidRewardPool = 5,
    InvalidMinimumStake = 6,
    AlreadyStaked = 7,
    StakeTooLow = 8,
    StakeTooHigh = 9,
    AssetTransferFailed = 10,
    NoPosition = 11,
    StillLocked = 12,
    AmountBelowPosition = 13,
    AllowanceMismatch = 14,
    SelfTransfer = 15,
    MathOverflow = 16,
    InvalidAsset = 17,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `asset`            – token contract the positions are denominated in.
    /// * `lock_duration`    – seconds a position stays locked after staking.
    /// * `reward_pool`      – asset amount reserved for yields. The contract
    ///                        must be funded with it separately.
    /// * `capacity`         – total principal the contract will ever accept.
    /// * `user_stake_limit` – largest single position.
    /// * `min_stake`        – smallest accepted stake.
    pub fn initialize(
        env: Env,
        asset: Address,
        lock_duration: u64,
        reward_pool: i128,
        capacity: i128,
        user_stake_limit: i128,
        min_stake: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        let pool = PoolState::new(
            capacity,
            user_stake_limit,
            reward_pool,
            lock_duration,
            min_stake,
        )?;
        let decimals = asset::decimals(&env, &asset).ok_or(ContractError::InvalidAsset)?;

        env.storage().instance().set(&ASSET, &asset);
        env.storage().instance().set(&DECIMALS, &decimals);
        env.storage().instance().set(&INITIALIZED, &true);
        pool::store(&env, &pool);
        Self::extend_instance_ttl(&env);

        events::publish_initialized(
            &env,
            asset,
            lock_duration,
            reward_pool,
            capacity,
            user_stake_limit,
            min_stake,
            pool.yield_rate,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Open a position of `amount` for `staker`.
    ///
    /// The deposit is pulled from the staker before anything is recorded, so
    /// a failed asset transfer leaves the ledger untouched.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if !position::get(&env, &staker).is_empty() {
            return Err(ContractError::AlreadyStaked);
        }

        let mut pool = pool::load(&env)?;
        pool.check_stake(&env, amount)?;

        // 1. Pull the principal into custody.
        let asset = Self::asset(&env)?;
        if !asset::transfer(
            &env,
            &asset,
            &staker,
            &env.current_contract_address(),
            amount,
        ) {
            return Err(ContractError::AssetTransferFailed);
        }

        // 2. Retire the capacity, rebalancing the pool if it crossed the limit.
        let (remaining_capacity, remaining_reward_pool) = pool.consume(amount)?;

        // 3. Record the position and the new pool figures.
        let opened = Position {
            amount,
            lock_start: env.ledger().timestamp(),
        };
        position::set(&env, &staker, &opened);
        pool::store(&env, &pool);
        Self::extend_instance_ttl(&env);

        events::publish_staked(&env, staker, amount);
        events::publish_stake_limits_updated(&env, remaining_capacity, remaining_reward_pool);

        Ok(())
    }

    /// Settle `staker`'s position once its lock has expired.
    ///
    /// Pays principal plus yield and returns the total. The payment is made
    /// before the position is cleared; if the asset contract refuses it the
    /// position and pool stay as they were.
    pub fn withdraw(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let current = position::get(&env, &staker);
        if current.is_empty() {
            return Err(ContractError::NoPosition);
        }

        let mut pool = pool::load(&env)?;
        let unlock_at = pool.unlock_time(current.lock_start);
        if env.ledger().timestamp() < unlock_at {
            log!(&env, "position still locked", unlock_at);
            return Err(ContractError::StillLocked);
        }

        let owed = pool.settle(current.amount)?;
        let total_paid = current
            .amount
            .checked_add(owed)
            .ok_or(ContractError::MathOverflow)?;

        let asset = Self::asset(&env)?;
        if !asset::transfer(
            &env,
            &asset,
            &env.current_contract_address(),
            &staker,
            total_paid,
        ) {
            return Err(ContractError::AssetTransferFailed);
        }

        pool::store(&env, &pool);
        position::clear(&env, &staker);
        transfer::revoke_all(&env, &staker);
        Self::extend_instance_ttl(&env);

        events::publish_withdrawn(&env, staker, total_paid);
        events::publish_stake_limits_updated(
            &env,
            pool.remaining_capacity,
            pool.remaining_reward_pool,
        );

        Ok(total_paid)
    }

    // ── Position transfers ──────────────────────────────────────────────────

    /// Move `from`'s whole position to `to`. `amount` must equal it exactly.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        from.require_auth();

        let outgoing = transfer::whole_position(&env, &from, amount)?;
        transfer::deliver(&env, &from, &to, outgoing)
    }

    /// Move `from`'s whole position to `to` without naming the amount.
    /// Returns the amount moved.
    pub fn transfer_position(env: Env, from: Address, to: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        from.require_auth();

        let outgoing = position::get(&env, &from);
        if outgoing.is_empty() {
            return Err(ContractError::NoPosition);
        }
        let amount = outgoing.amount;
        transfer::deliver(&env, &from, &to, outgoing)?;
        Ok(amount)
    }

    /// Let `spender` move `owner`'s current position once.
    pub fn approve(
        env: Env,
        owner: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();

        let current = transfer::whole_position(&env, &owner, amount)?;
        let granted = transfer::allowance_for(&env, &owner, &current);
        transfer::set_allowance(&env, &owner, &spender, &granted);

        events::publish_approval(&env, owner, spender, amount);

        Ok(())
    }

    /// Move `from`'s whole position to `to` on behalf of an approved `spender`.
    /// The allowance is consumed.
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        spender.require_auth();

        let outgoing = transfer::whole_position(&env, &from, amount)?;
        transfer::check_allowance(&env, &from, &spender, &outgoing)?;
        transfer::deliver(&env, &from, &to, outgoing)?;
        transfer::clear_allowance(&env, &from, &spender);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Return the account's position (zeroed if it holds none).
    pub fn get_position(env: Env, account: Address) -> Position {
        position::get(&env, &account)
    }

    /// Return the account's position amount.
    pub fn balance(env: Env, account: Address) -> i128 {
        position::get(&env, &account).amount
    }

    /// Return the lock start of the account's position (0 if it holds none).
    pub fn lock_start(env: Env, account: Address) -> u64 {
        position::get(&env, &account).lock_start
    }

    /// Return the timestamp from which the account may withdraw.
    pub fn unlock_time(env: Env, account: Address) -> Result<u64, ContractError> {
        let current = position::get(&env, &account);
        if current.is_empty() {
            return Err(ContractError::NoPosition);
        }
        Ok(pool::load(&env)?.unlock_time(current.lock_start))
    }

    /// Return what `spender` may move for `owner`: the owner's position
    /// amount while the approval still refers to that position, otherwise 0.
    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        let current = position::get(&env, &owner);
        if current.is_empty() {
            return 0;
        }
        match transfer::check_allowance(&env, &owner, &spender, &current) {
            Ok(()) => current.amount,
            Err(_) => 0,
        }
    }

    pub fn get_pool(env: Env) -> Result<PoolState, ContractError> {
        pool::load(&env)
    }

    pub fn get_remaining_capacity(env: Env) -> Result<i128, ContractError> {
        Ok(pool::load(&env)?.remaining_capacity)
    }

    pub fn get_user_stake_limit(env: Env) -> Result<i128, ContractError> {
        Ok(pool::load(&env)?.user_stake_limit)
    }

    pub fn get_remaining_reward_pool(env: Env) -> Result<i128, ContractError> {
        Ok(pool::load(&env)?.remaining_reward_pool)
    }

    /// Return the fixed yield rate, scaled by `100 * 10^YIELD_DECIMALS`.
    pub fn get_yield_rate(env: Env) -> Result<u32, ContractError> {
        Ok(pool::load(&env)?.yield_rate)
    }

    pub fn get_yield_decimals(_env: Env) -> u32 {
        YIELD_DECIMALS
    }

    pub fn get_lock_duration(env: Env) -> Result<u64, ContractError> {
        Ok(pool::load(&env)?.lock_duration)
    }

    pub fn get_min_stake(env: Env) -> Result<i128, ContractError> {
        Ok(pool::load(&env)?.min_stake)
    }

    pub fn get_asset(env: Env) -> Result<Address, ContractError> {
        Self::asset(&env)
    }

    /// Return the asset balance held in custody by this contract.
    pub fn get_asset_balance(env: Env) -> Result<i128, ContractError> {
        let asset = Self::asset(&env)?;
        asset::balance_of(&env, &asset, &env.current_contract_address())
            .ok_or(ContractError::InvalidAsset)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Position token metadata ──────────────────────────────────────────────

    pub fn name(env: Env) -> String {
        String::from_str(&env, POSITION_NAME)
    }

    pub fn symbol(env: Env) -> String {
        String::from_str(&env, POSITION_SYMBOL)
    }

    /// Positions are denominated in the asset, so they share its decimals.
    pub fn decimals(env: Env) -> Result<u32, ContractError> {
        env.storage()
            .instance()
            .get(&DECIMALS)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn asset(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ASSET)
            .ok_or(ContractError::NotInitialized)
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
