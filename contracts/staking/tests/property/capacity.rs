#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the capacity and yield controller.
//!
//! Invariants tested:
//! - The yield rate is always `reward_pool * 100 * 10^4 / capacity`
//! - Remaining capacity never increases and drops by exactly each accepted stake
//! - The per-position limit never exceeds the remaining capacity
//! - Once the limit is clamped the pool equals the capacity's yield
//! - Every position opened against a funded pool can be settled in full

use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use staking::{ContractError, StakingContract, StakingContractClient, YIELD_SCALE};

const UNIT: i128 = 10_000_000;
const LOCK: u64 = 86_000;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn setup(
    reward_pool: i128,
    capacity: i128,
    user_stake_limit: i128,
) -> (Env, StakingContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let asset = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    client.initialize(
        &asset,
        &LOCK,
        &reward_pool,
        &capacity,
        &user_stake_limit,
        &1,
    );
    StellarAssetClient::new(&env, &asset).mint(&contract_id, &reward_pool);

    (env, client, asset)
}

fn funded(env: &Env, asset: &Address, amount: i128) -> Address {
    let account = Address::generate(env);
    StellarAssetClient::new(env, asset).mint(&account, &amount);
    account
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The fixed rate is the floored ratio of reward pool to capacity.
    #[test]
    fn prop_yield_rate_is_pool_over_capacity(
        reward in 1i128..=1_000i128,
        capacity in 1_000i128..=100_000i128,
    ) {
        let (_env, client, _asset) = setup(reward * UNIT, capacity * UNIT, capacity * UNIT);

        let expected = reward * UNIT * YIELD_SCALE / (capacity * UNIT);
        prop_assert_eq!(client.get_yield_rate() as i128, expected);
    }

    /// Stakes of random size against a small pool: capacity only moves down,
    /// and once it falls under the limit the pool tracks it exactly.
    #[test]
    fn prop_capacity_monotonic_and_pool_rebalanced(
        stakes in proptest::collection::vec(1i128..=150i128, 1..=15),
    ) {
        let (env, client, asset) = setup(100 * UNIT, 1_000 * UNIT, 100 * UNIT);
        let rate = client.get_yield_rate() as i128;

        for units in stakes {
            let amount = units * UNIT;
            let before = client.get_pool();
            let staker = funded(&env, &asset, amount);

            match client.try_stake(&staker, &amount) {
                Ok(Ok(())) => {
                    let after = client.get_pool();
                    prop_assert_eq!(after.remaining_capacity, before.remaining_capacity - amount);
                    if after.remaining_capacity < before.user_stake_limit {
                        prop_assert_eq!(after.user_stake_limit, after.remaining_capacity);
                        prop_assert_eq!(
                            after.remaining_reward_pool,
                            after.remaining_capacity * rate / YIELD_SCALE
                        );
                    } else {
                        prop_assert_eq!(after.user_stake_limit, before.user_stake_limit);
                        prop_assert_eq!(after.remaining_reward_pool, before.remaining_reward_pool);
                    }
                }
                Err(Ok(e)) => {
                    prop_assert_eq!(e, ContractError::StakeTooHigh);
                    prop_assert!(
                        amount > before.user_stake_limit || amount > before.remaining_capacity
                    );
                    prop_assert_eq!(client.get_pool(), before);
                }
                other => prop_assert!(false, "unexpected stake outcome: {:?}", other),
            }

            let now = client.get_pool();
            prop_assert!(now.remaining_capacity >= 0);
            prop_assert!(now.user_stake_limit <= now.remaining_capacity);
        }
    }

    /// Fill the capacity with random positions, then settle all of them: each
    /// pays principal plus its yield and custody never runs dry.
    #[test]
    fn prop_every_position_settles_in_full(
        stakes in proptest::collection::vec(1i128..=100i128, 1..=12),
    ) {
        let (env, client, asset) = setup(100 * UNIT, 1_000 * UNIT, 100 * UNIT);
        let rate = client.get_yield_rate() as i128;
        let token = TokenClient::new(&env, &asset);

        let mut opened = Vec::new();
        for units in stakes {
            let amount = units * UNIT;
            let staker = funded(&env, &asset, amount);
            if client.try_stake(&staker, &amount).is_ok() {
                opened.push((staker, amount));
            }
        }

        env.ledger().set_timestamp(LOCK);
        for (staker, amount) in opened {
            let paid = client.withdraw(&staker);
            prop_assert_eq!(paid, amount + amount * rate / YIELD_SCALE);
            prop_assert_eq!(token.balance(&staker), paid);
        }

        prop_assert!(client.get_asset_balance() >= 0);
        prop_assert!(client.get_remaining_reward_pool() >= 0);
    }
}
