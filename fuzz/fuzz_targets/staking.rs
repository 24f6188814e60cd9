#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};
use staking::{StakingContract, StakingContractClient};

#[derive(Arbitrary, Debug)]
pub struct FuzzConfig {
    reward_pool: u32,
    capacity: u32,
    user_stake_limit: u32,
    min_stake: u16,
    lock_duration: u32,
}

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { who: u8, amount: u64 },
    Withdraw { who: u8 },
    Transfer { from: u8, to: u8, amount: u64 },
    TransferPosition { from: u8, to: u8 },
    Approve { owner: u8, spender: u8, amount: u64 },
    TransferFrom { spender: u8, from: u8, to: u8, amount: u64 },
    AdvanceTime { seconds: u32 },
}

fuzz_target!(|input: (FuzzConfig, Vec<FuzzAction>)| {
    let (config, actions) = input;
    let env = Env::default();
    env.mock_all_auths();

    let asset = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let reward_pool = i128::from(config.reward_pool);
    let capacity = i128::from(config.capacity);
    if client
        .try_initialize(
            &asset,
            &u64::from(config.lock_duration),
            &reward_pool,
            &capacity,
            &i128::from(config.user_stake_limit),
            &i128::from(config.min_stake),
        )
        .is_err()
    {
        return;
    }

    let minter = StellarAssetClient::new(&env, &asset);
    minter.mint(&contract_id, &reward_pool);
    let users: Vec<Address> = (0..4)
        .map(|_| {
            let user = Address::generate(&env);
            minter.mint(&user, &(i128::from(u64::MAX)));
            user
        })
        .collect();
    let user = |index: u8| &users[index as usize % users.len()];

    for action in actions {
        match action {
            FuzzAction::Stake { who, amount } => {
                let _ = client.try_stake(user(who), &i128::from(amount));
            }
            FuzzAction::Withdraw { who } => {
                let _ = client.try_withdraw(user(who));
            }
            FuzzAction::Transfer { from, to, amount } => {
                let _ = client.try_transfer(user(from), user(to), &i128::from(amount));
            }
            FuzzAction::TransferPosition { from, to } => {
                let _ = client.try_transfer_position(user(from), user(to));
            }
            FuzzAction::Approve {
                owner,
                spender,
                amount,
            } => {
                let _ = client.try_approve(user(owner), user(spender), &i128::from(amount));
            }
            FuzzAction::TransferFrom {
                spender,
                from,
                to,
                amount,
            } => {
                let _ = client.try_transfer_from(
                    user(spender),
                    user(from),
                    user(to),
                    &i128::from(amount),
                );
            }
            FuzzAction::AdvanceTime { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(u64::from(seconds)));
            }
        }

        // Capacity only shrinks and the limit follows it down.
        let pool = client.get_pool();
        assert!(pool.remaining_capacity >= 0 && pool.remaining_capacity <= capacity);
        assert!(pool.user_stake_limit <= pool.remaining_capacity);
        assert!(pool.remaining_reward_pool >= 0);

        // Custody covers every open position.
        let open: i128 = users.iter().map(|u| client.balance(u)).sum();
        assert!(client.get_asset_balance() >= open);
    }
});
