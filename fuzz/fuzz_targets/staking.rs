#![no_main]

use arbitrary::Arbitrary;
use block_staking::pool::PoolConfig;
use block_staking::{BlockStakingContract, BlockStakingContractClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{token, Address, Env};

const FROM: u32 = 10;
const DEPOSITORS: usize = 3;
const STARTING_BALANCE: i128 = 100_000;
const MAX_ACTIONS: usize = 64;

#[derive(Arbitrary, Debug)]
enum Action {
    Deposit { who: u8, amount: u16 },
    Withdraw { who: u8 },
    Advance { blocks: u8 },
    TopUp { amount: u16 },
    RemoveReward,
}

#[derive(Arbitrary, Debug)]
struct Input {
    window: u16,
    reward: u32,
    actions: Vec<Action>,
}

fuzz_target!(|input: Input| {
    let window = u32::from(input.window.max(1));
    let to_block = FROM + window;
    let reward = i128::from(input.reward.max(1));

    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(FROM);

    let token_admin = Address::generate(&env);
    let deposit_sac = env.register_stellar_asset_contract_v2(token_admin.clone());
    let reward_sac = env.register_stellar_asset_contract_v2(token_admin);
    let deposit_admin = token::StellarAssetClient::new(&env, &deposit_sac.address());
    let reward_admin = token::StellarAssetClient::new(&env, &reward_sac.address());
    let reward_token = token::Client::new(&env, &reward_sac.address());

    let contract_id = env.register(BlockStakingContract, ());
    let client = BlockStakingContractClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    client.initialize(
        &owner,
        &PoolConfig {
            deposit_token: deposit_sac.address(),
            reward_token: reward_sac.address(),
            from_block: FROM,
            to_block,
            maximum_total_deposit: STARTING_BALANCE,
        },
    );

    let depositors: Vec<Address> = (0..DEPOSITORS)
        .map(|_| {
            let depositor = Address::generate(&env);
            deposit_admin.mint(&depositor, &STARTING_BALANCE);
            depositor
        })
        .collect();

    reward_admin.mint(&contract_id, &reward);
    if client.try_add_reward(&owner).is_err() {
        return;
    }

    let mut funded = reward;
    let mut block = FROM;
    let mut last_rps = client.cumulative_reward_per_share();
    let mut last_block = client.cumulative_reward_block_number();

    for action in input.actions.iter().take(MAX_ACTIONS) {
        match *action {
            Action::Deposit { who, amount } => {
                let depositor = &depositors[usize::from(who) % DEPOSITORS];
                let _ = client.try_deposit(depositor, &i128::from(amount));
            }
            Action::Withdraw { who } => {
                let depositor = &depositors[usize::from(who) % DEPOSITORS];
                let _ = client.try_withdraw(depositor);
            }
            Action::Advance { blocks } => {
                block += u32::from(blocks);
                env.ledger().set_sequence_number(block);
            }
            Action::TopUp { amount } => {
                if amount > 0 {
                    reward_admin.mint(&contract_id, &i128::from(amount));
                    funded += i128::from(amount);
                }
                let _ = client.try_top_up_reward(&owner);
            }
            Action::RemoveReward => {
                let _ = client.try_remove_reward(&owner);
            }
        }

        let rps = client.cumulative_reward_per_share();
        let crbn = client.cumulative_reward_block_number();
        assert!(rps >= last_rps, "accumulator decreased");
        assert!(crbn >= last_block, "accumulator block decreased");
        assert!(crbn >= FROM && crbn <= to_block, "accumulator block left window");
        last_rps = rps;
        last_block = crbn;

        let staked: i128 = depositors.iter().map(|d| client.deposits(d).amount).sum();
        assert_eq!(staked, client.total_deposit());

        let paid: i128 = depositors.iter().map(|d| reward_token.balance(d)).sum();
        assert_eq!(paid, client.distributed_reward());
        assert!(paid <= funded, "paid out more reward than was loaded");
    }
});
