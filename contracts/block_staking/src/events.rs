use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ── Payloads ────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub deposit_token: Address,
    pub reward_token: Address,
    pub from_block: u32,
    pub to_block: u32,
    pub maximum_total_deposit: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub depositor: Address,
    pub amount: i128,
    pub total_deposit: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub depositor: Address,
    pub deposit: i128,
    pub reward: i128,
    pub total_deposit: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub reward_per_block: i128,
    pub available: i128,
    pub block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRemovedEvent {
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    deposit_token: Address,
    reward_token: Address,
    from_block: u32,
    to_block: u32,
    maximum_total_deposit: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            deposit_token,
            reward_token,
            from_block,
            to_block,
            maximum_total_deposit,
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    depositor: Address,
    amount: i128,
    total_deposit: i128,
    block: u32,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), depositor.clone()),
        DepositedEvent {
            depositor,
            amount,
            total_deposit,
            block,
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    depositor: Address,
    deposit: i128,
    reward: i128,
    total_deposit: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), depositor.clone()),
        WithdrawnEvent {
            depositor,
            deposit,
            reward,
            total_deposit,
        },
    );
}

pub fn publish_reward_added(env: &Env, reward_per_block: i128, available: i128, block: u32) {
    env.events().publish(
        (symbol_short!("RWD_ADD"),),
        RewardRateSetEvent {
            reward_per_block,
            available,
            block,
        },
    );
}

pub fn publish_reward_topped_up(env: &Env, reward_per_block: i128, available: i128, block: u32) {
    env.events().publish(
        (symbol_short!("RWD_TOP"),),
        RewardRateSetEvent {
            reward_per_block,
            available,
            block,
        },
    );
}

pub fn publish_reward_removed(env: &Env, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_REM"), owner.clone()),
        RewardRemovedEvent { owner, amount },
    );
}

pub fn publish_ownership_transferred(env: &Env, previous_owner: Address, new_owner: Address) {
    env.events().publish(
        (
            symbol_short!("OWN_XFER"),
            previous_owner.clone(),
            new_owner.clone(),
        ),
        OwnershipTransferredEvent {
            previous_owner,
            new_owner,
        },
    );
}
