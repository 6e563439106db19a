#![no_std]

#[cfg(test)]
extern crate std;

pub mod depositor;
pub mod events;
pub mod pool;
pub mod rewards;
pub mod vault;

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

use depositor::{DepositorRecord, Withdrawal};
use pool::{PoolConfig, PoolState};
use vault::Vault;

// ── Storage key constants ────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const POOL: Symbol = symbol_short!("POOL");

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_TTL_EXTEND_TO: u32 = 30 * DAY_IN_LEDGERS;
const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_EXTEND_TO - DAY_IN_LEDGERS;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    /// Outside the block window allowed for the operation ("BN").
    BlockNumber = 4,
    /// Zero deposit, or deposit above the pool cap ("DA").
    DepositAmount = 5,
    /// Operation not allowed in the current reward state ("SV").
    StateViolation = 6,
    /// Nothing to withdraw or remove ("ZA").
    ZeroAmount = 7,
    InvalidConfig = 8,
    InsufficientBalance = 9,
    MathOverflow = 10,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct BlockStakingContract;

#[contractimpl]
impl BlockStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Create the pool. Callable exactly once.
    ///
    /// The staking window is `[config.from_block, config.to_block)` in ledger
    /// sequence numbers.
    pub fn initialize(env: Env, owner: Address, config: PoolConfig) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        config.validate()?;

        let pool = PoolState::new(&config);

        env.storage().instance().set(&OWNER, &owner);
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&INITIALIZED, &true);
        Self::save_pool(&env, &pool);

        events::publish_initialized(
            &env,
            owner,
            config.deposit_token,
            config.reward_token,
            config.from_block,
            config.to_block,
            config.maximum_total_deposit,
        );

        Ok(())
    }

    // ── Depositor operations ────────────────────────────────────────────────

    /// Lock `amount` deposit tokens until the window closes.
    ///
    /// Reward accrued on the depositor's existing amount is settled before
    /// the new amount is added. The first deposit into an empty pool spreads
    /// the unallocated reward over the blocks still left.
    pub fn deposit(env: Env, depositor: Address, amount: i128) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        depositor.require_auth();

        let now = env.ledger().sequence();
        let mut pool = Self::load_pool(&env)?;
        let mut record = depositor::load(&env, &depositor);

        let was_empty = pool.total_deposit == 0;
        record.deposit(&mut pool, amount, now)?;

        if was_empty {
            let balance = Vault::new(&env, &config.reward_token).balance();
            let available = pool.unallocated(balance)?;
            pool.restart_emission(available, now)?;
        }

        Vault::new(&env, &config.deposit_token).transfer_in(&depositor, amount)?;

        depositor::store(&env, &depositor, &record);
        Self::save_pool(&env, &pool);

        events::publish_deposited(&env, depositor, amount, pool.total_deposit, now);

        Ok(())
    }

    /// Return the full deposit and all accrued reward. Only after the window.
    pub fn withdraw(env: Env, depositor: Address) -> Result<Withdrawal, ContractError> {
        let config = Self::load_config(&env)?;
        depositor.require_auth();

        let now = env.ledger().sequence();
        let mut pool = Self::load_pool(&env)?;
        let mut record = depositor::load(&env, &depositor);

        let withdrawal = record.withdraw(&mut pool, now)?;

        let reward_vault = Vault::new(&env, &config.reward_token);
        let deposit_vault = Vault::new(&env, &config.deposit_token);
        reward_vault.require_reserve(withdrawal.reward)?;
        deposit_vault.require_reserve(withdrawal.deposit)?;

        depositor::store(&env, &depositor, &record);
        Self::save_pool(&env, &pool);

        reward_vault.transfer_out(&depositor, withdrawal.reward)?;
        deposit_vault.transfer_out(&depositor, withdrawal.deposit)?;

        events::publish_withdrawn(
            &env,
            depositor,
            withdrawal.deposit,
            withdrawal.reward,
            pool.total_deposit,
        );

        Ok(withdrawal)
    }

    // ── Owner operations ────────────────────────────────────────────────────

    /// Turn the reward tokens already sent to the contract into a per-block
    /// rate for the rest of the window. Returns the new rate, scaled by
    /// `rewards::PRECISION`.
    pub fn add_reward(env: Env, caller: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        Self::require_owner(&env, &caller)?;

        let now = env.ledger().sequence();
        let mut pool = Self::load_pool(&env)?;
        pool.refresh(now)?;

        let available = pool.unallocated(Vault::new(&env, &config.reward_token).balance())?;
        let rate = pool.load_reward(available, now)?;

        Self::save_pool(&env, &pool);

        events::publish_reward_added(&env, rate, available, now);

        Ok(rate)
    }

    /// Spread reward tokens sent after `add_reward` over the blocks that are
    /// left. Blocks already elapsed keep the rate they accrued at.
    pub fn top_up_reward(env: Env, caller: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        Self::require_owner(&env, &caller)?;

        let now = env.ledger().sequence();
        let mut pool = Self::load_pool(&env)?;
        pool.refresh(now)?;

        let available = pool.unallocated(Vault::new(&env, &config.reward_token).balance())?;
        let rate = pool.top_up_reward(available, now)?;

        Self::save_pool(&env, &pool);

        events::publish_reward_topped_up(&env, rate, available, now);

        Ok(rate)
    }

    /// Send reward tokens nobody is entitled to back to the owner once the
    /// window is over, and clear the rate.
    pub fn remove_reward(env: Env, caller: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let owner = Self::require_owner(&env, &caller)?;

        let now = env.ledger().sequence();
        let mut pool = Self::load_pool(&env)?;
        pool.refresh(now)?;

        let vault = Vault::new(&env, &config.reward_token);
        let amount = pool.remove_reward(vault.balance(), now)?;

        Self::save_pool(&env, &pool);
        vault.transfer_out(&owner, amount)?;

        events::publish_reward_removed(&env, owner, amount);

        Ok(amount)
    }

    /// Hand the owner role to `new_owner`, effective immediately.
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let previous_owner = Self::require_owner(&env, &caller)?;

        env.storage().instance().set(&OWNER, &new_owner);
        Self::extend_instance_ttl(&env);

        events::publish_ownership_transferred(&env, previous_owner, new_owner);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `depositor` would receive if the pool were refreshed now.
    pub fn depositor_reward(env: Env, depositor: Address) -> Result<i128, ContractError> {
        let pool = Self::load_pool(&env)?;
        let accrual = pool.accrual_at(env.ledger().sequence())?;
        depositor::load(&env, &depositor).pending_reward(accrual.reward_per_share)
    }

    /// Stored position of `depositor`: amount, reward debt and snapshot.
    pub fn deposits(env: Env, depositor: Address) -> Result<DepositorRecord, ContractError> {
        Self::require_initialized(&env)?;
        Ok(depositor::load(&env, &depositor))
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn pool_config(env: Env) -> Result<PoolConfig, ContractError> {
        Self::load_config(&env)
    }

    /// Stored pool state, as of the last state-changing call.
    pub fn pool_state(env: Env) -> Result<PoolState, ContractError> {
        Self::load_pool(&env)
    }

    pub fn deposit_token(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.deposit_token)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.reward_token)
    }

    pub fn from_block(env: Env) -> Result<u32, ContractError> {
        Ok(Self::load_config(&env)?.from_block)
    }

    pub fn to_block(env: Env) -> Result<u32, ContractError> {
        Ok(Self::load_config(&env)?.to_block)
    }

    pub fn maximum_total_deposit(env: Env) -> Result<i128, ContractError> {
        Ok(Self::load_config(&env)?.maximum_total_deposit)
    }

    pub fn total_deposit(env: Env) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env)?.total_deposit)
    }

    /// Current rate, scaled by `rewards::PRECISION`.
    pub fn reward_per_block(env: Env) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env)?.reward_per_block)
    }

    pub fn cumulative_reward_per_share(env: Env) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env)?.cumulative_reward_per_share)
    }

    pub fn cumulative_reward_block_number(env: Env) -> Result<u32, ContractError> {
        Ok(Self::load_pool(&env)?.cumulative_reward_block_number)
    }

    /// Reward emitted into the accumulator so far, in whole tokens.
    pub fn cumulative_reward(env: Env) -> Result<i128, ContractError> {
        Ok(rewards::to_tokens_floor(
            Self::load_pool(&env)?.cumulative_reward,
        ))
    }

    pub fn distributed_reward(env: Env) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env)?.distributed_reward)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Authenticate `caller` and check it holds the owner role. Returns the
    /// owner address.
    fn require_owner(env: &Env, caller: &Address) -> Result<Address, ContractError> {
        caller.require_auth();
        let owner: Address = env
            .storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(owner)
    }

    fn load_config(env: &Env) -> Result<PoolConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_pool(env: &Env) -> Result<PoolState, ContractError> {
        env.storage()
            .instance()
            .get(&POOL)
            .ok_or(ContractError::NotInitialized)
    }

    fn save_pool(env: &Env, pool: &PoolState) {
        env.storage().instance().set(&POOL, pool);
        Self::extend_instance_ttl(env);
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
