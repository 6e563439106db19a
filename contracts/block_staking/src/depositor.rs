use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::pool::PoolState;
use crate::rewards;
use crate::ContractError;

// ── Storage ─────────────────────────────────────────────────────────────────

const DEPOSIT: Symbol = symbol_short!("DEPOSIT");
const RECORD_TTL_THRESHOLD: u32 = 518_400; // ~30 days
const RECORD_TTL_EXTEND_TO: u32 = 1_036_800; // ~60 days

// ── Types ───────────────────────────────────────────────────────────────────

/// A depositor's position.
///
/// Created on the first deposit and never removed; a full withdrawal zeroes
/// `amount` and `reward_debt` but leaves the last snapshot in place.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DepositorRecord {
    /// Deposit tokens currently locked.
    pub amount: i128,
    /// Reward already credited as of the last snapshot.
    pub reward_debt: i128,
    /// `cumulative_reward_per_share` at the last deposit or withdrawal.
    pub accumulator_snapshot: i128,
}

/// Tokens released by a withdrawal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub deposit: i128,
    pub reward: i128,
}

impl DepositorRecord {
    /// Reward owed against an accumulator value of `reward_per_share`.
    pub fn pending_reward(&self, reward_per_share: i128) -> Result<i128, ContractError> {
        rewards::pending(
            self.amount,
            reward_per_share,
            self.accumulator_snapshot,
            self.reward_debt,
        )
    }

    /// Fold everything accrued on the current amount into `reward_debt` and
    /// move the snapshot forward.
    ///
    /// Must run before `amount` changes, otherwise the new amount would earn
    /// for blocks it was not staked.
    pub fn settle(&mut self, reward_per_share: i128) -> Result<(), ContractError> {
        self.reward_debt = self.pending_reward(reward_per_share)?;
        self.accumulator_snapshot = reward_per_share;
        Ok(())
    }

    /// Apply a deposit against `pool`.
    ///
    /// `pool` is refreshed and validated first. On error both values may be
    /// partially updated and must be discarded.
    pub fn deposit(
        &mut self,
        pool: &mut PoolState,
        amount: i128,
        current_block: u32,
    ) -> Result<(), ContractError> {
        pool.refresh(current_block)?;
        pool.check_deposit(amount, current_block)?;

        self.settle(pool.cumulative_reward_per_share)?;
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        pool.total_deposit = pool
            .total_deposit
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;

        Ok(())
    }

    /// Close out the position after the window.
    ///
    /// Same discard-on-error contract as [`DepositorRecord::deposit`].
    pub fn withdraw(
        &mut self,
        pool: &mut PoolState,
        current_block: u32,
    ) -> Result<Withdrawal, ContractError> {
        pool.refresh(current_block)?;
        pool.check_withdraw(current_block)?;
        if self.amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        self.settle(pool.cumulative_reward_per_share)?;
        let withdrawal = Withdrawal {
            deposit: self.amount,
            reward: self.reward_debt,
        };
        self.amount = 0;
        self.reward_debt = 0;

        pool.total_deposit = pool
            .total_deposit
            .checked_sub(withdrawal.deposit)
            .ok_or(ContractError::MathOverflow)?;
        pool.distributed_reward = pool
            .distributed_reward
            .checked_add(withdrawal.reward)
            .ok_or(ContractError::MathOverflow)?;

        Ok(withdrawal)
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn record_key(depositor: &Address) -> (Symbol, Address) {
    (DEPOSIT, depositor.clone())
}

/// Load a depositor's record, or an empty one if they never deposited.
pub fn load(env: &Env, depositor: &Address) -> DepositorRecord {
    env.storage()
        .persistent()
        .get(&record_key(depositor))
        .unwrap_or_default()
}

/// Persist a depositor's record and keep it alive.
pub fn store(env: &Env, depositor: &Address, record: &DepositorRecord) {
    let key = record_key(depositor);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND_TO);
}
