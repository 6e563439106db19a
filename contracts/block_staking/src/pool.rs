use soroban_sdk::{contracttype, Address};

use crate::rewards;
use crate::ContractError;

// ── Types ───────────────────────────────────────────────────────────────────

/// Immutable pool parameters supplied once at `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Token locked by depositors.
    pub deposit_token: Address,
    /// Token paid out as reward.
    pub reward_token: Address,
    /// First ledger sequence at which deposits are accepted (inclusive).
    pub from_block: u32,
    /// Ledger sequence at which the window closes (exclusive).
    pub to_block: u32,
    /// Hard cap on the sum of all deposits.
    pub maximum_total_deposit: i128,
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.to_block <= self.from_block {
            return Err(ContractError::InvalidConfig);
        }
        if self.maximum_total_deposit <= 0 {
            return Err(ContractError::InvalidConfig);
        }
        if self.deposit_token == self.reward_token {
            return Err(ContractError::InvalidConfig);
        }
        Ok(())
    }
}

/// Mutable accounting state of the pool.
///
/// `reward_per_block`, `cumulative_reward_per_share` and `cumulative_reward`
/// are scaled by [`rewards::PRECISION`].
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolState {
    pub from_block: u32,
    pub to_block: u32,
    pub maximum_total_deposit: i128,
    pub total_deposit: i128,
    pub reward_per_block: i128,
    pub cumulative_reward_per_share: i128,
    /// Block as of which `cumulative_reward_per_share` is valid.
    /// Always within `[from_block, to_block]`.
    pub cumulative_reward_block_number: u32,
    /// Reward emitted into the accumulator so far.
    pub cumulative_reward: i128,
    /// Reward tokens paid out to depositors so far.
    pub distributed_reward: i128,
}

/// Accumulator values projected to a given block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Accrual {
    pub block: u32,
    pub reward_per_share: i128,
    pub cumulative_reward: i128,
}

impl PoolState {
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            from_block: config.from_block,
            to_block: config.to_block,
            maximum_total_deposit: config.maximum_total_deposit,
            cumulative_reward_block_number: config.from_block,
            ..Self::default()
        }
    }

    // ── Refresh ─────────────────────────────────────────────────────────────

    /// Project the accumulator to `current_block` without touching `self`.
    ///
    /// The target block is clamped to the window end and never moves behind
    /// the last refresh, so calls before `from_block` or repeated calls in
    /// the same block are no-ops.
    pub fn accrual_at(&self, current_block: u32) -> Result<Accrual, ContractError> {
        let block = current_block
            .min(self.to_block)
            .max(self.cumulative_reward_block_number);
        let elapsed = block - self.cumulative_reward_block_number;

        if elapsed == 0 || self.total_deposit <= 0 || self.reward_per_block == 0 {
            return Ok(Accrual {
                block,
                reward_per_share: self.cumulative_reward_per_share,
                cumulative_reward: self.cumulative_reward,
            });
        }

        let reward_per_share = rewards::accumulate(
            self.cumulative_reward_per_share,
            self.reward_per_block,
            elapsed,
            self.total_deposit,
        )?;
        let cumulative_reward = self
            .cumulative_reward
            .checked_add(rewards::emitted(self.reward_per_block, elapsed)?)
            .ok_or(ContractError::MathOverflow)?;

        Ok(Accrual {
            block,
            reward_per_share,
            cumulative_reward,
        })
    }

    /// Advance the accumulator to `current_block`.
    ///
    /// Every state-changing operation calls this before reading any reward
    /// value. It shares `accrual_at` with the read-only queries so both paths
    /// produce identical numbers.
    pub fn refresh(&mut self, current_block: u32) -> Result<(), ContractError> {
        let accrual = self.accrual_at(current_block)?;
        self.cumulative_reward_per_share = accrual.reward_per_share;
        self.cumulative_reward = accrual.cumulative_reward;
        self.cumulative_reward_block_number = accrual.block;
        Ok(())
    }

    // ── Reward loading ──────────────────────────────────────────────────────

    /// Blocks left in which reward can still accrue.
    pub fn remaining_blocks(&self, current_block: u32) -> u32 {
        self.to_block
            .saturating_sub(current_block.max(self.from_block))
    }

    /// Reward tokens emitted but not yet paid out.
    ///
    /// Rounded up so that any amount computed from it as "free" can never
    /// eat into a depositor's entitlement. Once nobody has anything staked
    /// nobody can claim anything either, and the figure drops to zero.
    pub fn owed_reward(&self) -> Result<i128, ContractError> {
        if self.total_deposit <= 0 {
            return Ok(0);
        }
        let emitted = rewards::to_tokens_ceil(self.cumulative_reward)?;
        Ok(emitted
            .checked_sub(self.distributed_reward)
            .ok_or(ContractError::MathOverflow)?
            .max(0))
    }

    /// Part of `balance` not reserved for depositors.
    pub fn unallocated(&self, balance: i128) -> Result<i128, ContractError> {
        Ok(balance
            .checked_sub(self.owed_reward()?)
            .ok_or(ContractError::MathOverflow)?
            .max(0))
    }

    /// Set the rate from `available` reward tokens for the rest of the window.
    ///
    /// Expects the accumulator to be refreshed to `current_block` already.
    pub fn load_reward(
        &mut self,
        available: i128,
        current_block: u32,
    ) -> Result<i128, ContractError> {
        if self.reward_per_block != 0 {
            return Err(ContractError::StateViolation);
        }

        let blocks = self.remaining_blocks(current_block);
        if blocks == 0 {
            return Err(ContractError::BlockNumber);
        }

        let rate = rewards::reward_per_block(available, blocks)?;
        if rate == 0 {
            return Err(ContractError::StateViolation);
        }

        self.reward_per_block = rate;
        Ok(rate)
    }

    /// Re-spread the unallocated balance over the remaining blocks while a
    /// rate is active. Fails unless the new rate is strictly higher.
    pub fn top_up_reward(
        &mut self,
        available: i128,
        current_block: u32,
    ) -> Result<i128, ContractError> {
        if self.reward_per_block == 0 {
            return Err(ContractError::StateViolation);
        }

        let blocks = self.remaining_blocks(current_block);
        if blocks == 0 {
            return Err(ContractError::BlockNumber);
        }

        let rate = rewards::reward_per_block(available, blocks)?;
        if rate <= self.reward_per_block {
            return Err(ContractError::StateViolation);
        }

        self.reward_per_block = rate;
        Ok(rate)
    }

    /// Spread `available` over the blocks left when the first depositor
    /// arrives in an empty pool. Nothing is emitted while nothing is staked,
    /// so the share of the blocks that went by moves onto the ones remaining.
    /// The rate never drops.
    ///
    /// Expects the accumulator to be refreshed to `current_block` already.
    pub fn restart_emission(
        &mut self,
        available: i128,
        current_block: u32,
    ) -> Result<i128, ContractError> {
        let blocks = self.remaining_blocks(current_block);
        if blocks == 0 {
            return Err(ContractError::BlockNumber);
        }

        let rate = rewards::reward_per_block(available, blocks)?;
        if rate > self.reward_per_block {
            self.reward_per_block = rate;
        }
        Ok(self.reward_per_block)
    }

    /// Release whatever reward is not owed to depositors once the window is
    /// over, clearing the rate. Returns the amount to send to the owner.
    pub fn remove_reward(
        &mut self,
        balance: i128,
        current_block: u32,
    ) -> Result<i128, ContractError> {
        if current_block < self.to_block {
            return Err(ContractError::BlockNumber);
        }

        let removable = self.unallocated(balance)?;
        if removable <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        self.reward_per_block = 0;
        Ok(removable)
    }

    // ── Deposit bookkeeping ─────────────────────────────────────────────────

    /// Deposit preconditions, in the order they are reported.
    pub fn check_deposit(&self, amount: i128, current_block: u32) -> Result<(), ContractError> {
        if current_block < self.from_block {
            return Err(ContractError::BlockNumber);
        }
        if self.reward_per_block == 0 {
            return Err(ContractError::StateViolation);
        }
        if amount <= 0 {
            return Err(ContractError::DepositAmount);
        }
        let next = self
            .total_deposit
            .checked_add(amount)
            .ok_or(ContractError::DepositAmount)?;
        if next > self.maximum_total_deposit {
            return Err(ContractError::DepositAmount);
        }
        if current_block >= self.to_block {
            return Err(ContractError::BlockNumber);
        }
        Ok(())
    }

    pub fn check_withdraw(&self, current_block: u32) -> Result<(), ContractError> {
        if current_block < self.to_block {
            return Err(ContractError::BlockNumber);
        }
        Ok(())
    }
}
