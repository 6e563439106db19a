use crate::ContractError;

/// Fixed-point scaling factor.
///
/// Both `reward_per_block` and `cumulative_reward_per_share` are stored
/// multiplied by this constant so that fractional per-block and per-share
/// values survive integer division. 10^12 leaves room for deposit and reward
/// amounts up to ~10^26 before the checked multiplications below overflow.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── Rate ────────────────────────────────────────────────────────────────────

/// Spread `budget` reward tokens evenly over `blocks` blocks.
///
/// ```text
/// reward_per_block = budget × PRECISION / blocks
/// ```
///
/// The division floors; whatever is left over stays in the pool as
/// unattributed dust and can be recovered by the owner after the window.
pub fn reward_per_block(budget: i128, blocks: u32) -> Result<i128, ContractError> {
    if blocks == 0 {
        return Err(ContractError::BlockNumber);
    }
    if budget <= 0 {
        return Ok(0);
    }

    let scaled = budget
        .checked_mul(PRECISION)
        .ok_or(ContractError::MathOverflow)?;

    Ok(scaled / i128::from(blocks))
}

/// Reward emitted over `elapsed` blocks, still scaled by `PRECISION`.
pub fn emitted(reward_per_block: i128, elapsed: u32) -> Result<i128, ContractError> {
    reward_per_block
        .checked_mul(i128::from(elapsed))
        .ok_or(ContractError::MathOverflow)
}

// ── Accumulator ─────────────────────────────────────────────────────────────

/// Advance the reward-per-share accumulator by `elapsed` blocks.
///
/// ```text
/// Δrps    = reward_per_block × elapsed / total_deposit
/// new_rps = stored_rps + Δrps
/// ```
///
/// With nothing deposited there is nobody to distribute to, so `stored` is
/// returned unchanged.
pub fn accumulate(
    stored: i128,
    reward_per_block: i128,
    elapsed: u32,
    total_deposit: i128,
) -> Result<i128, ContractError> {
    if total_deposit <= 0 {
        return Ok(stored);
    }

    let delta = emitted(reward_per_block, elapsed)? / total_deposit;

    stored.checked_add(delta).ok_or(ContractError::MathOverflow)
}

// ── Entitlement ─────────────────────────────────────────────────────────────

/// Total reward owed to a single depositor.
///
/// ```text
/// pending = amount × (current_rps − snapshot) / PRECISION + reward_debt
/// ```
///
/// Only the accumulator growth since the depositor's last snapshot is
/// multiplied by their amount, so earlier accruals (already folded into
/// `reward_debt`) are never counted twice.
pub fn pending(
    amount: i128,
    current_rps: i128,
    snapshot: i128,
    reward_debt: i128,
) -> Result<i128, ContractError> {
    let growth = current_rps
        .checked_sub(snapshot)
        .ok_or(ContractError::MathOverflow)?;
    let accrued = amount
        .checked_mul(growth)
        .ok_or(ContractError::MathOverflow)?
        / PRECISION;

    reward_debt
        .checked_add(accrued)
        .ok_or(ContractError::MathOverflow)
}

/// Convert a `PRECISION`-scaled reward into whole tokens, rounding down.
pub fn to_tokens_floor(scaled: i128) -> i128 {
    scaled / PRECISION
}

/// Convert a `PRECISION`-scaled reward into whole tokens, rounding up.
///
/// Used where over-estimating keeps the pool solvent.
pub fn to_tokens_ceil(scaled: i128) -> Result<i128, ContractError> {
    if scaled <= 0 {
        return Ok(0);
    }
    let whole = scaled / PRECISION;
    if scaled % PRECISION == 0 {
        Ok(whole)
    } else {
        whole.checked_add(1).ok_or(ContractError::MathOverflow)
    }
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests, no Soroban environment needed.
