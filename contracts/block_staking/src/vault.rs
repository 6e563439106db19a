use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Token custody for one asset held by this contract.
///
/// Wraps the SEP-41 token client so that balance shortfalls surface as
/// `ContractError::InsufficientBalance` before any transfer is attempted.
pub struct Vault<'a> {
    env: &'a Env,
    token: token::Client<'a>,
}

impl<'a> Vault<'a> {
    pub fn new(env: &'a Env, asset: &Address) -> Self {
        Self {
            env,
            token: token::Client::new(env, asset),
        }
    }

    /// Balance of this asset held by the contract.
    pub fn balance(&self) -> i128 {
        self.token.balance(&self.env.current_contract_address())
    }

    /// Fail unless the contract holds at least `amount`.
    pub fn require_reserve(&self, amount: i128) -> Result<(), ContractError> {
        if amount > 0 && self.balance() < amount {
            return Err(ContractError::InsufficientBalance);
        }
        Ok(())
    }

    /// Pull `amount` from `from` into the contract. `from` must have
    /// authorised the enclosing invocation.
    pub fn transfer_in(&self, from: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        if self.token.balance(from) < amount {
            return Err(ContractError::InsufficientBalance);
        }
        self.token
            .transfer(from, &self.env.current_contract_address(), &amount);
        Ok(())
    }

    /// Send `amount` from the contract to `to`.
    pub fn transfer_out(&self, to: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        self.require_reserve(amount)?;
        self.token
            .transfer(&self.env.current_contract_address(), to, &amount);
        Ok(())
    }
}
