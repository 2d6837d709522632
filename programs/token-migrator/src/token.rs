//! Fungible token interface consumed by the ledger, plus an in-memory ledger
//! implementing it
//!
//! The migrator only ever talks to tokens through [`FungibleToken`]. Decimals
//! are deliberately absent from the trait: precision is a deployment constant.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;
use thiserror::Error;

/// Token-level failures, surfaced to migrator callers as `ExternalTransferFailed`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Transfer amount exceeds balance")]
    InsufficientBalance,

    #[error("Insufficient allowance")]
    InsufficientAllowance,

    #[error("Address zero")]
    AddressZero,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

/// Standard fungible token surface: balance query, supply, transfer-from, transfer
pub trait FungibleToken {
    fn balance_of(&self, account: &Pubkey) -> u128;

    fn total_supply(&self) -> u128;

    /// Move `amount` from `from` to `to`, spending the allowance `from` granted to `spender`
    fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` (the caller) to `to`
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError>;
}

/// In-memory mintable/burnable token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLedger {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    total_supply: u128,
    balances: BTreeMap<Pubkey, u128>,
    allowances: BTreeMap<(Pubkey, Pubkey), u128>,
}

impl TokenLedger {
    pub fn new(name: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u128) -> Result<(), TokenError> {
        if *spender == Pubkey::default() {
            return Err(TokenError::AddressZero);
        }
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    pub fn mint(&mut self, to: &Pubkey, amount: u128) -> Result<(), TokenError> {
        if *to == Pubkey::default() {
            return Err(TokenError::AddressZero);
        }
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;
        // Cannot overflow: every balance is bounded by the total supply
        *self.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    pub fn burn(&mut self, from: &Pubkey, amount: u128) -> Result<(), TokenError> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance);
        }
        self.balances.insert(*from, balance - amount);
        self.total_supply -= amount;
        Ok(())
    }

    fn check_allowance(&self, owner: &Pubkey, spender: &Pubkey, amount: u128) -> Result<u128, TokenError> {
        let current = self.allowance(owner, spender);
        if current < amount {
            return Err(TokenError::InsufficientAllowance);
        }
        // u128::MAX is an unlimited approval
        if current == u128::MAX {
            return Ok(current);
        }
        Ok(current - amount)
    }

    fn move_balance(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance);
        }
        self.balances.insert(*from, from_balance - amount);
        *self.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }
}

impl FungibleToken for TokenLedger {
    fn balance_of(&self, account: &Pubkey) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<(), TokenError> {
        let remaining = self.check_allowance(from, spender, amount)?;
        self.move_balance(from, to, amount)?;
        self.allowances.insert((*from, *spender), remaining);
        Ok(())
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TokenError> {
        self.move_balance(from, to, amount)
    }
}
