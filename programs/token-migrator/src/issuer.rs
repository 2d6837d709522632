//! New token issuance
//!
//! The new token mints its whole supply to the (predicted) migrator address at
//! construction, so the ledger never needs a funding step. Legacy tokens that
//! were burned before the snapshot are never redeemable and are left out of the
//! supply.

use solana_program::{
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::{
        LEGACY_BURN_ADDRESS, LEGACY_DECIMALS, NEW_DECIMALS, NEW_TOKEN_NAME, NEW_TOKEN_SYMBOL,
        NOMINAL_NEW_SUPPLY,
    },
    error::MigratorError,
    math,
    token::{FungibleToken, TokenLedger},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Supply before subtracting burned legacy tokens, in new base units
    pub nominal_supply: u128,
    pub legacy_decimals: u8,
    /// Legacy balance held here counts as burned
    pub burn_address: Pubkey,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            name: NEW_TOKEN_NAME.to_string(),
            symbol: NEW_TOKEN_SYMBOL.to_string(),
            decimals: NEW_DECIMALS,
            nominal_supply: NOMINAL_NEW_SUPPLY,
            legacy_decimals: LEGACY_DECIMALS,
            burn_address: LEGACY_BURN_ADDRESS,
        }
    }
}

impl IssuerConfig {
    /// New-token supply once `burned_legacy` legacy base units are excluded
    pub fn supply_for(&self, burned_legacy: u128) -> Result<u128, ProgramError> {
        let burned = math::rescale(burned_legacy, self.legacy_decimals, self.decimals)?;
        self.nominal_supply
            .checked_sub(burned)
            .ok_or_else(|| MigratorError::ArithmeticOverflow.into())
    }
}

/// Deploy the new token, minting its entire supply to `migrator`
pub fn issue<T: FungibleToken>(
    config: &IssuerConfig,
    migrator: &Pubkey,
    legacy_token: &T,
) -> Result<TokenLedger, ProgramError> {
    if *migrator == Pubkey::default() {
        return Err(MigratorError::AddressZero.into());
    }

    let burned_legacy = legacy_token.balance_of(&config.burn_address);
    let supply = config.supply_for(burned_legacy)?;

    let mut token = TokenLedger::new(&config.name, &config.symbol, config.decimals);
    token.mint(migrator, supply).map_err(|e| {
        msg!("New token mint failed: {}", e);
        ProgramError::from(MigratorError::ArithmeticOverflow)
    })?;

    msg!(
        "{} issued: {} base units to {} ({} legacy units burned)",
        config.symbol,
        supply,
        migrator,
        burned_legacy
    );

    Ok(token)
}
