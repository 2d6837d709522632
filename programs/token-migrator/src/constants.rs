//! Deployment-time constants for the migration
//!
//! The payout pool of new tokens is sized from these values before the ledger
//! exists, so none of them may be read from the token contracts at call time.

use solana_program::pubkey::Pubkey;

/// Decimal precision of the legacy token
pub const LEGACY_DECIMALS: u8 = 8;

/// Decimal precision of the new token
pub const NEW_DECIMALS: u8 = 18;

/// Whole-token supply shared by both tokens (1 billion)
pub const NOMINAL_WHOLE_SUPPLY: u128 = 1_000_000_000;

/// Legacy total supply at snapshot time, in legacy base units
pub const EXPECTED_LEGACY_SUPPLY: u128 = NOMINAL_WHOLE_SUPPLY * 100_000_000; // 10^8

/// New-token supply before subtracting burned legacy tokens, in new base units
pub const NOMINAL_NEW_SUPPLY: u128 = NOMINAL_WHOLE_SUPPLY * 1_000_000_000_000_000_000; // 10^18

/// Legacy tokens held here are unspendable and are excluded from the new supply
pub const LEGACY_BURN_ADDRESS: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// New token metadata
pub const NEW_TOKEN_NAME: &str = "SwissBorg Token";
pub const NEW_TOKEN_SYMBOL: &str = "BORG";

/// Initializer version reported by the `Initialized` event
pub const INITIALIZER_VERSION: u8 = 1;

/// Account discriminator size
pub const DISCRIMINATOR_SIZE: usize = 8;
