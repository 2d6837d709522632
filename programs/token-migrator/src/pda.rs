//! Program Derived Address (PDA) derivation functions
//!
//! The migrator address must be known before the new token is issued, since the
//! issuer mints its whole supply straight to it.

use solana_program::pubkey::Pubkey;

/// PDA seed constants
pub mod seeds {
    pub const MIGRATOR: &[u8] = b"migrator";
}

/// Migration ledger PDA, one per legacy token
#[derive(Debug, Clone)]
pub struct MigratorPda;
impl MigratorPda {
    pub fn derive(program_id: &Pubkey, legacy_token: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::MIGRATOR, legacy_token.as_ref()], program_id)
    }

    pub fn seeds(legacy_token: &Pubkey) -> Vec<Vec<u8>> {
        vec![seeds::MIGRATOR.to_vec(), legacy_token.as_ref().to_vec()]
    }
}
