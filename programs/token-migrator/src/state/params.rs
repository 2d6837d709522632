use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::program_error::ProgramError;

use crate::{
    constants::{EXPECTED_LEGACY_SUPPLY, LEGACY_DECIMALS, NEW_DECIMALS},
    error::MigratorError,
    math,
};

/// Deployment-time migration parameters.
/// Fixed when the ledger logic is deployed and never read from the tokens.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationParams {
    /// Decimal precision of the legacy token
    pub legacy_decimals: u8,

    /// Decimal precision of the new token
    pub new_decimals: u8,

    /// Legacy total supply the new-token pool was sized from
    pub expected_legacy_supply: u128,
}

impl MigrationParams {
    pub const LEN: usize = 1 + 1 + 16;

    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.expected_legacy_supply == 0 {
            return Err(MigratorError::InvalidMigrationParams.into());
        }
        // Rejects downscaling and exponents that cannot be represented
        math::rescale_factor(self.legacy_decimals, self.new_decimals)?;
        Ok(())
    }

    /// Payout in new-token base units for `amount` legacy base units
    pub fn payout_for(&self, amount: u128) -> Result<u128, ProgramError> {
        math::rescale(amount, self.legacy_decimals, self.new_decimals)
    }
}

impl Default for MigrationParams {
    fn default() -> Self {
        Self {
            legacy_decimals: LEGACY_DECIMALS,
            new_decimals: NEW_DECIMALS,
            expected_legacy_supply: EXPECTED_LEGACY_SUPPLY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = MigrationParams::default();
        params.validate().unwrap();
        assert_eq!(params.expected_legacy_supply, 100_000_000_000_000_000);
        assert_eq!(params.payout_for(1).unwrap(), 10_000_000_000);
    }

    #[test]
    fn test_invalid_params() {
        let downscale = MigrationParams {
            legacy_decimals: 18,
            new_decimals: 8,
            ..MigrationParams::default()
        };
        assert_eq!(
            downscale.validate().unwrap_err(),
            MigratorError::InvalidMigrationParams.into()
        );

        let empty = MigrationParams {
            expected_legacy_supply: 0,
            ..MigrationParams::default()
        };
        assert!(empty.validate().is_err());

        let huge = MigrationParams {
            legacy_decimals: 0,
            new_decimals: 40,
            ..MigrationParams::default()
        };
        assert_eq!(huge.validate().unwrap_err(), MigratorError::ArithmeticOverflow.into());
    }
}
