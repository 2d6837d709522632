use solana_program::program_error::ProgramError;

use crate::error::MigratorError;

/// Largest exponent for which 10^exp fits in a u128
pub const MAX_DECIMAL_EXPONENT: u8 = 38;

/// 10^exp with overflow checking
pub fn pow10(exp: u8) -> Result<u128, ProgramError> {
    if exp > MAX_DECIMAL_EXPONENT {
        return Err(MigratorError::ArithmeticOverflow.into());
    }
    10u128
        .checked_pow(exp as u32)
        .ok_or_else(|| MigratorError::ArithmeticOverflow.into())
}

/// Multiplier converting an amount from `from_decimals` to `to_decimals` precision.
/// Only upscaling is exact, so `to_decimals` must not be below `from_decimals`.
pub fn rescale_factor(from_decimals: u8, to_decimals: u8) -> Result<u128, ProgramError> {
    let exp = to_decimals
        .checked_sub(from_decimals)
        .ok_or(MigratorError::InvalidMigrationParams)?;
    pow10(exp)
}

/// Rescale `amount` from `from_decimals` to `to_decimals` precision
pub fn rescale(amount: u128, from_decimals: u8, to_decimals: u8) -> Result<u128, ProgramError> {
    let factor = rescale_factor(from_decimals, to_decimals)?;
    amount
        .checked_mul(factor)
        .ok_or_else(|| MigratorError::ArithmeticOverflow.into())
}
