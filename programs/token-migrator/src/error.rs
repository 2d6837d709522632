//! Error types for the token migrator

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum MigratorError {
    // Configuration errors (7000-7009)
    #[error("Address zero")]
    AddressZero = 7000,

    #[error("Contract is already initialized")]
    AlreadyInitialized = 7001,

    #[error("Contract is not initialized")]
    NotInitialized = 7002,

    #[error("Invalid migration parameters")]
    InvalidMigrationParams = 7003,

    // Migration errors (7010-7019)
    #[error("Migrations are paused")]
    Paused = 7010,

    #[error("Migrations are not paused")]
    NotPaused = 7011,

    #[error("Amount zero")]
    AmountZero = 7012,

    #[error("Legacy token supply does not match the snapshot")]
    SupplyMismatch = 7013,

    #[error("External token transfer failed")]
    ExternalTransferFailed = 7014,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 7015,

    // Access errors (7020-7029)
    #[error("Caller is not the manager")]
    OnlyManager = 7020,

    #[error("Caller is not the owner")]
    Unauthorized = 7021,
}

impl PrintProgramError for MigratorError {
    fn print<E>(&self) {
        msg!("Token Migrator Error: {}", self);
    }
}

impl From<MigratorError> for ProgramError {
    fn from(e: MigratorError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for MigratorError {
    fn type_of() -> &'static str {
        "MigratorError"
    }
}

impl TryFrom<ProgramError> for MigratorError {
    type Error = ProgramError;

    fn try_from(error: ProgramError) -> Result<Self, Self::Error> {
        match error {
            ProgramError::Custom(code) => MigratorError::from_u32(code).ok_or(error),
            _ => Err(error),
        }
    }
}
