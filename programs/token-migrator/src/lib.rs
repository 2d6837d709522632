// Legacy-to-new token migration ledger
// Native Solana program layout - NO ANCHOR

pub mod constants;
pub mod error;
pub mod events;
pub mod instruction;
pub mod issuer;
pub mod math;
pub mod pda;
pub mod processor;
pub mod runtime;
pub mod state;
pub mod token;

// Declare program ID
solana_program::declare_id!("TokMigrator11111111111111111111111111111111");

pub use crate::error::MigratorError;
pub use crate::runtime::Runtime;
pub use crate::state::{MigrationParams, MigratorState};
pub use crate::token::{FungibleToken, TokenLedger};
