use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    program_error::ProgramError,
    pubkey::Pubkey,
};

/// Instructions accepted by a migration ledger.
/// The invoking principal is supplied by the runtime, never by the payload.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum MigratorInstruction {
    /// One-time setup. Leaves migrations paused.
    /// Caller: anyone (run atomically with deployment)
    Initialize {
        legacy_token: Pubkey,
        new_token: Pubkey,
        owner: Pubkey,
        manager: Pubkey,
    },

    /// Exchange `amount` legacy base units for the rescaled new-token amount.
    /// The caller must have approved the ledger on the legacy token first.
    /// Caller: any holder
    Migrate { amount: u128 },

    /// Close the migration window
    /// Caller: manager
    Pause,

    /// Open the migration window
    /// Caller: manager
    Unpause,

    /// Rotate the manager
    /// Caller: owner
    SetManager { manager: Pubkey },

    /// Hand ownership to another principal
    /// Caller: owner
    TransferOwnership { new_owner: Pubkey },

    /// Authorize and record a new logic address; storage is kept
    /// Caller: owner
    UpgradeTo { new_implementation: Pubkey },
}

impl MigratorInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }

    pub fn pack(&self) -> Vec<u8> {
        // Serializing into a Vec cannot fail
        self.try_to_vec().unwrap_or_default()
    }
}

// Helper functions to create instruction data
pub fn initialize(legacy_token: &Pubkey, new_token: &Pubkey, owner: &Pubkey, manager: &Pubkey) -> Vec<u8> {
    MigratorInstruction::Initialize {
        legacy_token: *legacy_token,
        new_token: *new_token,
        owner: *owner,
        manager: *manager,
    }
    .pack()
}

pub fn migrate(amount: u128) -> Vec<u8> {
    MigratorInstruction::Migrate { amount }.pack()
}

pub fn pause() -> Vec<u8> {
    MigratorInstruction::Pause.pack()
}

pub fn unpause() -> Vec<u8> {
    MigratorInstruction::Unpause.pack()
}

pub fn set_manager(manager: &Pubkey) -> Vec<u8> {
    MigratorInstruction::SetManager { manager: *manager }.pack()
}

pub fn transfer_ownership(new_owner: &Pubkey) -> Vec<u8> {
    MigratorInstruction::TransferOwnership { new_owner: *new_owner }.pack()
}

pub fn upgrade_to(new_implementation: &Pubkey) -> Vec<u8> {
    MigratorInstruction::UpgradeTo {
        new_implementation: *new_implementation,
    }
    .pack()
}
