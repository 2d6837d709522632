use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::DISCRIMINATOR_SIZE,
    error::MigratorError,
    state::MigrationParams,
};

/// Initialization state of a deployed ledger
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Logic deployed, `Initialize` not yet run
    Uninitialized,
    /// Configured; stays here for the lifetime of the deployment
    Active,
}

/// Migration ledger account
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct MigratorState {
    /// Account discriminator
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    pub lifecycle: Lifecycle,

    /// Decimals and supply baseline, fixed at deployment
    pub params: MigrationParams,

    /// Token being retired
    pub legacy_token: Pubkey,

    /// Replacement token paid out from this ledger's own balance
    pub new_token: Pubkey,

    /// Can rotate the manager, transfer ownership and authorize upgrades
    pub owner: Pubkey,

    /// Can pause and unpause migrations
    pub manager: Pubkey,

    /// Migration gate, closed at initialization
    pub paused: bool,

    /// Current logic address
    pub implementation: Pubkey,
}

impl MigratorState {
    pub const DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = [77, 73, 71, 82, 65, 84, 79, 82]; // "MIGRATOR"

    pub const LEN: usize = DISCRIMINATOR_SIZE + // discriminator
        1 + // lifecycle
        MigrationParams::LEN + // params
        32 + // legacy_token
        32 + // new_token
        32 + // owner
        32 + // manager
        1 + // paused
        32 + // implementation
        64; // padding for storage added by later implementations

    /// Freshly deployed, uninitialized ledger
    pub fn new(params: MigrationParams, implementation: Pubkey) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            lifecycle: Lifecycle::Uninitialized,
            params,
            legacy_token: Pubkey::default(),
            new_token: Pubkey::default(),
            owner: Pubkey::default(),
            manager: Pubkey::default(),
            paused: false,
            implementation,
        }
    }

    /// Read from account data; trailing padding is ignored
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let state = Self::deserialize(&mut &data[..])?;
        if state.discriminator != Self::DISCRIMINATOR {
            msg!("Invalid migrator account discriminator");
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(state)
    }

    pub fn pack(&self, data: &mut [u8]) -> Result<(), ProgramError> {
        self.serialize(&mut &mut data[..])?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// One-time setup: `Uninitialized -> Active`
    pub fn initialize(
        &mut self,
        legacy_token: Pubkey,
        new_token: Pubkey,
        owner: Pubkey,
        manager: Pubkey,
    ) -> Result<(), ProgramError> {
        if self.is_initialized() {
            return Err(MigratorError::AlreadyInitialized.into());
        }
        for address in [&legacy_token, &new_token, &owner, &manager] {
            require_non_zero(address)?;
        }

        self.legacy_token = legacy_token;
        self.new_token = new_token;
        self.owner = owner;
        self.manager = manager;
        self.paused = true;
        self.lifecycle = Lifecycle::Active;

        Ok(())
    }

    pub fn assert_initialized(&self) -> Result<(), ProgramError> {
        if !self.is_initialized() {
            return Err(MigratorError::NotInitialized.into());
        }
        Ok(())
    }

    pub fn assert_owner(&self, caller: &Pubkey) -> Result<(), ProgramError> {
        self.assert_initialized()?;
        if self.owner != *caller {
            msg!("Caller {} is not the owner", caller);
            return Err(MigratorError::Unauthorized.into());
        }
        Ok(())
    }

    pub fn assert_manager(&self, caller: &Pubkey) -> Result<(), ProgramError> {
        self.assert_initialized()?;
        if self.manager != *caller {
            msg!("Caller {} is not the manager", caller);
            return Err(MigratorError::OnlyManager.into());
        }
        Ok(())
    }

    pub fn set_manager(&mut self, caller: &Pubkey, manager: Pubkey) -> Result<(), ProgramError> {
        self.assert_owner(caller)?;
        require_non_zero(&manager)?;
        self.manager = manager;
        Ok(())
    }

    /// Returns the previous owner
    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> Result<Pubkey, ProgramError> {
        self.assert_owner(caller)?;
        require_non_zero(&new_owner)?;
        let previous = self.owner;
        self.owner = new_owner;
        Ok(previous)
    }

    pub fn pause(&mut self, caller: &Pubkey) -> Result<(), ProgramError> {
        self.assert_manager(caller)?;
        if self.paused {
            return Err(MigratorError::Paused.into());
        }
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Pubkey) -> Result<(), ProgramError> {
        self.assert_manager(caller)?;
        if !self.paused {
            return Err(MigratorError::NotPaused.into());
        }
        self.paused = false;
        Ok(())
    }

    /// Owner-gated upgrade authorization. The logic swap itself is done by the host.
    pub fn authorize_upgrade(&mut self, caller: &Pubkey, new_implementation: Pubkey) -> Result<(), ProgramError> {
        self.assert_owner(caller)?;
        require_non_zero(&new_implementation)?;
        self.implementation = new_implementation;
        Ok(())
    }

    /// Validate a migration request and compute its payout.
    /// Checks run in order: pause gate, zero amount, supply safeguard. The legacy
    /// supply is only queried once the first two checks have passed.
    pub fn check_migration<F>(&self, amount: u128, legacy_total_supply: F) -> Result<u128, ProgramError>
    where
        F: FnOnce() -> Result<u128, ProgramError>,
    {
        self.assert_initialized()?;
        if self.paused {
            return Err(MigratorError::Paused.into());
        }
        if amount == 0 {
            return Err(MigratorError::AmountZero.into());
        }
        let legacy_total_supply = legacy_total_supply()?;
        if legacy_total_supply != self.params.expected_legacy_supply {
            msg!(
                "Legacy supply {} differs from snapshot {}",
                legacy_total_supply,
                self.params.expected_legacy_supply
            );
            return Err(MigratorError::SupplyMismatch.into());
        }
        self.params.payout_for(amount)
    }
}

fn require_non_zero(address: &Pubkey) -> Result<(), ProgramError> {
    if *address == Pubkey::default() {
        return Err(MigratorError::AddressZero.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EXPECTED_LEGACY_SUPPLY;

    struct Roles {
        legacy: Pubkey,
        new: Pubkey,
        owner: Pubkey,
        manager: Pubkey,
    }

    fn active() -> (MigratorState, Roles) {
        let roles = Roles {
            legacy: Pubkey::new_unique(),
            new: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            manager: Pubkey::new_unique(),
        };
        let mut state = MigratorState::new(MigrationParams::default(), Pubkey::new_unique());
        state
            .initialize(roles.legacy, roles.new, roles.owner, roles.manager)
            .unwrap();
        (state, roles)
    }

    #[test]
    fn test_pack_unpack_with_padding() {
        let (state, _) = active();
        let mut data = vec![0u8; MigratorState::LEN];
        state.pack(&mut data).unwrap();

        assert_eq!(MigratorState::unpack(&data).unwrap(), state);
    }

    #[test]
    fn test_unpack_rejects_foreign_account() {
        let data = vec![0u8; MigratorState::LEN];
        assert_eq!(
            MigratorState::unpack(&data).unwrap_err(),
            ProgramError::InvalidAccountData
        );
    }

    #[test]
    fn test_initialize_sets_roles_and_pauses() {
        let (state, roles) = active();
        assert!(state.is_initialized());
        assert!(state.paused);
        assert_eq!(state.legacy_token, roles.legacy);
        assert_eq!(state.new_token, roles.new);
        assert_eq!(state.owner, roles.owner);
        assert_eq!(state.manager, roles.manager);
    }

    #[test]
    fn test_initialize_rejects_each_zero_address() {
        let key = Pubkey::new_unique;
        let zero = Pubkey::default();
        let cases = [
            (zero, key(), key(), key()),
            (key(), zero, key(), key()),
            (key(), key(), zero, key()),
            (key(), key(), key(), zero),
        ];
        for (legacy, new, owner, manager) in cases {
            let mut state = MigratorState::new(MigrationParams::default(), key());
            assert_eq!(
                state.initialize(legacy, new, owner, manager).unwrap_err(),
                MigratorError::AddressZero.into()
            );
            assert!(!state.is_initialized());
        }
    }

    #[test]
    fn test_initialize_only_once() {
        let (mut state, roles) = active();
        assert_eq!(
            state
                .initialize(roles.legacy, roles.new, roles.owner, roles.manager)
                .unwrap_err(),
            MigratorError::AlreadyInitialized.into()
        );
        // Zero addresses do not change the outcome
        let zero = Pubkey::default();
        assert_eq!(
            state.initialize(zero, zero, zero, zero).unwrap_err(),
            MigratorError::AlreadyInitialized.into()
        );
    }

    #[test]
    fn test_uninitialized_ledger_rejects_operations() {
        let mut state = MigratorState::new(MigrationParams::default(), Pubkey::new_unique());
        let anyone = Pubkey::default();
        assert_eq!(state.pause(&anyone).unwrap_err(), MigratorError::NotInitialized.into());
        assert_eq!(
            state.check_migration(1, || Ok(EXPECTED_LEGACY_SUPPLY)).unwrap_err(),
            MigratorError::NotInitialized.into()
        );
    }

    #[test]
    fn test_owner_cannot_pause() {
        let (mut state, roles) = active();
        assert_eq!(state.unpause(&roles.owner).unwrap_err(), MigratorError::OnlyManager.into());
        state.unpause(&roles.manager).unwrap();
        assert_eq!(state.pause(&roles.owner).unwrap_err(), MigratorError::OnlyManager.into());
        assert!(!state.paused);
    }

    #[test]
    fn test_pause_state_transitions() {
        let (mut state, roles) = active();
        assert_eq!(state.pause(&roles.manager).unwrap_err(), MigratorError::Paused.into());
        state.unpause(&roles.manager).unwrap();
        assert_eq!(state.unpause(&roles.manager).unwrap_err(), MigratorError::NotPaused.into());
        state.pause(&roles.manager).unwrap();
        assert!(state.paused);
    }

    #[test]
    fn test_manager_cannot_rotate_itself_or_upgrade() {
        let (mut state, roles) = active();
        let other = Pubkey::new_unique();
        assert_eq!(
            state.set_manager(&roles.manager, other).unwrap_err(),
            MigratorError::Unauthorized.into()
        );
        assert_eq!(
            state.authorize_upgrade(&roles.manager, other).unwrap_err(),
            MigratorError::Unauthorized.into()
        );
    }

    #[test]
    fn test_set_manager() {
        let (mut state, roles) = active();
        assert_eq!(
            state.set_manager(&roles.owner, Pubkey::default()).unwrap_err(),
            MigratorError::AddressZero.into()
        );
        let next = Pubkey::new_unique();
        state.set_manager(&roles.owner, next).unwrap();
        assert_eq!(state.manager, next);
        assert_eq!(state.pause(&roles.manager).unwrap_err(), MigratorError::OnlyManager.into());
    }

    #[test]
    fn test_transfer_ownership() {
        let (mut state, roles) = active();
        let next = Pubkey::new_unique();
        assert_eq!(
            state.transfer_ownership(&roles.owner, Pubkey::default()).unwrap_err(),
            MigratorError::AddressZero.into()
        );
        assert_eq!(state.transfer_ownership(&roles.owner, next).unwrap(), roles.owner);
        assert_eq!(
            state.set_manager(&roles.owner, next).unwrap_err(),
            MigratorError::Unauthorized.into()
        );
        state.set_manager(&next, next).unwrap();
    }

    #[test]
    fn test_check_migration_order() {
        let (mut state, roles) = active();
        // Paused wins over zero amount and supply mismatch
        assert_eq!(state.check_migration(0, || Ok(0)).unwrap_err(), MigratorError::Paused.into());

        state.unpause(&roles.manager).unwrap();
        // Zero amount wins over supply mismatch
        assert_eq!(state.check_migration(0, || Ok(0)).unwrap_err(), MigratorError::AmountZero.into());
        assert_eq!(
            state.check_migration(1, || Ok(EXPECTED_LEGACY_SUPPLY + 1)).unwrap_err(),
            MigratorError::SupplyMismatch.into()
        );
        assert_eq!(
            state.check_migration(1, || Ok(EXPECTED_LEGACY_SUPPLY)).unwrap(),
            10_000_000_000
        );
    }

    #[test]
    fn test_supply_not_queried_when_gate_closed() {
        let (state, _) = active();
        let result = state.check_migration(1, || -> Result<u128, ProgramError> {
            panic!("supply queried while paused")
        });
        assert_eq!(result.unwrap_err(), MigratorError::Paused.into());
    }
}
