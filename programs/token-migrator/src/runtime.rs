//! In-memory host for migration ledgers and the tokens they consume
//!
//! Every call runs as one transaction: it executes against a working copy of
//! the whole runtime (token balances, ledger accounts and event log) and the
//! copy only replaces the live state when the call succeeds. A failed call
//! leaves no trace, including any events it emitted.

use std::collections::BTreeMap;

use solana_program::{
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    events::EventLog,
    instruction,
    issuer::{self, IssuerConfig},
    pda::MigratorPda,
    processor::{self, InvokeContext},
    state::{MigrationParams, MigratorState},
    token::TokenLedger,
};

/// Deployed tokens by address
pub type TokenRegistry = BTreeMap<Pubkey, TokenLedger>;

#[derive(Debug, Clone, Default)]
pub struct Runtime {
    tokens: TokenRegistry,
    ledgers: BTreeMap<Pubkey, Vec<u8>>,
    events: EventLog,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a working copy; commit it only on success
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T, ProgramError>
    where
        F: FnOnce(&mut Runtime) -> Result<T, ProgramError>,
    {
        let mut working = self.clone();
        let result = f(&mut working)?;
        *self = working;
        Ok(result)
    }

    /// Register a token at `address`
    pub fn deploy_token(&mut self, address: Pubkey, token: TokenLedger) -> ProgramResult {
        if self.is_deployed(&address) {
            msg!("Address {} already in use", address);
            return Err(ProgramError::AccountAlreadyInitialized);
        }
        self.tokens.insert(address, token);
        Ok(())
    }

    /// Issue the new token at `address`, minting its whole supply to `migrator`.
    /// `migrator` is normally a predicted ledger address with nothing deployed yet.
    pub fn deploy_new_token(
        &mut self,
        address: Pubkey,
        config: &IssuerConfig,
        migrator: &Pubkey,
        legacy_token: &Pubkey,
    ) -> ProgramResult {
        self.transaction(|rt| {
            let legacy = rt.tokens.get(legacy_token).ok_or_else(|| {
                msg!("No token deployed at {}", legacy_token);
                ProgramError::InvalidAccountData
            })?;
            let token = issuer::issue(config, migrator, legacy)?;
            rt.deploy_token(address, token)
        })
    }

    /// Address a ledger for `legacy_token` will be deployed at
    pub fn predict_ledger_address(legacy_token: &Pubkey) -> Pubkey {
        MigratorPda::derive(&crate::id(), legacy_token).0
    }

    /// Deploy uninitialized ledger logic at `address`
    pub fn deploy_ledger(
        &mut self,
        address: Pubkey,
        params: MigrationParams,
        implementation: Pubkey,
    ) -> ProgramResult {
        params.validate()?;
        if self.is_deployed(&address) {
            msg!("Address {} already in use", address);
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        let mut data = vec![0u8; MigratorState::LEN];
        MigratorState::new(params, implementation).pack(&mut data)?;
        self.ledgers.insert(address, data);

        msg!("Ledger deployed at {} (implementation {})", address, implementation);
        Ok(())
    }

    /// Deploy a ledger at its predicted address and initialize it in the same
    /// transaction. If the initializer fails nothing is deployed.
    #[allow(clippy::too_many_arguments)]
    pub fn deploy_proxy(
        &mut self,
        deployer: &Pubkey,
        implementation: Pubkey,
        params: MigrationParams,
        legacy_token: &Pubkey,
        new_token: &Pubkey,
        owner: &Pubkey,
        manager: &Pubkey,
    ) -> Result<Pubkey, ProgramError> {
        let address = Self::predict_ledger_address(legacy_token);
        self.transaction(|rt| {
            rt.deploy_ledger(address, params, implementation)?;
            rt.execute(
                &address,
                deployer,
                &instruction::initialize(legacy_token, new_token, owner, manager),
            )?;
            Ok(address)
        })
    }

    /// Invoke a ledger instruction as `caller`
    pub fn invoke(&mut self, ledger_id: &Pubkey, caller: &Pubkey, instruction_data: &[u8]) -> ProgramResult {
        self.transaction(|rt| rt.execute(ledger_id, caller, instruction_data))
    }

    /// Run a direct token operation (approve, burn, ...) as its own transaction
    pub fn with_token<T, F>(&mut self, address: &Pubkey, f: F) -> Result<T, ProgramError>
    where
        F: FnOnce(&mut TokenLedger) -> Result<T, ProgramError>,
    {
        self.transaction(|rt| {
            let token = rt.tokens.get_mut(address).ok_or_else(|| {
                msg!("No token deployed at {}", address);
                ProgramError::InvalidAccountData
            })?;
            f(token)
        })
    }

    fn execute(&mut self, ledger_id: &Pubkey, caller: &Pubkey, instruction_data: &[u8]) -> ProgramResult {
        let Runtime {
            tokens,
            ledgers,
            events,
        } = self;

        let ledger_data = ledgers.get_mut(ledger_id).ok_or_else(|| {
            msg!("No ledger deployed at {}", ledger_id);
            ProgramError::InvalidAccountData
        })?;

        let mut ctx = InvokeContext {
            ledger_id,
            caller,
            ledger_data: ledger_data.as_mut_slice(),
            tokens,
            events,
        };
        processor::process_instruction(&mut ctx, instruction_data)
    }

    fn is_deployed(&self, address: &Pubkey) -> bool {
        self.tokens.contains_key(address) || self.ledgers.contains_key(address)
    }

    pub fn token(&self, address: &Pubkey) -> Option<&TokenLedger> {
        self.tokens.get(address)
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn ledger_state(&self, ledger_id: &Pubkey) -> Result<MigratorState, ProgramError> {
        let data = self
            .ledgers
            .get(ledger_id)
            .ok_or(ProgramError::InvalidAccountData)?;
        MigratorState::unpack(data)
    }

    /// Current logic address of a ledger
    pub fn get_implementation(&self, ledger_id: &Pubkey) -> Result<Pubkey, ProgramError> {
        Ok(self.ledger_state(ledger_id)?.implementation)
    }

    pub fn legacy_token(&self, ledger_id: &Pubkey) -> Result<Pubkey, ProgramError> {
        Ok(self.ledger_state(ledger_id)?.legacy_token)
    }

    pub fn new_token(&self, ledger_id: &Pubkey) -> Result<Pubkey, ProgramError> {
        Ok(self.ledger_state(ledger_id)?.new_token)
    }

    pub fn owner(&self, ledger_id: &Pubkey) -> Result<Pubkey, ProgramError> {
        Ok(self.ledger_state(ledger_id)?.owner)
    }

    pub fn manager(&self, ledger_id: &Pubkey) -> Result<Pubkey, ProgramError> {
        Ok(self.ledger_state(ledger_id)?.manager)
    }

    pub fn paused(&self, ledger_id: &Pubkey) -> Result<bool, ProgramError> {
        Ok(self.ledger_state(ledger_id)?.paused)
    }

    pub fn params(&self, ledger_id: &Pubkey) -> Result<MigrationParams, ProgramError> {
        Ok(self.ledger_state(ledger_id)?.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::MigratorError, token::FungibleToken};

    #[test]
    fn test_failed_transaction_rolls_back() {
        let mut rt = Runtime::new();
        let token_id = Pubkey::new_unique();
        let holder = Pubkey::new_unique();
        rt.deploy_token(token_id, TokenLedger::new("Legacy", "OLD", 8)).unwrap();

        let result: Result<(), ProgramError> = rt.transaction(|rt| {
            rt.tokens.get_mut(&token_id).unwrap().mint(&holder, 10).unwrap();
            Err(MigratorError::ExternalTransferFailed.into())
        });

        assert!(result.is_err());
        assert_eq!(rt.token(&token_id).unwrap().balance_of(&holder), 0);
    }

    #[test]
    fn test_addresses_cannot_be_reused() {
        let mut rt = Runtime::new();
        let address = Pubkey::new_unique();
        rt.deploy_token(address, TokenLedger::new("A", "A", 8)).unwrap();

        assert_eq!(
            rt.deploy_token(address, TokenLedger::new("B", "B", 8)).unwrap_err(),
            ProgramError::AccountAlreadyInitialized
        );
        assert_eq!(
            rt.deploy_ledger(address, MigrationParams::default(), Pubkey::new_unique())
                .unwrap_err(),
            ProgramError::AccountAlreadyInitialized
        );
    }

    #[test]
    fn test_invoke_unknown_ledger() {
        let mut rt = Runtime::new();
        assert_eq!(
            rt.invoke(&Pubkey::new_unique(), &Pubkey::new_unique(), &instruction::pause())
                .unwrap_err(),
            ProgramError::InvalidAccountData
        );
    }

    #[test]
    fn test_deploy_ledger_validates_params() {
        let mut rt = Runtime::new();
        let params = MigrationParams {
            legacy_decimals: 18,
            new_decimals: 8,
            ..MigrationParams::default()
        };
        assert_eq!(
            rt.deploy_ledger(Pubkey::new_unique(), params, Pubkey::new_unique())
                .unwrap_err(),
            MigratorError::InvalidMigrationParams.into()
        );
    }
}
