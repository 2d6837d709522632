use solana_program::{
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::INITIALIZER_VERSION,
    error::MigratorError,
    events::{
        EventLog, Initialized, ManagerChanged, OwnershipTransferred, PauseStateChanged,
        TokenMigrated, Upgraded,
    },
    instruction::MigratorInstruction,
    runtime::TokenRegistry,
    state::MigratorState,
    token::{FungibleToken, TokenError},
};

/// Everything one instruction may touch. The runtime builds this over a
/// working copy, so effects only persist if the instruction succeeds.
pub struct InvokeContext<'a> {
    /// Address of the ledger being invoked
    pub ledger_id: &'a Pubkey,
    /// Principal invoking the instruction
    pub caller: &'a Pubkey,
    /// Ledger account data
    pub ledger_data: &'a mut [u8],
    pub tokens: &'a mut TokenRegistry,
    pub events: &'a mut EventLog,
}

pub fn process_instruction(ctx: &mut InvokeContext, instruction_data: &[u8]) -> ProgramResult {
    let instruction = MigratorInstruction::unpack(instruction_data)?;

    match instruction {
        MigratorInstruction::Initialize {
            legacy_token,
            new_token,
            owner,
            manager,
        } => {
            msg!("Instruction: Initialize");
            process_initialize(ctx, legacy_token, new_token, owner, manager)
        }

        MigratorInstruction::Migrate { amount } => {
            msg!("Instruction: Migrate");
            process_migrate(ctx, amount)
        }

        MigratorInstruction::Pause => {
            msg!("Instruction: Pause");
            process_set_paused(ctx, true)
        }

        MigratorInstruction::Unpause => {
            msg!("Instruction: Unpause");
            process_set_paused(ctx, false)
        }

        MigratorInstruction::SetManager { manager } => {
            msg!("Instruction: SetManager");
            process_set_manager(ctx, manager)
        }

        MigratorInstruction::TransferOwnership { new_owner } => {
            msg!("Instruction: TransferOwnership");
            process_transfer_ownership(ctx, new_owner)
        }

        MigratorInstruction::UpgradeTo { new_implementation } => {
            msg!("Instruction: UpgradeTo");
            process_upgrade_to(ctx, new_implementation)
        }
    }
}

/// One-time ledger setup
fn process_initialize(
    ctx: &mut InvokeContext,
    legacy_token: Pubkey,
    new_token: Pubkey,
    owner: Pubkey,
    manager: Pubkey,
) -> ProgramResult {
    let mut state = MigratorState::unpack(ctx.ledger_data)?;

    state.initialize(legacy_token, new_token, owner, manager)?;
    state.pack(ctx.ledger_data)?;

    ctx.events.record(ctx.ledger_id, &Initialized { version: INITIALIZER_VERSION });
    ctx.events.record(
        ctx.ledger_id,
        &OwnershipTransferred {
            previous_owner: Pubkey::default(),
            new_owner: owner,
        },
    );

    msg!(
        "Migrator initialized: legacy {} -> new {}, owner {}, manager {}, paused",
        legacy_token,
        new_token,
        owner,
        manager
    );

    Ok(())
}

/// Pull `amount` legacy tokens from the caller and pay out the rescaled new-token amount
fn process_migrate(ctx: &mut InvokeContext, amount: u128) -> ProgramResult {
    let state = MigratorState::unpack(ctx.ledger_data)?;
    let ledger = *ctx.ledger_id;
    let caller = *ctx.caller;

    let payout = state.check_migration(amount, || {
        Ok(token_mut(ctx.tokens, &state.legacy_token)?.total_supply())
    })?;

    token_mut(ctx.tokens, &state.legacy_token)?
        .transfer_from(&ledger, &caller, &ledger, amount)
        .map_err(|e| transfer_failed("legacy", e))?;

    token_mut(ctx.tokens, &state.new_token)?
        .transfer(&ledger, &caller, payout)
        .map_err(|e| transfer_failed("new", e))?;

    ctx.events.record(&ledger, &TokenMigrated { caller, amount });

    msg!("Migrated {} legacy units for {} new units to {}", amount, payout, caller);

    Ok(())
}

fn process_set_paused(ctx: &mut InvokeContext, paused: bool) -> ProgramResult {
    let mut state = MigratorState::unpack(ctx.ledger_data)?;

    if paused {
        state.pause(ctx.caller)?;
    } else {
        state.unpause(ctx.caller)?;
    }
    state.pack(ctx.ledger_data)?;

    ctx.events.record(
        ctx.ledger_id,
        &PauseStateChanged {
            account: *ctx.caller,
            paused,
        },
    );

    msg!("Migrations {}", if paused { "PAUSED" } else { "unpaused" });

    Ok(())
}

fn process_set_manager(ctx: &mut InvokeContext, manager: Pubkey) -> ProgramResult {
    let mut state = MigratorState::unpack(ctx.ledger_data)?;

    state.set_manager(ctx.caller, manager)?;
    state.pack(ctx.ledger_data)?;

    ctx.events.record(ctx.ledger_id, &ManagerChanged { new_manager: manager });

    msg!("Manager set to {}", manager);

    Ok(())
}

fn process_transfer_ownership(ctx: &mut InvokeContext, new_owner: Pubkey) -> ProgramResult {
    let mut state = MigratorState::unpack(ctx.ledger_data)?;

    let previous_owner = state.transfer_ownership(ctx.caller, new_owner)?;
    state.pack(ctx.ledger_data)?;

    ctx.events.record(
        ctx.ledger_id,
        &OwnershipTransferred {
            previous_owner,
            new_owner,
        },
    );

    msg!("Ownership transferred from {} to {}", previous_owner, new_owner);

    Ok(())
}

fn process_upgrade_to(ctx: &mut InvokeContext, new_implementation: Pubkey) -> ProgramResult {
    let mut state = MigratorState::unpack(ctx.ledger_data)?;

    let previous = state.implementation;
    state.authorize_upgrade(ctx.caller, new_implementation)?;
    state.pack(ctx.ledger_data)?;

    ctx.events.record(
        ctx.ledger_id,
        &Upgraded {
            implementation: new_implementation,
        },
    );

    msg!("Implementation upgraded from {} to {}", previous, new_implementation);

    Ok(())
}

/// Resolve a token address through the consumed interface only
fn token_mut<'a>(
    tokens: &'a mut TokenRegistry,
    address: &Pubkey,
) -> Result<&'a mut dyn FungibleToken, ProgramError> {
    match tokens.get_mut(address) {
        Some(token) => Ok(token as &mut dyn FungibleToken),
        None => {
            msg!("No token deployed at {}", address);
            Err(ProgramError::InvalidAccountData)
        }
    }
}

fn transfer_failed(side: &str, error: TokenError) -> ProgramError {
    msg!("{} token transfer failed: {}", side, error);
    MigratorError::ExternalTransferFailed.into()
}
