//! Event logging for the migration ledger
//!
//! Events are the only record of completed migrations. Each one is logged with
//! `msg!` and appended to the transaction's [`EventLog`], which is discarded
//! together with every other effect when the transaction fails.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

/// Event type discriminator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Initialized = 1,
    TokenMigrated = 2,
    ManagerChanged = 3,
    PauseStateChanged = 4,
    OwnershipTransferred = 5,
    Upgraded = 6,
}

/// Base event trait
pub trait Event: BorshSerialize {
    fn event_type() -> EventType;

    fn emit(&self) {
        msg!("TOKEN_MIGRATOR_EVENT");
        msg!("TYPE:{:?}", Self::event_type());

        // Serialize and log event data
        if let Ok(data) = self.try_to_vec() {
            msg!("DATA:{}", bs58::encode(&data).into_string());
        }
    }
}

/// Macro for easy event definition
#[macro_export]
macro_rules! define_event {
    ($name:ident { $($field:ident: $type:ty),* $(,)? }) => {
        #[derive(::borsh::BorshSerialize, ::borsh::BorshDeserialize, Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: $type,)*
        }

        impl $crate::events::Event for $name {
            fn event_type() -> $crate::events::EventType {
                $crate::events::EventType::$name
            }
        }
    };
}

define_event!(Initialized { version: u8 });

define_event!(TokenMigrated {
    caller: Pubkey,
    amount: u128,
});

define_event!(ManagerChanged { new_manager: Pubkey });

define_event!(PauseStateChanged {
    account: Pubkey,
    paused: bool,
});

define_event!(OwnershipTransferred {
    previous_owner: Pubkey,
    new_owner: Pubkey,
});

define_event!(Upgraded { implementation: Pubkey });

/// An emitted event as recorded by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    /// Ledger that emitted the event
    pub emitter: Pubkey,
    pub event_type: EventType,
    pub data: Vec<u8>,
}

impl LoggedEvent {
    /// Decode the payload if this entry is an `E`
    pub fn decode<E: Event + BorshDeserialize>(&self) -> Option<E> {
        if self.event_type != E::event_type() {
            return None;
        }
        E::try_from_slice(&self.data).ok()
    }
}

/// Append-only event history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn record<E: Event>(&mut self, emitter: &Pubkey, event: &E) {
        event.emit();
        if let Ok(data) = event.try_to_vec() {
            self.entries.push(LoggedEvent {
                emitter: *emitter,
                event_type: E::event_type(),
                data,
            });
        }
    }

    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All events of type `E`, oldest first
    pub fn of_type<E: Event + BorshDeserialize>(&self) -> Vec<E> {
        self.entries.iter().filter_map(|entry| entry.decode::<E>()).collect()
    }

    pub fn last_of_type<E: Event + BorshDeserialize>(&self) -> Option<E> {
        self.entries.iter().rev().find_map(|entry| entry.decode::<E>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_decode() {
        let emitter = Pubkey::new_unique();
        let caller = Pubkey::new_unique();
        let mut log = EventLog::default();

        log.record(&emitter, &TokenMigrated { caller, amount: 42 });
        log.record(&emitter, &ManagerChanged { new_manager: caller });

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].event_type, EventType::TokenMigrated);
        assert_eq!(
            log.of_type::<TokenMigrated>(),
            vec![TokenMigrated { caller, amount: 42 }]
        );
        assert_eq!(
            log.last_of_type::<ManagerChanged>(),
            Some(ManagerChanged { new_manager: caller })
        );
        assert!(log.last_of_type::<Upgraded>().is_none());
    }

    #[test]
    fn test_decode_checks_type() {
        let entry = LoggedEvent {
            emitter: Pubkey::new_unique(),
            event_type: EventType::Initialized,
            data: Initialized { version: 1 }.try_to_vec().unwrap(),
        };
        assert_eq!(entry.decode::<Initialized>(), Some(Initialized { version: 1 }));
        assert!(entry.decode::<Upgraded>().is_none());
    }
}
