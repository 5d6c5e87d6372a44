//! Notifications emitted after a state change commits

use crate::Address;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    PairCreated {
        token0: Address,
        token1: Address,
        pool: Address,
    },
    Provide {
        pool: Address,
        provider: Address,
        amount0: u128,
        amount1: u128,
        shares: u128,
    },
    Withdraw {
        pool: Address,
        provider: Address,
        amount0: u128,
        amount1: u128,
        shares: u128,
    },
    Swap {
        pool: Address,
        trader: Address,
        token_in: Address,
        amount_in: u128,
        token_out: Address,
        amount_out: u128,
    },
}

impl PoolEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PoolEvent::PairCreated { .. } => "PairCreated",
            PoolEvent::Provide { .. } => "Provide",
            PoolEvent::Withdraw { .. } => "Withdraw",
            PoolEvent::Swap { .. } => "Swap",
        }
    }
}

/// Receiver of committed-state notifications.
///
/// Called with the emitting component's lock held; implementations must not
/// call back into the registry or pool.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PoolEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: PoolEvent) {}
}

/// In-memory event collector
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<PoolEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Take all collected events, leaving the log empty
    pub fn drain(&self) -> Vec<PoolEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: PoolEvent) {
        log::debug!("event {}: {:?}", event.name(), event);
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}
