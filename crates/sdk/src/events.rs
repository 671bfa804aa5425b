//! In-process notifications for settled composite operations.
//!
//! Listeners are registered per [`GameEvent`] and called synchronously, in
//! registration order, with the receipt of the transaction that settled.
//! Delivery happens on a snapshot of the listener list taken outside the lock,
//! so a listener may itself register or remove listeners; such changes apply
//! from the next delivery onward.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use armada_chain::Receipt;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::allowance::Operation;

/// Events emitted after a composite operation settles.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum GameEvent {
    ShipPurchased,
    VoyageExecuted,
    ShipUpgraded,
    DayFinished,
    WinnerClaimed,
}

impl From<Operation> for GameEvent {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::BuyShip => GameEvent::ShipPurchased,
            Operation::Voyage => GameEvent::VoyageExecuted,
            Operation::UpgradeShip => GameEvent::ShipUpgraded,
            Operation::FinishDay => GameEvent::DayFinished,
            Operation::ClaimWinnerReward => GameEvent::WinnerClaimed,
        }
    }
}

/// Handle returned by [`EventRegistry::on`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&Receipt) + Send + Sync>;

/// Typed observer registry keyed by [`GameEvent`].
#[derive(Default)]
pub struct EventRegistry {
    listeners: RwLock<HashMap<GameEvent, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`.
    pub fn on<F>(&self, event: GameEvent, listener: F) -> ListenerId
    where
        F: Fn(&Receipt) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event)
            .or_default()
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        for entries in listeners.values_mut() {
            if let Some(index) = entries.iter().position(|(entry, _)| *entry == id) {
                entries.remove(index);
                return true;
            }
        }
        false
    }

    /// Remove every listener for `event`.
    pub fn clear(&self, event: GameEvent) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&event);
    }

    pub fn listener_count(&self, event: GameEvent) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event)
            .map_or(0, Vec::len)
    }

    /// Deliver `event` to its listeners, returning how many completed.
    ///
    /// A panicking listener is logged and skipped; the rest still run.
    pub fn emit(&self, event: GameEvent, receipt: &Receipt) -> usize {
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        let mut delivered = 0;
        for listener in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(receipt))) {
                Ok(()) => delivered += 1,
                Err(_) => tracing::warn!(
                    %event,
                    hash = %receipt.transaction_hash,
                    "event listener panicked"
                ),
            }
        }
        delivered
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<GameEvent, usize> =
            listeners.iter().map(|(e, l)| (*e, l.len())).collect();
        f.debug_struct("EventRegistry")
            .field("listeners", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use armada_chain::{B256, ReceiptStatus};
    use strum::IntoEnumIterator;

    use super::*;

    fn receipt() -> Receipt {
        Receipt {
            transaction_hash: B256::repeat_byte(0x01),
            block_number: 7,
            gas_used: 21_000,
            status: ReceiptStatus::Success,
        }
    }

    #[test]
    fn event_names_are_camel_case() {
        let names: Vec<String> = GameEvent::iter().map(|e| e.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "shipPurchased",
                "voyageExecuted",
                "shipUpgraded",
                "dayFinished",
                "winnerClaimed"
            ]
        );
        assert_eq!("voyageExecuted".parse::<GameEvent>().unwrap(), GameEvent::VoyageExecuted);
        assert_eq!(GameEvent::from(Operation::FinishDay), GameEvent::DayFinished);
    }

    #[test]
    fn delivers_in_registration_order_to_matching_event_only() {
        let registry = EventRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            registry.on(GameEvent::ShipPurchased, move |r| {
                seen.lock().unwrap().push((tag, r.block_number));
            });
        }
        let other = Arc::clone(&seen);
        registry.on(GameEvent::DayFinished, move |_| {
            other.lock().unwrap().push(("other", 0));
        });

        assert_eq!(registry.emit(GameEvent::ShipPurchased, &receipt()), 2);
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn panicking_listener_does_not_stop_delivery() {
        let registry = EventRegistry::new();
        let calls = Arc::new(AtomicU64::new(0));

        registry.on(GameEvent::VoyageExecuted, |_| panic!("listener bug"));
        let counter = Arc::clone(&calls);
        registry.on(GameEvent::VoyageExecuted, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(registry.emit(GameEvent::VoyageExecuted, &receipt()), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn off_removes_only_that_listener() {
        let registry = EventRegistry::new();
        let a = registry.on(GameEvent::WinnerClaimed, |_| {});
        registry.on(GameEvent::WinnerClaimed, |_| {});

        assert!(registry.off(a));
        assert!(!registry.off(a));
        assert_eq!(registry.listener_count(GameEvent::WinnerClaimed), 1);

        registry.clear(GameEvent::WinnerClaimed);
        assert_eq!(registry.emit(GameEvent::WinnerClaimed, &receipt()), 0);
    }

    #[test]
    fn listener_may_register_during_delivery() {
        let registry = Arc::new(EventRegistry::new());
        let inner = Arc::clone(&registry);
        registry.on(GameEvent::ShipUpgraded, move |_| {
            inner.on(GameEvent::ShipUpgraded, |_| {});
        });

        assert_eq!(registry.emit(GameEvent::ShipUpgraded, &receipt()), 1);
        assert_eq!(registry.listener_count(GameEvent::ShipUpgraded), 2);
    }
}
