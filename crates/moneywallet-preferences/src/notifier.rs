//! In-process notification of current wallet changes.
//!
//! [`WalletObserverRegistry`] is a synchronous fan-out: [`publish`](WalletObserverRegistry::publish)
//! calls every registered observer inline, in registration order, on the publishing thread.
//! Nothing is queued or persisted, so an observer registered after an event never sees it.
//!
//! Observers must be fast. A slow observer blocks the setter that triggered the event.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
};

/// Type alias for observer error results
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for reacting to current wallet changes.
///
/// The wallet id is [`NO_CURRENT_WALLET`](crate::NO_CURRENT_WALLET) when the selection is
/// cleared. An error returned here is logged and does not prevent delivery to the remaining
/// observers.
pub trait CurrentWalletObserver: Send + Sync {
    /// Called after the new current wallet has been persisted.
    fn on_current_wallet_changed(&self, wallet_id: i64) -> Result<(), ObserverError>;
}

impl<F> CurrentWalletObserver for F
where
    F: Fn(i64) -> Result<(), ObserverError> + Send + Sync,
{
    fn on_current_wallet_changed(&self, wallet_id: i64) -> Result<(), ObserverError> {
        self(wallet_id)
    }
}

/// Identifies one registration in a [`WalletObserverRegistry`].
///
/// Handles are never reused, so a stale handle can't remove a later registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(u64);

/// Registry of current wallet observers.
#[derive(Default)]
pub struct WalletObserverRegistry {
    next_handle: AtomicU64,
    // Handles increase monotonically, so map order is registration order.
    observers: RwLock<BTreeMap<ObserverHandle, Arc<dyn CurrentWalletObserver>>>,
}

impl std::fmt::Debug for WalletObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

impl WalletObserverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. It receives every event published from now on, until the
    /// returned handle is unregistered.
    pub fn register(&self, observer: Arc<dyn CurrentWalletObserver>) -> ObserverHandle {
        let handle = ObserverHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .expect("Observer registry lock poisoned")
            .insert(handle, observer);
        handle
    }

    /// Unregister an observer.
    ///
    /// Returns whether a registration was removed. Unknown or already unregistered handles
    /// are a no-op.
    pub fn unregister(&self, handle: ObserverHandle) -> bool {
        self.observers
            .write()
            .expect("Observer registry lock poisoned")
            .remove(&handle)
            .is_some()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.observers
            .read()
            .expect("Observer registry lock poisoned")
            .len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver a current wallet change to every registered observer.
    ///
    /// The set of observers is captured when publishing starts. Observers may register or
    /// unregister from their callback; the change applies from the next publish.
    pub fn publish(&self, wallet_id: i64) {
        let observers: Vec<_> = self
            .observers
            .read()
            .expect("Observer registry lock poisoned")
            .iter()
            .map(|(handle, observer)| (*handle, Arc::clone(observer)))
            .collect();

        log::debug!(
            "Publishing current wallet {} to {} observers",
            wallet_id,
            observers.len()
        );

        for (handle, observer) in observers {
            if let Err(e) = observer.on_current_wallet_changed(wallet_id) {
                log::error!(
                    "Current wallet observer {:?} failed for wallet {}: {}",
                    handle,
                    wallet_id,
                    e
                );
            }
        }
    }
}
