//! Standing subscription that mirrors a collection into list state.
//!
//! # Responsibility
//! - Open the whole-collection subscription and feed every notification to
//!   the state container as a versioned `SnapshotCache`.
//! - Release the subscription exactly once on `stop` or drop.
//!
//! # Invariants
//! - The listener holds only a weak reference to state, so a destroyed view
//!   is never kept alive by the store.
//! - Once stopped, the listener is inert even if the store still calls it.

use crate::state::{ListAction, ListState};
use crate::store::{DocumentStore, Snapshot, StoreResult, Subscription};
use crate::sync::cache::SnapshotCache;
use log::{debug, error, info};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Owner of one live subscription.
pub struct CacheSynchronizer {
    collection: String,
    active: Rc<Cell<bool>>,
    subscription: Option<Subscription>,
}

impl CacheSynchronizer {
    /// Subscribes to `collection` and starts mirroring into `state`.
    ///
    /// # Errors
    /// Returns the store error when the subscription cannot be opened.
    pub fn start<S: DocumentStore + ?Sized>(
        store: &S,
        collection: &str,
        state: &Rc<RefCell<ListState>>,
    ) -> StoreResult<Self> {
        let active = Rc::new(Cell::new(true));
        let listener = snapshot_listener(collection, Rc::downgrade(state), Rc::clone(&active));
        let subscription = store.subscribe(collection, Box::new(listener))?;
        info!(
            "event=sync_start module=sync status=ok collection={}",
            collection
        );

        Ok(Self {
            collection: collection.to_string(),
            active,
            subscription: Some(subscription),
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Cancels the subscription. Idempotent.
    pub fn stop(&mut self) {
        self.active.set(false);
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            info!(
                "event=sync_stop module=sync status=ok collection={}",
                self.collection
            );
        }
    }
}

impl Drop for CacheSynchronizer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn snapshot_listener(
    collection: &str,
    state: Weak<RefCell<ListState>>,
    active: Rc<Cell<bool>>,
) -> impl FnMut(StoreResult<Snapshot>) + 'static {
    let collection = collection.to_string();
    let mut next_version: u64 = 0;

    move |event| {
        if !active.get() {
            debug!(
                "event=snapshot_ignored module=sync status=ok collection={} reason=stopped",
                collection
            );
            return;
        }
        let Some(state) = state.upgrade() else {
            debug!(
                "event=snapshot_ignored module=sync status=ok collection={} reason=state_dropped",
                collection
            );
            return;
        };

        match event {
            Ok(snapshot) => {
                next_version += 1;
                let cache = SnapshotCache::from_snapshot(next_version, &snapshot);
                info!(
                    "event=snapshot_applied module=sync status=ok collection={} version={} items={} skipped={} pending_writes={}",
                    collection,
                    cache.version,
                    cache.items.len(),
                    cache.skipped,
                    cache.has_pending_writes
                );
                state.borrow_mut().apply(ListAction::SnapshotApplied(cache));
            }
            Err(err) => {
                error!(
                    "event=subscription_error module=sync status=error collection={} error={}",
                    collection, err
                );
                state
                    .borrow_mut()
                    .apply(ListAction::SubscriptionFailed(err.to_string()));
            }
        }
    }
}
