//! In-process real-time document store.
//!
//! # Responsibility
//! - Provide a `DocumentStore` with real subscribe/notify semantics for
//!   tests and local demos.
//! - Model the event loop explicitly: notifications are queued by writes and
//!   handed to listeners only by `deliver_next`/`deliver_pending`.
//!
//! # Invariants
//! - Every successful write queues one full-collection snapshot per
//!   subscriber of that collection.
//! - `ServerTimestamp` sentinels are resolved to the store clock at commit.
//! - Cancelled subscriptions never receive queued notifications.

use super::{
    validate_collection, DocumentId, DocumentSnapshot, DocumentStore, FieldValue, Fields,
    Snapshot, SnapshotListener, StoreError, StoreResult, Subscription,
};
use log::debug;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

type Clock = Box<dyn FnMut() -> i64>;

struct ListenerSlot {
    collection: String,
    /// `None` while the listener is being invoked.
    listener: Option<SnapshotListener>,
}

struct Notification {
    listener_id: u64,
    event: StoreResult<Snapshot>,
}

struct MemoryState {
    collections: BTreeMap<String, Vec<DocumentSnapshot>>,
    listeners: BTreeMap<u64, ListenerSlot>,
    queue: VecDeque<Notification>,
    next_listener_id: u64,
    clock: Clock,
    latency_compensation: bool,
    injected_failure: Option<StoreError>,
}

impl MemoryState {
    fn snapshot_of(&self, collection: &str, has_pending_writes: bool) -> Snapshot {
        Snapshot {
            documents: self
                .collections
                .get(collection)
                .cloned()
                .unwrap_or_default(),
            has_pending_writes,
        }
    }

    fn enqueue_for_collection(&mut self, collection: &str, event: StoreResult<Snapshot>) {
        let listener_ids = self
            .listeners
            .iter()
            .filter(|(_, slot)| slot.collection == collection)
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        for listener_id in listener_ids {
            self.queue.push_back(Notification {
                listener_id,
                event: event.clone(),
            });
        }
    }

    fn take_injected_failure(&mut self) -> StoreResult<()> {
        match self.injected_failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn resolve_server_timestamps(&mut self, fields: Fields) -> Fields {
        let mut now = None;
        fields
            .into_iter()
            .map(|(name, value)| match value {
                FieldValue::ServerTimestamp => {
                    let instant = *now.get_or_insert_with(|| (self.clock)());
                    (name, FieldValue::Timestamp(instant))
                }
                other => (name, other),
            })
            .collect()
    }
}

/// Shared-handle in-memory store. Clones address the same data.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    inner: Rc<RefCell<MemoryState>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Creates an empty store using the system clock.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryState {
                collections: BTreeMap::new(),
                listeners: BTreeMap::new(),
                queue: VecDeque::new(),
                next_listener_id: 1,
                clock: Box::new(system_epoch_ms),
                latency_compensation: false,
                injected_failure: None,
            })),
        }
    }

    /// Replaces the clock used to resolve server timestamps.
    pub fn with_clock(self, clock: impl FnMut() -> i64 + 'static) -> Self {
        self.inner.borrow_mut().clock = Box::new(clock);
        self
    }

    /// When enabled, every create first queues a local snapshot holding the
    /// unresolved timestamp, followed by the committed snapshot.
    pub fn with_latency_compensation(self, enabled: bool) -> Self {
        self.inner.borrow_mut().latency_compensation = enabled;
        self
    }

    /// Makes the next write fail with `error`.
    pub fn fail_next_write(&self, error: StoreError) {
        self.inner.borrow_mut().injected_failure = Some(error);
    }

    /// Queues a subscription error for every listener of `collection`.
    pub fn emit_error(&self, collection: &str, error: StoreError) {
        self.inner
            .borrow_mut()
            .enqueue_for_collection(collection, Err(error));
    }

    /// Delivers queued notifications in order and returns how many ran.
    pub fn deliver_pending(&self) -> usize {
        let mut delivered = 0;
        while self.deliver_next() {
            delivered += 1;
        }
        delivered
    }

    /// Delivers the oldest deliverable notification.
    ///
    /// Returns `false` when the queue is empty, or when the next listener is
    /// already running further up the stack.
    pub fn deliver_next(&self) -> bool {
        let (listener_id, event, mut listener) = {
            let mut state = self.inner.borrow_mut();
            loop {
                let Some(notification) = state.queue.pop_front() else {
                    return false;
                };
                let Some(slot) = state.listeners.get_mut(&notification.listener_id) else {
                    continue;
                };
                match slot.listener.take() {
                    Some(listener) => {
                        break (notification.listener_id, notification.event, listener);
                    }
                    None => {
                        state.queue.push_front(notification);
                        return false;
                    }
                }
            }
        };

        listener(event);

        if let Some(slot) = self.inner.borrow_mut().listeners.get_mut(&listener_id) {
            slot.listener = Some(listener);
        }
        true
    }

    pub fn pending_notifications(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Returns committed documents of `collection` in store order.
    pub fn documents(&self, collection: &str) -> Vec<DocumentSnapshot> {
        self.inner
            .borrow()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<DocumentSnapshot> {
        self.inner
            .borrow()
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn subscribe(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> StoreResult<Subscription> {
        validate_collection(collection)?;

        let mut state = self.inner.borrow_mut();
        let listener_id = state.next_listener_id;
        state.next_listener_id += 1;
        state.listeners.insert(
            listener_id,
            ListenerSlot {
                collection: collection.to_string(),
                listener: Some(listener),
            },
        );
        let initial = state.snapshot_of(collection, false);
        state.queue.push_back(Notification {
            listener_id,
            event: Ok(initial),
        });
        debug!(
            "event=store_subscribe module=store status=ok collection={} listener_id={}",
            collection, listener_id
        );

        let weak: Weak<RefCell<MemoryState>> = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut state = inner.borrow_mut();
                state.listeners.remove(&listener_id);
                state
                    .queue
                    .retain(|notification| notification.listener_id != listener_id);
                debug!(
                    "event=store_unsubscribe module=store status=ok listener_id={}",
                    listener_id
                );
            }
        }))
    }

    fn create(&self, collection: &str, fields: Fields) -> StoreResult<DocumentId> {
        validate_collection(collection)?;

        let mut state = self.inner.borrow_mut();
        state.take_injected_failure()?;

        let id = Uuid::new_v4().simple().to_string();
        if state.latency_compensation {
            let mut local = state.snapshot_of(collection, true);
            local.documents.push(DocumentSnapshot {
                id: id.clone(),
                fields: fields.clone(),
            });
            state.enqueue_for_collection(collection, Ok(local));
        }

        let resolved = state.resolve_server_timestamps(fields);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(DocumentSnapshot {
                id: id.clone(),
                fields: resolved,
            });
        let committed = state.snapshot_of(collection, false);
        state.enqueue_for_collection(collection, Ok(committed));
        debug!(
            "event=store_create module=store status=ok collection={} id={}",
            collection, id
        );
        Ok(id)
    }

    fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        validate_collection(collection)?;

        let mut state = self.inner.borrow_mut();
        state.take_injected_failure()?;

        let resolved = state.resolve_server_timestamps(fields);
        let document = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        document.fields.extend(resolved);

        let committed = state.snapshot_of(collection, false);
        state.enqueue_for_collection(collection, Ok(committed));
        debug!(
            "event=store_update module=store status=ok collection={} id={}",
            collection, id
        );
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        validate_collection(collection)?;

        let mut state = self.inner.borrow_mut();
        state.take_injected_failure()?;

        let removed = match state.collections.get_mut(collection) {
            Some(docs) => {
                let before = docs.len();
                docs.retain(|doc| doc.id != id);
                docs.len() != before
            }
            None => false,
        };

        if removed {
            let committed = state.snapshot_of(collection, false);
            state.enqueue_for_collection(collection, Ok(committed));
        }
        debug!(
            "event=store_delete module=store status=ok collection={} id={} removed={}",
            collection, id, removed
        );
        Ok(())
    }
}

fn system_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
