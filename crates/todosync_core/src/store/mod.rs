//! Real-time document store contract.
//!
//! # Responsibility
//! - Define the subscribe/mutate surface the list controller depends on.
//! - Keep store transport details out of sync, view and controller code.
//!
//! # Invariants
//! - A snapshot always carries the full current document set of a collection.
//! - Listeners are invoked one at a time, never re-entrantly for the same
//!   subscription.
//! - Dropping or cancelling a `Subscription` stops further deliveries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub mod memory;

pub use memory::InMemoryDocumentStore;

/// Field name of the item title.
pub const FIELD_TITLE: &str = "title";
/// Field name of the completion flag.
pub const FIELD_COMPLETED: &str = "completed";
/// Field name of the server-assigned creation timestamp.
pub const FIELD_CREATED_AT: &str = "createdAt";

/// Store-assigned document identifier.
pub type DocumentId = String;

/// Document body keyed by field name.
pub type Fields = BTreeMap<String, FieldValue>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Callback receiving every notification of one subscription.
pub type SnapshotListener = Box<dyn FnMut(StoreResult<Snapshot>)>;

/// One field value of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
    /// Resolved instant in Unix epoch milliseconds.
    Timestamp(i64),
    /// Write-time sentinel resolved to the commit instant by the store.
    ServerTimestamp,
}

/// One document as delivered in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub fields: Fields,
}

impl DocumentSnapshot {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}

/// Point-in-time view of a whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Documents in store-defined order.
    pub documents: Vec<DocumentSnapshot>,
    /// True when the snapshot reflects local writes not yet committed.
    pub has_pending_writes: bool,
}

/// Store-level failures surfaced to callers and listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Target document does not exist (update paths only).
    NotFound(DocumentId),
    /// Collection name is empty or malformed.
    InvalidCollection(String),
    /// Caller lacks access to the collection.
    PermissionDenied(String),
    /// Store could not be reached or rejected the request transiently.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidCollection(name) => write!(f, "invalid collection: `{name}`"),
            Self::PermissionDenied(message) => write!(f, "permission denied: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {}

/// Guard for one standing subscription.
///
/// Cancellation runs exactly once, either through `cancel` or on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the subscription explicitly.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Subscribe/mutate interface of a real-time document store.
///
/// Writes return once the store accepted them. Their visible effect on a
/// subscriber arrives later through a snapshot notification.
pub trait DocumentStore {
    /// Opens a standing subscription on the whole collection.
    fn subscribe(&self, collection: &str, listener: SnapshotListener)
        -> StoreResult<Subscription>;
    /// Creates a document and returns its store-assigned id.
    fn create(&self, collection: &str, fields: Fields) -> StoreResult<DocumentId>;
    /// Merges `fields` into an existing document.
    fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;
    /// Removes a document. Missing documents are not an error.
    fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Rc<S> {
    fn subscribe(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> StoreResult<Subscription> {
        (**self).subscribe(collection, listener)
    }

    fn create(&self, collection: &str, fields: Fields) -> StoreResult<DocumentId> {
        (**self).create(collection, fields)
    }

    fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        (**self).update(collection, id, fields)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete(collection, id)
    }
}

/// Rejects collection names the store cannot address.
pub fn validate_collection(collection: &str) -> StoreResult<()> {
    let trimmed = collection.trim();
    if trimmed.is_empty() || trimmed != collection || collection.contains('/') {
        return Err(StoreError::InvalidCollection(collection.to_string()));
    }
    Ok(())
}
