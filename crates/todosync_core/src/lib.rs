//! Core logic for a synchronized to-do list.
//! Mirrors a remote document collection into list state and derives the
//! filtered, sorted view from it.

pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod seed;
pub mod state;
pub mod store;
pub mod sync;
pub mod view;

pub use config::{ConfigError, TodoSyncConfig};
pub use controller::{ControllerError, ControllerResult, LocalTodoList, TodoListController};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::todo::{CreatedAt, TodoId, TodoItem, TodoValidationError};
pub use seed::{JsonFileSeedSource, SeedError, SeedSource, SeedTodo, StaticSeedSource};
pub use state::{ListAction, ListError, ListState, ListView, LoadPhase, Operation};
pub use store::{
    DocumentId, DocumentSnapshot, DocumentStore, FieldValue, Fields, InMemoryDocumentStore,
    Snapshot, SnapshotListener, StoreError, StoreResult, Subscription,
};
pub use sync::{CacheSynchronizer, SnapshotCache};
pub use view::{derive_view, Filter, SortAxis, SortMode};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
