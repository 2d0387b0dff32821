//! Remote collection mirroring.
//!
//! # Responsibility
//! - Map store snapshots into disposable item caches.
//! - Own the standing subscription and its release.
//!
//! # Invariants
//! - The cache is replaced wholesale per notification, never merged.
//! - Each applied notification gets a strictly increasing version.
//! - After `stop`, no notification reaches the state container.

pub mod cache;
pub mod synchronizer;

pub use cache::{map_document, DocumentMappingError, SnapshotCache};
pub use synchronizer::CacheSynchronizer;
