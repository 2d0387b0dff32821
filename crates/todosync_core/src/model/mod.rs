//! Domain model for to-do list items.
//!
//! # Responsibility
//! - Define the item shape shared by the remote and in-memory list variants.
//! - Own title validation used by every create path.
//!
//! # Invariants
//! - Every item is identified by a store-assigned `TodoId`.
//! - Titles are never blank once an item exists.

pub mod todo;
