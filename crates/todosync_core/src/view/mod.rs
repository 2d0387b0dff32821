//! Displayed-list derivation.
//!
//! # Responsibility
//! - Filter and sort a cached item list into the sequence a view renders.
//! - Own the sort-control cycling rules.
//!
//! # Invariants
//! - Derivation is a pure function of (items, filter, sort).
//! - Sorting is stable: equal keys keep the delivered order.

pub mod derive;
pub mod filter;
pub mod sort;

pub use derive::derive_view;
pub use filter::Filter;
pub use sort::{compare_titles, SortAxis, SortMode};
