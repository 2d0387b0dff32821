//! To-do item domain model.
//!
//! # Responsibility
//! - Define the canonical record mirrored from the remote collection.
//! - Provide the creation-time title rule shared by all variants.
//!
//! # Invariants
//! - `id` is unique within a collection and stable for the item lifetime.
//! - `title` is not blank (whitespace-only titles are rejected at creation).
//! - `created_at` is only ever compared, never read as wall-clock time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque identifier assigned by the document store.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = String;

/// Creation instant of an item as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "epoch_ms", rename_all = "snake_case")]
pub enum CreatedAt {
    /// Store-resolved instant in Unix epoch milliseconds.
    Resolved(i64),
    /// Server timestamp written but not yet acknowledged by the store.
    Pending,
    /// No timestamp exists (in-memory variant, or a malformed document).
    Absent,
}

impl CreatedAt {
    /// Returns the resolved epoch milliseconds, if any.
    pub fn epoch_ms(self) -> Option<i64> {
        match self {
            Self::Resolved(ms) => Some(ms),
            Self::Pending | Self::Absent => None,
        }
    }

    /// Total order used by time sorting.
    ///
    /// Resolved instants order numerically. Unresolved values (pending or
    /// absent) sort after every resolved instant and are equal to each
    /// other, so a stable sort keeps their delivered order.
    pub fn sort_cmp(self, other: Self) -> Ordering {
        match (self.epoch_ms(), other.epoch_ms()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// One entry of the to-do list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    /// Display title exactly as typed (not trimmed).
    pub title: String,
    pub completed: bool,
    pub created_at: CreatedAt,
}

impl TodoItem {
    /// Builds an item after checking id and title invariants.
    pub fn new(
        id: impl Into<TodoId>,
        title: impl Into<String>,
        completed: bool,
        created_at: CreatedAt,
    ) -> Result<Self, TodoValidationError> {
        let item = Self {
            id: id.into(),
            title: title.into(),
            completed,
            created_at,
        };
        item.validate()?;
        Ok(item)
    }

    /// Validates item invariants.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is empty.
    /// - `BlankTitle` when `title` is empty after trimming.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id.is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        validate_title(&self.title)
    }

    /// Returns whether this item is still open.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Rejects titles that are empty after trimming.
pub fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    if is_blank_title(title) {
        return Err(TodoValidationError::BlankTitle);
    }
    Ok(())
}

pub fn is_blank_title(title: &str) -> bool {
    title.trim().is_empty()
}

/// Item invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyId,
    BlankTitle,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "todo id must not be empty"),
            Self::BlankTitle => write!(f, "todo title must not be blank"),
        }
    }
}

impl Error for TodoValidationError {}
