//! List controllers.
//!
//! # Responsibility
//! - `TodoListController`: store-backed list driven by notifications.
//! - `LocalTodoList`: in-memory list seeded once and mutated locally.
//!
//! # Invariants
//! - Controllers change state only through `ListState::apply`.
//! - The store-backed controller never inserts, flips or removes cached
//!   items itself; only notifications do.

pub mod local;
pub mod remote;

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use local::LocalTodoList;
pub use remote::TodoListController;

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Controller-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Controller was disposed; its subscription is gone.
    Disposed,
    Store(StoreError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disposed => write!(f, "todo list controller is disposed"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Disposed => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
