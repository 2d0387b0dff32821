//! List state container and reducer.
//!
//! # Responsibility
//! - Hold everything a to-do view renders: cache, filter, sort, draft and
//!   the last surfaced error.
//! - Apply every state transition through `ListState::apply`, so list
//!   behavior is testable without a store or a rendering engine.
//!
//! # Invariants
//! - While `Loading`, no list is renderable.
//! - Snapshot caches are applied wholesale and only when their version is
//!   newer than the one already held.
//! - Filter and sort changes never touch the cache.

use crate::model::todo::{TodoId, TodoItem};
use crate::sync::cache::SnapshotCache;
use crate::view::{derive_view, Filter, SortAxis, SortMode};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Lifecycle of the cached list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    /// No data has arrived yet.
    Loading,
    /// Cache mirrors the latest data.
    Ready,
    /// Data source failed; any earlier cache is stale.
    Failed,
}

/// Operation a surfaced error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Subscribe,
    Create,
    Toggle,
    Delete,
    LoadSeed,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Create => "create",
            Self::Toggle => "toggle",
            Self::Delete => "delete",
            Self::LoadSeed => "load_seed",
        }
    }
}

/// Error kept in state until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListError {
    pub operation: Operation,
    pub message: String,
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation.as_str(), self.message)
    }
}

/// Every transition the list state accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// A notification was mapped into a fresh cache.
    SnapshotApplied(SnapshotCache),
    /// The standing subscription reported an error.
    SubscriptionFailed(String),
    /// The in-memory variant finished loading its seed list.
    SeedLoaded(Vec<TodoItem>),
    /// Seed loading failed; the list becomes ready and empty.
    SeedFailed(String),
    /// In-memory variant: append one item.
    ItemAppended(TodoItem),
    /// In-memory variant: flip `completed` of one item.
    ItemToggled(TodoId),
    /// In-memory variant: remove one item.
    ItemRemoved(TodoId),
    FilterSelected(Filter),
    SortClicked(SortAxis),
    DraftChanged(String),
    DraftCleared,
    OperationFailed {
        operation: Operation,
        message: String,
    },
    ErrorDismissed,
}

/// State container for one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    phase: LoadPhase,
    loaded: bool,
    items: Vec<TodoItem>,
    snapshot_version: u64,
    has_pending_writes: bool,
    filter: Filter,
    sort: SortMode,
    draft: String,
    last_error: Option<ListError>,
    time_sort_enabled: bool,
}

impl ListState {
    /// State for the store-backed list; every sort mode is available.
    pub fn remote() -> Self {
        Self::with_time_sort(true)
    }

    /// State for the in-memory list; items carry no timestamp, so the time
    /// sort control is inert.
    pub fn local() -> Self {
        Self::with_time_sort(false)
    }

    fn with_time_sort(time_sort_enabled: bool) -> Self {
        Self {
            phase: LoadPhase::Loading,
            loaded: false,
            items: Vec::new(),
            snapshot_version: 0,
            has_pending_writes: false,
            filter: Filter::All,
            sort: SortMode::Default,
            draft: String::new(),
            last_error: None,
            time_sort_enabled,
        }
    }

    /// Applies one transition. Returns whether anything changed.
    pub fn apply(&mut self, action: ListAction) -> bool {
        match action {
            ListAction::SnapshotApplied(cache) => {
                if self.loaded && cache.version <= self.snapshot_version {
                    return false;
                }
                self.items = cache.items;
                self.snapshot_version = cache.version;
                self.has_pending_writes = cache.has_pending_writes;
                self.phase = LoadPhase::Ready;
                self.loaded = true;
                if matches!(
                    self.last_error,
                    Some(ListError {
                        operation: Operation::Subscribe,
                        ..
                    })
                ) {
                    self.last_error = None;
                }
                true
            }
            ListAction::SubscriptionFailed(message) => {
                self.phase = LoadPhase::Failed;
                self.last_error = Some(ListError {
                    operation: Operation::Subscribe,
                    message,
                });
                true
            }
            ListAction::SeedLoaded(items) => {
                self.items = items;
                self.phase = LoadPhase::Ready;
                self.loaded = true;
                true
            }
            ListAction::SeedFailed(message) => {
                self.items.clear();
                self.phase = LoadPhase::Ready;
                self.loaded = true;
                self.last_error = Some(ListError {
                    operation: Operation::LoadSeed,
                    message,
                });
                true
            }
            ListAction::ItemAppended(item) => {
                self.items.push(item);
                true
            }
            ListAction::ItemToggled(id) => match self.items.iter_mut().find(|item| item.id == id) {
                Some(item) => {
                    item.completed = !item.completed;
                    true
                }
                None => false,
            },
            ListAction::ItemRemoved(id) => {
                let before = self.items.len();
                self.items.retain(|item| item.id != id);
                self.items.len() != before
            }
            ListAction::FilterSelected(filter) => replace(&mut self.filter, filter),
            ListAction::SortClicked(axis) => {
                if axis == SortAxis::Time && !self.time_sort_enabled {
                    return false;
                }
                let next = self.sort.next(axis);
                replace(&mut self.sort, next)
            }
            ListAction::DraftChanged(text) => replace(&mut self.draft, text),
            ListAction::DraftCleared => replace(&mut self.draft, String::new()),
            ListAction::OperationFailed { operation, message } => {
                self.last_error = Some(ListError { operation, message });
                true
            }
            ListAction::ErrorDismissed => self.last_error.take().is_some(),
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Full cache in delivered order, regardless of filter and sort.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn snapshot_version(&self) -> u64 {
        self.snapshot_version
    }

    pub fn has_pending_writes(&self) -> bool {
        self.has_pending_writes
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn last_error(&self) -> Option<&ListError> {
        self.last_error.as_ref()
    }

    pub fn time_sort_enabled(&self) -> bool {
        self.time_sort_enabled
    }

    /// Displayed sequence, or `None` while nothing may be rendered.
    pub fn visible(&self) -> Option<Vec<&TodoItem>> {
        if !self.is_renderable() {
            return None;
        }
        Some(derive_view(&self.items, self.filter, self.sort))
    }

    fn is_renderable(&self) -> bool {
        match self.phase {
            LoadPhase::Loading => false,
            LoadPhase::Ready => true,
            LoadPhase::Failed => self.loaded,
        }
    }

    /// Owned read model for renderers.
    pub fn to_view(&self) -> ListView {
        let items = self
            .visible()
            .map(|visible| visible.into_iter().cloned().collect())
            .unwrap_or_default();
        ListView {
            phase: self.phase,
            renderable: self.is_renderable(),
            items,
            total: self.items.len(),
            active: self.items.iter().filter(|item| item.is_active()).count(),
            filter: self.filter,
            sort: self.sort,
            draft: self.draft.clone(),
            snapshot_version: self.snapshot_version,
            has_pending_writes: self.has_pending_writes,
            last_error: self.last_error.clone(),
        }
    }
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub phase: LoadPhase,
    /// False while loading; `items` is empty then.
    pub renderable: bool,
    /// Filtered and sorted items.
    pub items: Vec<TodoItem>,
    /// Cache size before filtering.
    pub total: usize,
    /// Open items in the cache.
    pub active: usize,
    pub filter: Filter,
    pub sort: SortMode,
    pub draft: String,
    pub snapshot_version: u64,
    pub has_pending_writes: bool,
    pub last_error: Option<ListError>,
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
