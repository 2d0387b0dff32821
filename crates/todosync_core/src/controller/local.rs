//! In-memory to-do list.
//!
//! # Responsibility
//! - Load a seed list once and keep every later change in memory.
//! - Share filter, title sort and draft handling with the remote list.
//!
//! # Invariants
//! - Ids stay unique: duplicate seed ids are dropped and new ids continue
//!   after the highest numeric id seen.
//! - Seed failure still ends loading, with an empty list and a surfaced
//!   error.
//! - Items carry no creation time, so time sort is unavailable.

use crate::config::TodoSyncConfig;
use crate::model::todo::{is_blank_title, CreatedAt, TodoId, TodoItem};
use crate::seed::SeedSource;
use crate::state::{ListAction, ListError, ListState, ListView, LoadPhase, Operation};
use crate::view::{Filter, SortAxis, SortMode};
use log::{debug, error, info, warn};
use std::collections::BTreeSet;

/// List whose only source of truth is local memory.
#[derive(Debug, Clone)]
pub struct LocalTodoList {
    state: ListState,
    next_id: u64,
}

impl Default for LocalTodoList {
    fn default() -> Self {
        Self::new(TodoSyncConfig::default().local_id_start)
    }
}

impl LocalTodoList {
    /// Creates a list in `Loading` state whose ids continue after
    /// `id_start`.
    pub fn new(id_start: u64) -> Self {
        Self {
            state: ListState::local(),
            next_id: id_start,
        }
    }

    pub fn from_config(config: &TodoSyncConfig) -> Self {
        Self::new(config.local_id_start)
    }

    /// Fetches the seed list and leaves `Loading` whatever the outcome.
    ///
    /// Entries repeating an earlier id are dropped. Returns the number of
    /// loaded items.
    pub fn load_seed<S: SeedSource + ?Sized>(&mut self, source: &S) -> usize {
        match source.fetch() {
            Ok(entries) => {
                let mut seen = BTreeSet::new();
                let mut items = Vec::with_capacity(entries.len());
                for entry in entries {
                    if is_blank_title(&entry.title) {
                        continue;
                    }
                    if !seen.insert(entry.id) {
                        warn!(
                            "event=seed_entry_skipped module=controller status=error id={} reason=duplicate_id",
                            entry.id
                        );
                        continue;
                    }
                    self.next_id = self.next_id.max(entry.id);
                    items.push(entry.into_item());
                }
                let count = items.len();
                self.state.apply(ListAction::SeedLoaded(items));
                info!(
                    "event=seed_load module=controller status=ok items={} next_id={}",
                    count, self.next_id
                );
                count
            }
            Err(err) => {
                error!(
                    "event=seed_load module=controller status=error error={}",
                    err
                );
                self.state.apply(ListAction::SeedFailed(err.to_string()));
                0
            }
        }
    }

    /// Appends a new open item unless `title` is blank; clears the draft.
    ///
    /// Returns `None` without appending when the id space is exhausted; the
    /// failure is recorded as the list's last error.
    pub fn create(&mut self, title: &str) -> Option<TodoId> {
        if is_blank_title(title) {
            debug!("event=todo_create module=controller status=ok skipped=true reason=blank_title");
            return None;
        }

        let Some(next_id) = self.next_id.checked_add(1) else {
            error!(
                "event=todo_create module=controller status=error mode=local reason=id_exhausted"
            );
            self.state.apply(ListAction::OperationFailed {
                operation: Operation::Create,
                message: "no item ids left".to_string(),
            });
            return None;
        };
        self.next_id = next_id;
        let id = next_id.to_string();
        self.state.apply(ListAction::ItemAppended(TodoItem {
            id: id.clone(),
            title: title.to_string(),
            completed: false,
            created_at: CreatedAt::Absent,
        }));
        self.state.apply(ListAction::DraftCleared);
        debug!(
            "event=todo_create module=controller status=ok mode=local id={}",
            id
        );
        Some(id)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.apply(ListAction::DraftChanged(text.into()));
    }

    /// Creates an item from the draft; a blank draft is left as is.
    pub fn submit_draft(&mut self) -> Option<TodoId> {
        let draft = self.state.draft().to_string();
        self.create(&draft)
    }

    /// Flips `completed` of `id`. Returns `false` for unknown ids.
    pub fn toggle_complete(&mut self, id: &str) -> bool {
        self.state.apply(ListAction::ItemToggled(id.to_string()))
    }

    /// Removes `id`. Returns `false` for unknown ids.
    pub fn delete(&mut self, id: &str) -> bool {
        self.state.apply(ListAction::ItemRemoved(id.to_string()))
    }

    pub fn select_filter(&mut self, filter: Filter) -> bool {
        self.state.apply(ListAction::FilterSelected(filter))
    }

    pub fn click_title_sort(&mut self) -> SortMode {
        self.state.apply(ListAction::SortClicked(SortAxis::Title));
        self.state.sort()
    }

    /// Time sort is unavailable here; the mode is returned unchanged.
    pub fn click_time_sort(&mut self) -> SortMode {
        self.state.apply(ListAction::SortClicked(SortAxis::Time));
        self.state.sort()
    }

    pub fn dismiss_error(&mut self) {
        self.state.apply(ListAction::ErrorDismissed);
    }

    pub fn view(&self) -> ListView {
        self.state.to_view()
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&ListError> {
        self.state.last_error()
    }

    /// Id the next created item will get; saturates at `u64::MAX`.
    pub fn peek_next_id(&self) -> u64 {
        self.next_id.saturating_add(1)
    }
}
