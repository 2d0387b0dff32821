//! Store-backed to-do list controller.
//!
//! # Responsibility
//! - Start the cache synchronizer and expose the list read model.
//! - Dispatch create/toggle/delete as write-throughs to the store.
//! - Surface store failures to callers and into `ListState::last_error`.
//!
//! # Invariants
//! - Mutations never touch the cache; the echo notification does.
//! - Blank titles never reach the store.
//! - After `dispose`, mutations fail with `ControllerError::Disposed` and
//!   late notifications change nothing.

use super::{ControllerError, ControllerResult};
use crate::config::TodoSyncConfig;
use crate::model::todo::{is_blank_title, TodoId, TodoItem};
use crate::state::{ListAction, ListError, ListState, ListView, LoadPhase, Operation};
use crate::store::{
    DocumentStore, FieldValue, Fields, StoreError, FIELD_COMPLETED, FIELD_CREATED_AT, FIELD_TITLE,
};
use crate::sync::CacheSynchronizer;
use crate::view::{Filter, SortAxis, SortMode};
use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Notification-driven list over one store collection.
pub struct TodoListController<S: DocumentStore> {
    store: S,
    collection: String,
    state: Rc<RefCell<ListState>>,
    sync: Option<CacheSynchronizer>,
}

impl<S: DocumentStore> TodoListController<S> {
    /// Opens the standing subscription and returns a controller in
    /// `Loading` state.
    ///
    /// # Errors
    /// Returns `ControllerError::Store` when the subscription is refused.
    pub fn start(store: S, collection: impl Into<String>) -> ControllerResult<Self> {
        let collection = collection.into();
        let state = Rc::new(RefCell::new(ListState::remote()));

        let sync = match CacheSynchronizer::start(&store, &collection, &state) {
            Ok(sync) => sync,
            Err(err) => {
                error!(
                    "event=controller_start module=controller status=error collection={} error={}",
                    collection, err
                );
                return Err(err.into());
            }
        };
        info!(
            "event=controller_start module=controller status=ok collection={}",
            collection
        );

        Ok(Self {
            store,
            collection,
            state,
            sync: Some(sync),
        })
    }

    /// Starts on the collection named by `config`.
    pub fn from_config(store: S, config: &TodoSyncConfig) -> ControllerResult<Self> {
        Self::start(store, config.collection.clone())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn is_disposed(&self) -> bool {
        self.sync.is_none()
    }

    /// Writes a new document unless `title` is blank.
    ///
    /// The title is stored exactly as typed. Returns `Ok(None)` for blank
    /// input, `Ok(Some(id))` once the store accepted the write.
    pub fn create(&self, title: &str) -> ControllerResult<Option<TodoId>> {
        self.ensure_live()?;
        if is_blank_title(title) {
            debug!(
                "event=todo_create module=controller status=ok skipped=true reason=blank_title"
            );
            return Ok(None);
        }

        let mut fields = Fields::new();
        fields.insert(FIELD_TITLE.to_string(), FieldValue::String(title.to_string()));
        fields.insert(FIELD_COMPLETED.to_string(), FieldValue::Bool(false));
        fields.insert(FIELD_CREATED_AT.to_string(), FieldValue::ServerTimestamp);

        match self.store.create(&self.collection, fields) {
            Ok(id) => {
                info!(
                    "event=todo_create module=controller status=ok collection={} id={}",
                    self.collection, id
                );
                Ok(Some(id))
            }
            Err(err) => Err(self.record_failure(Operation::Create, err)),
        }
    }

    /// Replaces the draft input text.
    pub fn set_draft(&self, text: impl Into<String>) {
        self.state
            .borrow_mut()
            .apply(ListAction::DraftChanged(text.into()));
    }

    /// Creates an item from the draft.
    ///
    /// A blank draft is left as is. Otherwise the draft is cleared before
    /// the write is issued, whatever its outcome.
    pub fn submit_draft(&self) -> ControllerResult<Option<TodoId>> {
        self.ensure_live()?;
        let draft = self.state.borrow().draft().to_string();
        if is_blank_title(&draft) {
            return Ok(None);
        }
        self.state.borrow_mut().apply(ListAction::DraftCleared);
        self.create(&draft)
    }

    /// Writes `completed = !current_completed` without reading first.
    pub fn toggle_complete(&self, id: &str, current_completed: bool) -> ControllerResult<()> {
        self.ensure_live()?;

        let mut fields = Fields::new();
        fields.insert(
            FIELD_COMPLETED.to_string(),
            FieldValue::Bool(!current_completed),
        );

        match self.store.update(&self.collection, id, fields) {
            Ok(()) => {
                info!(
                    "event=todo_toggle module=controller status=ok collection={} id={} completed={}",
                    self.collection, id, !current_completed
                );
                Ok(())
            }
            Err(err) => Err(self.record_failure(Operation::Toggle, err)),
        }
    }

    /// Removes the document `id`.
    pub fn delete(&self, id: &str) -> ControllerResult<()> {
        self.ensure_live()?;

        match self.store.delete(&self.collection, id) {
            Ok(()) => {
                info!(
                    "event=todo_delete module=controller status=ok collection={} id={}",
                    self.collection, id
                );
                Ok(())
            }
            Err(err) => Err(self.record_failure(Operation::Delete, err)),
        }
    }

    /// Returns whether the filter changed.
    pub fn select_filter(&self, filter: Filter) -> bool {
        self.state
            .borrow_mut()
            .apply(ListAction::FilterSelected(filter))
    }

    /// Advances the title sort control and returns the new mode.
    pub fn click_title_sort(&self) -> SortMode {
        self.click_sort(SortAxis::Title)
    }

    /// Advances the time sort control and returns the new mode.
    pub fn click_time_sort(&self) -> SortMode {
        self.click_sort(SortAxis::Time)
    }

    fn click_sort(&self, axis: SortAxis) -> SortMode {
        let mut state = self.state.borrow_mut();
        state.apply(ListAction::SortClicked(axis));
        state.sort()
    }

    pub fn dismiss_error(&self) {
        self.state.borrow_mut().apply(ListAction::ErrorDismissed);
    }

    pub fn view(&self) -> ListView {
        self.state.borrow().to_view()
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.borrow().phase()
    }

    pub fn filter(&self) -> Filter {
        self.state.borrow().filter()
    }

    pub fn sort(&self) -> SortMode {
        self.state.borrow().sort()
    }

    pub fn draft(&self) -> String {
        self.state.borrow().draft().to_string()
    }

    pub fn snapshot_version(&self) -> u64 {
        self.state.borrow().snapshot_version()
    }

    pub fn last_error(&self) -> Option<ListError> {
        self.state.borrow().last_error().cloned()
    }

    /// Cached item by id, ignoring filter and sort.
    pub fn item(&self, id: &str) -> Option<TodoItem> {
        self.state.borrow().item(id).cloned()
    }

    /// Cancels the subscription. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(mut sync) = self.sync.take() {
            sync.stop();
            info!(
                "event=controller_dispose module=controller status=ok collection={}",
                self.collection
            );
        }
    }

    fn ensure_live(&self) -> ControllerResult<()> {
        if self.is_disposed() {
            return Err(ControllerError::Disposed);
        }
        Ok(())
    }

    fn record_failure(&self, operation: Operation, err: StoreError) -> ControllerError {
        error!(
            "event=todo_{} module=controller status=error collection={} error={}",
            operation.as_str(),
            self.collection,
            err
        );
        self.state.borrow_mut().apply(ListAction::OperationFailed {
            operation,
            message: err.to_string(),
        });
        ControllerError::Store(err)
    }
}
