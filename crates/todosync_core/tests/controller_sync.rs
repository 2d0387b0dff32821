use std::cell::{Cell, RefCell};
use std::rc::Rc;
use todosync_core::{
    ControllerError, CreatedAt, DocumentId, DocumentSnapshot, DocumentStore, FieldValue, Fields,
    Filter, InMemoryDocumentStore, LoadPhase, Operation, Snapshot, SnapshotListener, SortMode,
    StoreError, StoreResult, Subscription, TodoListController,
};

const COLLECTION: &str = "todos";

fn started(store: &InMemoryDocumentStore) -> TodoListController<InMemoryDocumentStore> {
    let controller = TodoListController::start(store.clone(), COLLECTION).expect("start");
    store.deliver_pending();
    controller
}

fn visible_ids(controller: &TodoListController<InMemoryDocumentStore>) -> Vec<String> {
    controller
        .view()
        .items
        .into_iter()
        .map(|item| item.id)
        .collect()
}

#[test]
fn nothing_renders_before_the_first_notification() {
    let store = InMemoryDocumentStore::new();
    let controller = TodoListController::start(store.clone(), COLLECTION).expect("start");

    let view = controller.view();
    assert_eq!(view.phase, LoadPhase::Loading);
    assert!(!view.renderable);
    assert!(view.items.is_empty());

    assert_eq!(store.deliver_pending(), 1);
    let view = controller.view();
    assert_eq!(view.phase, LoadPhase::Ready);
    assert!(view.renderable);
    assert_eq!(view.total, 0);
}

#[test]
fn blank_titles_never_reach_the_store() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);

    assert_eq!(controller.create("").expect("create"), None);
    assert_eq!(controller.create("   ").expect("create"), None);
    assert_eq!(controller.create("\t\n").expect("create"), None);

    assert!(store.documents(COLLECTION).is_empty());
    assert_eq!(store.pending_notifications(), 0);
}

#[test]
fn create_writes_through_and_waits_for_the_echo() {
    let store = InMemoryDocumentStore::new().with_clock(|| 1_700_000_000_000);
    let controller = started(&store);

    let id = controller
        .create("Buy milk")
        .expect("create")
        .expect("id for non-blank title");

    let documents = store.documents(COLLECTION);
    assert_eq!(documents.len(), 1);
    let document = &documents[0];
    assert_eq!(document.id, id);
    assert_eq!(
        document.get("title"),
        Some(&FieldValue::String("Buy milk".to_string()))
    );
    assert_eq!(document.get("completed"), Some(&FieldValue::Bool(false)));
    assert_eq!(
        document.get("createdAt"),
        Some(&FieldValue::Timestamp(1_700_000_000_000))
    );

    // No optimistic insert: the cache only changes on delivery.
    assert_eq!(controller.view().total, 0);
    store.deliver_pending();

    let item = controller.item(&id).expect("item mirrored");
    assert_eq!(item.title, "Buy milk");
    assert!(!item.completed);
    assert_eq!(item.created_at, CreatedAt::Resolved(1_700_000_000_000));
}

#[test]
fn titles_are_stored_exactly_as_typed() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);

    let id = controller
        .create("  padded  ")
        .expect("create")
        .expect("id");
    store.deliver_pending();
    assert_eq!(controller.item(&id).expect("item").title, "  padded  ");
}

#[test]
fn toggle_flips_only_the_target_item() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);
    let first = controller.create("first").expect("create").expect("id");
    let second = controller.create("second").expect("create").expect("id");
    store.deliver_pending();

    controller.toggle_complete(&first, false).expect("toggle");
    assert!(!controller.item(&first).expect("item").completed);
    store.deliver_pending();

    assert!(controller.item(&first).expect("item").completed);
    assert!(!controller.item(&second).expect("item").completed);

    controller.toggle_complete(&first, true).expect("toggle back");
    store.deliver_pending();
    assert!(!controller.item(&first).expect("item").completed);
}

#[test]
fn delete_removes_the_item_from_every_view() {
    let store = InMemoryDocumentStore::new().with_clock({
        let mut now = 0;
        move || {
            now += 10;
            now
        }
    });
    let controller = started(&store);
    let keep = controller.create("keep").expect("create").expect("id");
    let gone = controller.create("gone").expect("create").expect("id");
    store.deliver_pending();
    controller.toggle_complete(&gone, false).expect("toggle");
    store.deliver_pending();

    controller.delete(&gone).expect("delete");
    store.deliver_pending();

    assert!(controller.item(&gone).is_none());
    for filter in Filter::ALL {
        controller.select_filter(filter);
        for _ in 0..3 {
            assert!(!visible_ids(&controller).contains(&gone));
            controller.click_title_sort();
        }
        for _ in 0..3 {
            assert!(!visible_ids(&controller).contains(&gone));
            controller.click_time_sort();
        }
    }
    controller.select_filter(Filter::All);
    assert_eq!(visible_ids(&controller), vec![keep]);
}

#[test]
fn filter_and_sort_controls_update_the_view() {
    let store = InMemoryDocumentStore::new().with_clock({
        let mut now = 100;
        move || {
            now -= 1;
            now
        }
    });
    let controller = started(&store);
    let banana = controller.create("banana").expect("create").expect("id");
    let apple = controller.create("Apple").expect("create").expect("id");
    let cherry = controller.create("cherry").expect("create").expect("id");
    store.deliver_pending();
    controller.toggle_complete(&apple, false).expect("toggle");
    store.deliver_pending();

    assert_eq!(
        visible_ids(&controller),
        vec![banana.clone(), apple.clone(), cherry.clone()]
    );

    assert_eq!(controller.click_title_sort(), SortMode::TitleAsc);
    assert_eq!(
        visible_ids(&controller),
        vec![apple.clone(), banana.clone(), cherry.clone()]
    );

    assert_eq!(controller.click_time_sort(), SortMode::TimeAsc);
    assert_eq!(
        visible_ids(&controller),
        vec![cherry.clone(), apple.clone(), banana.clone()]
    );

    assert!(controller.select_filter(Filter::Active));
    assert!(!controller.select_filter(Filter::Active));
    assert_eq!(visible_ids(&controller), vec![cherry.clone(), banana]);

    controller.select_filter(Filter::Completed);
    assert_eq!(visible_ids(&controller), vec![apple]);
    assert_eq!(controller.view().active, 2);
}

#[test]
fn write_failures_surface_as_last_error() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);

    store.fail_next_write(StoreError::PermissionDenied("read-only".to_string()));
    let err = controller.create("blocked").unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Store(StoreError::PermissionDenied(_))
    ));

    let last_error = controller.last_error().expect("error surfaced");
    assert_eq!(last_error.operation, Operation::Create);
    assert!(last_error.message.contains("read-only"));
    assert!(store.documents(COLLECTION).is_empty());

    controller.dismiss_error();
    assert!(controller.last_error().is_none());
}

#[test]
fn toggling_a_missing_document_reports_not_found() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);

    let err = controller.toggle_complete("missing", false).unwrap_err();
    assert!(matches!(err, ControllerError::Store(StoreError::NotFound(_))));
    assert_eq!(
        controller.last_error().expect("error").operation,
        Operation::Toggle
    );
}

#[test]
fn deleting_a_missing_document_succeeds_without_notification() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);

    controller.delete("missing").expect("delete");
    assert_eq!(store.pending_notifications(), 0);
    assert!(controller.last_error().is_none());
}

#[test]
fn submit_draft_clears_the_draft_even_when_the_write_fails() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);

    controller.set_draft("Buy milk");
    store.fail_next_write(StoreError::Unavailable("offline".to_string()));
    assert!(controller.submit_draft().is_err());
    assert_eq!(controller.draft(), "");
    assert!(controller.last_error().is_some());

    controller.set_draft("Buy bread");
    let id = controller.submit_draft().expect("submit").expect("id");
    assert_eq!(controller.draft(), "");
    store.deliver_pending();
    assert_eq!(controller.item(&id).expect("item").title, "Buy bread");
}

#[test]
fn latency_compensated_snapshot_shows_pending_time() {
    let store = InMemoryDocumentStore::new()
        .with_clock(|| 5_000)
        .with_latency_compensation(true);
    let controller = started(&store);

    let id = controller.create("queued").expect("create").expect("id");
    assert_eq!(store.pending_notifications(), 2);

    assert!(store.deliver_next());
    let view = controller.view();
    assert!(view.has_pending_writes);
    assert_eq!(
        controller.item(&id).expect("item").created_at,
        CreatedAt::Pending
    );

    // Sorting by time must tolerate the placeholder.
    controller.click_time_sort();
    assert_eq!(controller.view().items.len(), 1);

    assert!(store.deliver_next());
    assert!(!controller.view().has_pending_writes);
    assert_eq!(
        controller.item(&id).expect("item").created_at,
        CreatedAt::Resolved(5_000)
    );
    assert!(!store.deliver_next());
}

#[test]
fn subscription_errors_mark_the_list_failed() {
    let store = InMemoryDocumentStore::new();
    let controller = started(&store);
    controller.create("kept").expect("create");
    store.deliver_pending();

    store.emit_error(COLLECTION, StoreError::Unavailable("network".to_string()));
    store.deliver_pending();

    let view = controller.view();
    assert_eq!(view.phase, LoadPhase::Failed);
    assert!(view.renderable);
    assert_eq!(view.items.len(), 1);
    assert_eq!(
        view.last_error.expect("error").operation,
        Operation::Subscribe
    );

    controller.create("recovered").expect("create");
    store.deliver_pending();
    let view = controller.view();
    assert_eq!(view.phase, LoadPhase::Ready);
    assert!(view.last_error.is_none());
    assert_eq!(view.total, 2);
}

#[test]
fn two_controllers_on_one_store_converge() {
    let store = InMemoryDocumentStore::new();
    let left = started(&store);
    let right = started(&store);

    let id = left.create("shared").expect("create").expect("id");
    store.deliver_pending();
    assert_eq!(right.item(&id).expect("mirrored").title, "shared");

    right.toggle_complete(&id, false).expect("toggle");
    store.deliver_pending();
    assert!(left.item(&id).expect("item").completed);
}

#[test]
fn dispose_releases_the_store_listener() {
    let store = InMemoryDocumentStore::new();
    let mut controller = started(&store);
    assert_eq!(store.listener_count(), 1);

    controller.dispose();
    controller.dispose();
    assert!(controller.is_disposed());
    assert_eq!(store.listener_count(), 0);
    assert!(matches!(
        controller.create("late"),
        Err(ControllerError::Disposed)
    ));
    assert!(matches!(
        controller.delete("any"),
        Err(ControllerError::Disposed)
    ));
}

/// Store that keeps listeners after cancellation, as a slow backend might.
#[derive(Clone, Default)]
struct ScriptedStore {
    listeners: Rc<RefCell<Vec<SnapshotListener>>>,
    cancelled: Rc<Cell<usize>>,
}

impl ScriptedStore {
    fn push(&self, snapshot: Snapshot) {
        for listener in self.listeners.borrow_mut().iter_mut() {
            listener(Ok(snapshot.clone()));
        }
    }
}

impl DocumentStore for ScriptedStore {
    fn subscribe(
        &self,
        _collection: &str,
        listener: SnapshotListener,
    ) -> StoreResult<Subscription> {
        self.listeners.borrow_mut().push(listener);
        let cancelled = Rc::clone(&self.cancelled);
        Ok(Subscription::new(move || cancelled.set(cancelled.get() + 1)))
    }

    fn create(&self, _collection: &str, _fields: Fields) -> StoreResult<DocumentId> {
        Err(StoreError::Unavailable("scripted".to_string()))
    }

    fn update(&self, _collection: &str, _id: &str, _fields: Fields) -> StoreResult<()> {
        Err(StoreError::Unavailable("scripted".to_string()))
    }

    fn delete(&self, _collection: &str, _id: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("scripted".to_string()))
    }
}

fn one_document(id: &str, title: &str) -> Snapshot {
    let mut fields = Fields::new();
    fields.insert("title".to_string(), FieldValue::String(title.to_string()));
    fields.insert("completed".to_string(), FieldValue::Bool(false));
    fields.insert("createdAt".to_string(), FieldValue::Timestamp(1));
    Snapshot {
        documents: vec![DocumentSnapshot {
            id: id.to_string(),
            fields,
        }],
        has_pending_writes: false,
    }
}

#[test]
fn late_notifications_after_dispose_change_nothing() {
    let store = ScriptedStore::default();
    let mut controller = TodoListController::start(store.clone(), COLLECTION).expect("start");

    store.push(one_document("a", "before"));
    assert_eq!(controller.snapshot_version(), 1);

    controller.dispose();
    assert_eq!(store.cancelled.get(), 1);

    let before = controller.view();
    store.push(one_document("b", "after"));
    assert_eq!(controller.view(), before);
    assert!(controller.item("b").is_none());
}

#[test]
fn malformed_documents_are_skipped() {
    let store = ScriptedStore::default();
    let controller = TodoListController::start(store.clone(), COLLECTION).expect("start");

    let mut snapshot = one_document("good", "fine");
    let mut broken = Fields::new();
    broken.insert("title".to_string(), FieldValue::Integer(7));
    snapshot.documents.push(DocumentSnapshot {
        id: "bad".to_string(),
        fields: broken,
    });
    store.push(snapshot);

    let view = controller.view();
    assert_eq!(view.total, 1);
    assert!(controller.item("bad").is_none());
}

#[test]
fn store_failures_from_a_custom_store_are_surfaced() {
    let store = ScriptedStore::default();
    let controller = TodoListController::start(store.clone(), COLLECTION).expect("start");
    store.push(Snapshot::default());

    assert!(controller.delete("x").is_err());
    assert_eq!(
        controller.last_error().expect("error").operation,
        Operation::Delete
    );
}
