use todosync_core::{derive_view, CreatedAt, Filter, SortMode, TodoItem};

fn item(id: &str, title: &str, completed: bool, created_at: CreatedAt) -> TodoItem {
    TodoItem::new(id, title, completed, created_at).unwrap()
}

fn sample() -> Vec<TodoItem> {
    vec![
        item("1", "walk dog", false, CreatedAt::Resolved(300)),
        item("2", "Buy milk", true, CreatedAt::Resolved(100)),
        item("3", "answer mail", false, CreatedAt::Pending),
        item("4", "buy milk", false, CreatedAt::Resolved(200)),
        item("5", "Clean desk", true, CreatedAt::Resolved(200)),
    ]
}

fn ids(view: &[&TodoItem]) -> Vec<String> {
    view.iter().map(|item| item.id.clone()).collect()
}

const ALL_SORTS: [SortMode; 5] = [
    SortMode::Default,
    SortMode::TitleAsc,
    SortMode::TitleDesc,
    SortMode::TimeAsc,
    SortMode::TimeDesc,
];

#[test]
fn filters_return_exactly_matching_subsets() {
    let items = sample();

    let all = derive_view(&items, Filter::All, SortMode::Default);
    assert_eq!(all.len(), items.len());

    let active = derive_view(&items, Filter::Active, SortMode::Default);
    assert_eq!(ids(&active), vec!["1", "3", "4"]);
    assert!(active.iter().all(|item| !item.completed));

    let completed = derive_view(&items, Filter::Completed, SortMode::Default);
    assert_eq!(ids(&completed), vec!["2", "5"]);
    assert!(completed.iter().all(|item| item.completed));

    assert_eq!(active.len() + completed.len(), items.len());
}

#[test]
fn every_sort_is_a_permutation_of_the_filtered_set() {
    let items = sample();
    for filter in Filter::ALL {
        let mut expected = ids(&derive_view(&items, filter, SortMode::Default));
        expected.sort();
        for sort in ALL_SORTS {
            let mut actual = ids(&derive_view(&items, filter, sort));
            actual.sort();
            assert_eq!(actual, expected, "filter={filter} sort={sort}");
        }
    }
}

#[test]
fn title_sorts_collate_case_insensitively() {
    let items = sample();
    let asc = derive_view(&items, Filter::All, SortMode::TitleAsc);
    let titles = asc.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec!["answer mail", "buy milk", "Buy milk", "Clean desk", "walk dog"]
    );

    let desc = derive_view(&items, Filter::All, SortMode::TitleDesc);
    let titles = desc.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec!["walk dog", "Clean desk", "Buy milk", "buy milk", "answer mail"]
    );
}

#[test]
fn accented_titles_sort_next_to_their_base_letter() {
    let items = vec![
        item("1", "zebra", false, CreatedAt::Absent),
        item("2", "éclair", false, CreatedAt::Absent),
        item("3", "Eggs", false, CreatedAt::Absent),
        item("4", "apple", false, CreatedAt::Absent),
    ];
    let asc = derive_view(&items, Filter::All, SortMode::TitleAsc);
    assert_eq!(ids(&asc), vec!["4", "2", "3", "1"]);
}

#[test]
fn time_sorts_are_stable_for_equal_instants() {
    let items = sample();

    let asc = derive_view(&items, Filter::All, SortMode::TimeAsc);
    // "4" and "5" share an instant and keep delivered order; pending is last.
    assert_eq!(ids(&asc), vec!["2", "4", "5", "1", "3"]);

    let desc = derive_view(&items, Filter::All, SortMode::TimeDesc);
    assert_eq!(ids(&desc), vec!["3", "1", "4", "5", "2"]);
}

#[test]
fn unresolved_timestamps_keep_delivered_order_among_themselves() {
    let items = vec![
        item("a", "a", false, CreatedAt::Absent),
        item("b", "b", false, CreatedAt::Resolved(5)),
        item("c", "c", false, CreatedAt::Pending),
    ];
    let asc = derive_view(&items, Filter::All, SortMode::TimeAsc);
    assert_eq!(ids(&asc), vec!["b", "a", "c"]);
}

#[test]
fn derivation_does_not_reorder_the_cache() {
    let items = sample();
    let before = items.clone();
    let _ = derive_view(&items, Filter::Active, SortMode::TitleDesc);
    assert_eq!(items, before);
}

#[test]
fn title_cycle_returns_to_default_after_three_clicks() {
    let mut mode = SortMode::Default;
    let mut seen = Vec::new();
    for _ in 0..3 {
        mode = mode.next_title();
        seen.push(mode);
    }
    assert_eq!(
        seen,
        vec![SortMode::TitleAsc, SortMode::TitleDesc, SortMode::Default]
    );
}

#[test]
fn time_cycle_returns_to_default_after_three_clicks() {
    let mode = SortMode::Default.next_time().next_time().next_time();
    assert_eq!(mode, SortMode::Default);
    assert_eq!(SortMode::Default.next_time(), SortMode::TimeAsc);
    assert_eq!(SortMode::TimeAsc.next_time(), SortMode::TimeDesc);
}

#[test]
fn selecting_one_axis_resets_the_other() {
    assert_eq!(SortMode::TimeDesc.next_title(), SortMode::TitleAsc);
    assert_eq!(SortMode::TimeAsc.next_title(), SortMode::TitleAsc);
    assert_eq!(SortMode::TitleDesc.next_time(), SortMode::TimeAsc);
    assert_eq!(SortMode::TitleAsc.next_time(), SortMode::TimeAsc);
}

#[test]
fn sort_modes_serialize_with_kebab_names() {
    assert_eq!(
        serde_json::to_value(SortMode::TitleAsc).unwrap(),
        serde_json::json!("title-asc")
    );
    assert_eq!(
        serde_json::to_value(Filter::Completed).unwrap(),
        serde_json::json!("completed")
    );
}
