//! Filter -> sort pipeline.

use super::filter::Filter;
use super::sort::SortMode;
use crate::model::todo::TodoItem;

/// Derives the displayed sequence from the cache.
///
/// Pure and deterministic: the input slice is never reordered, and the
/// `Default` sort returns matching items in cache order.
pub fn derive_view<'a>(items: &'a [TodoItem], filter: Filter, sort: SortMode) -> Vec<&'a TodoItem> {
    let mut visible = items
        .iter()
        .filter(|item| filter.matches(item))
        .collect::<Vec<_>>();

    if let Some(compare) = sort.comparator() {
        // `sort_by` is stable, which keeps equal keys in delivered order.
        visible.sort_by(|a, b| compare(a, b));
    }

    visible
}
