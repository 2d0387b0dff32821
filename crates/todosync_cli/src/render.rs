//! Plain-text rendering of `ListView`.

use todosync_core::{CreatedAt, ListView, LoadPhase};

pub fn render_view(view: &ListView) -> String {
    let mut lines = Vec::new();

    if !view.renderable {
        lines.push("loading...".to_string());
    } else {
        lines.push(format!(
            "filter={} sort={} showing={} total={} active={}{}",
            view.filter,
            view.sort,
            view.items.len(),
            view.total,
            view.active,
            if view.has_pending_writes {
                " (pending writes)"
            } else {
                ""
            }
        ));
        if view.phase == LoadPhase::Failed {
            lines.push("(stale: live updates stopped)".to_string());
        }
        if view.items.is_empty() {
            lines.push("(empty)".to_string());
        }
        for item in &view.items {
            lines.push(format!(
                "[{}] {:<12} {}{}",
                if item.completed { "x" } else { " " },
                item.id,
                item.title,
                created_suffix(item.created_at)
            ));
        }
    }

    if !view.draft.is_empty() {
        lines.push(format!("draft: {}", view.draft));
    }
    if let Some(error) = &view.last_error {
        lines.push(format!("error: {error}"));
    }
    lines.join("\n")
}

fn created_suffix(created_at: CreatedAt) -> String {
    match created_at {
        CreatedAt::Resolved(epoch_ms) => format!("  @{epoch_ms}"),
        CreatedAt::Pending => "  @pending".to_string(),
        CreatedAt::Absent => String::new(),
    }
}
