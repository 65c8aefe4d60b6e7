//! Plain-text rendering of a `ViewState`.

use todo_sync::{Row, ViewState};

pub fn render(view: &ViewState) -> String {
    let mut out = String::new();

    for row in &view.rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    if view.total > 0 {
        out.push_str(&format!(
            "{} | filter: {} | {} completed\n",
            view.items_left(),
            view.status,
            view.completed.len()
        ));
    }
    if !view.error_message.is_empty() {
        out.push_str(&format!("! {}\n", view.error_message));
    }
    out
}

fn render_row(row: &Row) -> String {
    let check = if row.completed { "[x]" } else { "[ ]" };
    let id = match row.id {
        Some(id) => id.to_string(),
        None => "...".to_string(),
    };
    let busy = if row.busy { " (saving)" } else { "" };
    format!("{check} {id:>4}  {}{busy}", row.title)
}
