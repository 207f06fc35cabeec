//! Plain-text rendering of task views for the shell.

use std::borrow::Cow;
use std::fmt::Write as _;

use taskdeck_app::Theme;
use taskdeck_core::{Status, Task, TaskQuery, TaskStats, TaskView};
use time::OffsetDateTime;
use time::macros::format_description;
use unicode_segmentation::UnicodeSegmentation;

const TITLE_WIDTH: usize = 40;
const SHORT_ID_LEN: usize = 8;

pub fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let grapheme_count = UnicodeSegmentation::graphemes(input, true).count();
    if grapheme_count <= max_graphemes {
        return Cow::Borrowed(input);
    }

    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        let truncated: String = UnicodeSegmentation::graphemes(input, true)
            .take(max_graphemes)
            .collect();
        return Cow::Owned(truncated);
    }

    let keep = max_graphemes - ELLIPSIS_GRAPHEMES;
    let mut truncated: String = UnicodeSegmentation::graphemes(input, true).take(keep).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

pub const fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Pending => "□",
        Status::Ongoing => "→",
        Status::Completed => "✓",
    }
}

pub fn format_due(due: Option<OffsetDateTime>) -> String {
    let format = format_description!("[year]-[month]-[day]");
    due.and_then(|value| value.format(&format).ok())
        .unwrap_or_else(|| "-".to_owned())
}

pub fn render_stats(stats: &TaskStats) -> String {
    let mut line = format!("Total Tasks: {}", stats.total);
    for status in Status::ALL {
        let _ = write!(line, " | {}: {}", status.label(), stats.count(status));
    }
    line
}

pub fn render_row(task: &Task) -> String {
    let id = task.id.to_string();
    let short_id = id.get(..SHORT_ID_LEN).unwrap_or(&id);
    format!(
        "{marker} {short_id}  {priority:<6}  {category:<8}  {due:<10}  {title}",
        marker = status_marker(task.status),
        priority = task.priority.as_str(),
        category = task.category.as_str(),
        due = format_due(task.due_date),
        title = truncate_with_ellipsis(&task.title, TITLE_WIDTH),
    )
}

pub fn render_view(view: &TaskView, query: &TaskQuery, theme: Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_stats(&view.stats));
    let _ = write!(
        out,
        "sort: {} {} | theme: {theme}",
        query.sort_field, query.sort_order
    );
    if query.is_searching() {
        let _ = write!(out, " | search: {:?}", query.text);
    }
    out.push('\n');

    if view.is_empty() {
        if query.is_searching() {
            out.push_str("No tasks found\n");
            out.push_str("Try adjusting your search criteria to find what you're looking for\n");
        } else {
            out.push_str("No tasks yet\n");
            out.push_str("Get started by creating your first task: new \"<title>\"\n");
        }
        return out;
    }

    for task in &view.tasks {
        out.push_str(&render_row(task));
        out.push('\n');
    }
    out
}

pub fn render_detail(task: &Task) -> String {
    let stamp = |value: OffsetDateTime| {
        value
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| value.to_string())
    };
    let mut out = String::new();
    let _ = writeln!(out, "{}", task.title);
    let _ = writeln!(out, "  id:        {}", task.id);
    let _ = writeln!(out, "  status:    {}", task.status.label());
    let _ = writeln!(out, "  priority:  {}", task.priority);
    let _ = writeln!(out, "  category:  {}", task.category);
    let _ = writeln!(out, "  due:       {}", format_due(task.due_date));
    let _ = writeln!(out, "  created:   {}", stamp(task.created_at));
    let _ = writeln!(out, "  updated:   {}", stamp(task.updated_at));
    if !task.description.is_empty() {
        let _ = writeln!(out);
        for line in task.description.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}
