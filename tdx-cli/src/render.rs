//! Terminal rendering for tdx types.
//!
//! Extension traits and helpers that add colored output to tdx-core types
//! using owo_colors. Rendering never mutates an item.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use tdx_core::ics::{PropertyBag, ValueKind};
use tdx_core::{Collection, Item, Priority, Status};

const FULL_DATE_LAYOUT: &str = "%-d %b %Y %H:%M";

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Status {
    fn render(&self) -> String {
        match self {
            Status::Completed => "[x]".dimmed().to_string(),
            Status::Cancelled => "[-]".dimmed().to_string(),
            Status::NeedsAction | Status::InProcess => "[ ]".blue().to_string(),
        }
    }
}

impl Render for Priority {
    fn render(&self) -> String {
        match self {
            Priority::High => self.marker().bright_red().bold().to_string(),
            Priority::Medium | Priority::Low => self.marker().bright_yellow().bold().to_string(),
        }
    }
}

impl Render for Collection {
    fn render(&self) -> String {
        match self.color.as_deref().and_then(parse_hex_color) {
            Some((r, g, b)) => self.name.truecolor(r, g, b).bold().to_string(),
            None => self.name.bold().to_string(),
        }
    }
}

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() < 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Options for the one-line item format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Put the due date and description on a second line.
    pub multiline: bool,
    /// Include the description.
    pub description: bool,
}

/// One item as `id status [priority] [recurrence] summary [due] [description]`.
pub fn render_item(item: &Item, options: FormatOptions, now: DateTime<Local>) -> String {
    let mut line = if item.id != 0 {
        format!("{:2}", item.id)
    } else {
        "  ".to_string()
    };

    line.push(' ');
    line.push_str(&item.status().unwrap_or(Status::NeedsAction).render());

    if let Some(priority) = item.priority_band() {
        line.push(' ');
        line.push_str(&priority.render());
    }

    if item.is_recurring() {
        line.push(' ');
        line.push_str(&"⟳".green().to_string());
    }

    line.push(' ');
    line.push_str(&render_summary(item));

    let mut meta = Vec::new();
    if let Some(due) = item.due() {
        meta.push(render_due(due, now));
    }
    if options.description {
        if let Some(description) = item.description() {
            meta.push(description.dimmed().italic().to_string());
        }
    }

    if meta.is_empty() {
        return line;
    }

    let separator = format!(" {} ", "|".dimmed());
    let meta = meta.join(separator.as_str());
    if options.multiline {
        format!("{}\n       {}", line, meta)
    } else {
        format!("{} {}", line, meta)
    }
}

/// The summary with its tags highlighted.
fn render_summary(item: &Item) -> String {
    let mut summary = item.summary();
    for tag in item.tags() {
        let colored = tag.as_str().blue().to_string();
        summary = summary.replace(tag.as_str(), &colored);
    }
    summary
}

fn render_due(due: DateTime<Utc>, now: DateTime<Local>) -> String {
    let (phrase, overdue) = due_phrase(due, now);
    let text = format!("({})", phrase);
    if overdue {
        text.red().to_string()
    } else if phrase == "today" || phrase == "tomorrow" {
        text.green().to_string()
    } else {
        text.dimmed().to_string()
    }
}

/// A relative phrase for a due date: "today", "tomorrow", "in 2 weeks",
/// "overdue 3 days". Returns whether the date is overdue.
pub fn due_phrase(due: DateTime<Utc>, now: DateTime<Local>) -> (String, bool) {
    let days = (due.with_timezone(&Local).date_naive() - now.date_naive()).num_days();

    match days {
        0 => ("today".to_string(), false),
        1 => ("tomorrow".to_string(), false),
        d if d < 0 => (format!("overdue {}", span(-d)), true),
        d => (format!("in {}", span(d)), false),
    }
}

fn span(days: i64) -> String {
    let (n, unit) = match days {
        d if d < 14 => (d, "day"),
        d if d < 60 => (d / 7, "week"),
        d if d < 365 => (d / 30, "month"),
        d => (d / 365, "year"),
    };
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Every VTODO property as `NAME: value`, dates in local time.
pub fn render_full(item: &Item) -> String {
    let mut out = format!("ID: {}\n", item.id);
    for prop in item.vtodo().properties() {
        let value = match prop.kind.value_kind() {
            ValueKind::Instant => prop
                .as_instant()
                .map(|at| at.with_timezone(&Local).format(FULL_DATE_LAYOUT).to_string())
                .unwrap_or_else(|| prop.value.clone()),
            ValueKind::Text => prop.as_text(),
            ValueKind::Integer | ValueKind::Opaque => prop.value.clone(),
        };
        out.push_str(&format!("{}: {}\n", prop.name(), value));
    }
    out
}

/// The item as pretty-printed JSON.
pub fn render_raw(item: &Item) -> serde_json::Result<String> {
    serde_json::to_string_pretty(item)
}
