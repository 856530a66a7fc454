//! Item filters.
//!
//! Every filter is a predicate `fn(&Item, &P) -> bool` over its own parameter
//! type, applied through [`filter`]. Composition is plain sequencing.

use chrono::{DateTime, Days, Local};

use crate::item::{Item, StatusFilter, Tag};

/// Keep the items for which `keep(item, param)` holds, in order.
pub fn filter<'a, P: ?Sized>(
    items: Vec<&'a Item>,
    keep: impl Fn(&Item, &P) -> bool,
    param: &P,
) -> Vec<&'a Item> {
    items.into_iter().filter(|item| keep(item, param)).collect()
}

/// Exact match on the STATUS text. `ANY` keeps items without a status too.
pub fn by_status(item: &Item, status: &StatusFilter) -> bool {
    match status {
        StatusFilter::Any => true,
        StatusFilter::Only(wanted) => item.status() == Some(*wanted),
    }
}

/// Keep items carrying any of `tags`. An empty set keeps everything.
pub fn by_tags(item: &Item, tags: &[Tag]) -> bool {
    if tags.is_empty() {
        return true;
    }
    let own = item.tags();
    tags.iter().any(|t| own.contains(t))
}

/// Drop items carrying any of `tags`.
pub fn by_excluded_tags(item: &Item, tags: &[Tag]) -> bool {
    if tags.is_empty() {
        return true;
    }
    let own = item.tags();
    !tags.iter().any(|t| own.contains(t))
}

/// A due-date window: items due before `now` plus `days` calendar days.
#[derive(Debug, Clone, Copy)]
pub struct DueWindow {
    pub days: u32,
    pub now: DateTime<Local>,
}

/// Keep items due strictly before the end of the window. Items without a due
/// date are dropped. A zero-day window keeps everything.
pub fn by_due(item: &Item, window: &DueWindow) -> bool {
    if window.days == 0 {
        return true;
    }
    let Some(cutoff) = window.now.checked_add_days(Days::new(u64::from(window.days))) else {
        return true;
    };
    item.due().is_some_and(|due| due < cutoff)
}

/// Case-insensitive substring match on the summary.
pub fn by_text(item: &Item, query: &str) -> bool {
    query.is_empty() || item.summary().to_lowercase().contains(&query.to_lowercase())
}

/// The filters of one `list` invocation.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub status: StatusFilter,
    pub tags: Vec<Tag>,
    pub excluded_tags: Vec<Tag>,
    pub due_within_days: u32,
    pub text: String,
}

impl FilterOptions {
    pub fn apply<'a>(&self, items: Vec<&'a Item>, now: DateTime<Local>) -> Vec<&'a Item> {
        let window = DueWindow {
            days: self.due_within_days,
            now,
        };

        let items = filter(items, by_status, &self.status);
        let items = filter(items, by_tags, self.tags.as_slice());
        let items = filter(items, by_excluded_tags, self.excluded_tags.as_slice());
        let items = filter(items, by_due, &window);
        filter(items, by_text, self.text.as_str())
    }
}
