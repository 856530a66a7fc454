//! Item comparators, each meant for a stable sort.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::TdxError;
use crate::item::Item;

pub type Comparator = fn(&Item, &Item) -> Ordering;

/// Ascending by priority value; unset priorities go last.
pub fn by_priority(a: &Item, b: &Item) -> Ordering {
    match (a.priority(), b.priority()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending by due date; items without one go last.
pub fn by_due(a: &Item, b: &Item) -> Ordering {
    match (a.due(), b.due()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Completed and cancelled items after the rest. Only partitions.
pub fn by_status(a: &Item, b: &Item) -> Ordering {
    a.is_closed().cmp(&b.is_closed())
}

/// Newest first. Items without CREATED sort before everything else.
pub fn by_created(a: &Item, b: &Item) -> Ordering {
    match (a.created(), b.created()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Due,
    Status,
    Created,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Priority,
        SortKey::Due,
        SortKey::Status,
        SortKey::Created,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Priority => "priority",
            SortKey::Due => "due",
            SortKey::Status => "status",
            SortKey::Created => "created",
        }
    }

    pub fn comparator(&self) -> Comparator {
        match self {
            SortKey::Priority => by_priority,
            SortKey::Due => by_due,
            SortKey::Status => by_status,
            SortKey::Created => by_created,
        }
    }

    /// Parse a comma separated key list such as `status,priority`.
    pub fn parse_list(s: &str) -> Result<Vec<SortKey>, TdxError> {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for SortKey {
    type Err = TdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TdxError::Config(format!(
                    "Unknown sort key {:?}. Valid keys: {}",
                    s,
                    SortKey::ALL.map(|k| k.as_str()).join(", ")
                ))
            })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort by `keys` lexicographically: the first key decides, later keys break
/// ties. Runs one stable sort per key, last key first.
pub fn sort_items(items: &mut [&Item], keys: &[SortKey]) {
    for key in keys.iter().rev() {
        let cmp = key.comparator();
        items.sort_by(|a, b| cmp(a, b));
    }
}
