//! Todo status values and the transitions between them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::TdxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[serde(rename = "NEEDS-ACTION")]
    NeedsAction,
    #[serde(rename = "IN-PROCESS")]
    InProcess,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::NeedsAction,
        Status::InProcess,
        Status::Completed,
        Status::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NeedsAction => "NEEDS-ACTION",
            Status::InProcess => "IN-PROCESS",
            Status::Completed => "COMPLETED",
            Status::Cancelled => "CANCELLED",
        }
    }

    /// Completed or cancelled.
    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Completed | Status::Cancelled)
    }
}

impl FromStr for Status {
    type Err = TdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TdxError::Config(format!(
                    "Unknown status {:?}. Valid statuses: {}",
                    s,
                    Status::ALL.map(|s| s.as_str()).join(", ")
                ))
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter for listing: a single status or everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Only(Status),
}

impl FromStr for StatusFilter {
    type Err = TdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ANY") {
            return Ok(StatusFilter::Any);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Complete,
    Cancel,
    Reopen,
    Toggle,
}

impl Transition {
    pub fn verb(&self) -> &'static str {
        match self {
            Transition::Complete => "complete",
            Transition::Cancel => "cancel",
            Transition::Reopen => "reopen",
            Transition::Toggle => "toggle",
        }
    }

    /// The status after applying this transition, or `None` if the
    /// transition is not allowed from `current`.
    ///
    /// A missing or unrecognized status counts as NEEDS-ACTION.
    pub fn next(&self, current: Option<Status>) -> Option<Status> {
        let current = current.unwrap_or(Status::NeedsAction);
        match self {
            Transition::Complete | Transition::Cancel if current.is_closed() => None,
            Transition::Complete => Some(Status::Completed),
            Transition::Cancel => Some(Status::Cancelled),
            Transition::Reopen if current.is_closed() => Some(Status::NeedsAction),
            Transition::Reopen => None,
            Transition::Toggle if current == Status::Completed => Some(Status::NeedsAction),
            Transition::Toggle => Some(Status::Completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("completed".parse::<Status>().unwrap(), Status::Completed);
        assert_eq!("IN-PROCESS".parse::<Status>().unwrap(), Status::InProcess);
        assert!("DONE".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_filter_any() {
        assert_eq!("any".parse::<StatusFilter>().unwrap(), StatusFilter::Any);
        assert_eq!(
            "NEEDS-ACTION".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::NeedsAction)
        );
    }

    #[test]
    fn test_complete_only_from_open() {
        assert_eq!(Transition::Complete.next(None), Some(Status::Completed));
        assert_eq!(
            Transition::Complete.next(Some(Status::InProcess)),
            Some(Status::Completed)
        );
        assert_eq!(Transition::Complete.next(Some(Status::Completed)), None);
        assert_eq!(Transition::Cancel.next(Some(Status::Cancelled)), None);
    }

    #[test]
    fn test_reopen_only_from_closed() {
        assert_eq!(
            Transition::Reopen.next(Some(Status::Cancelled)),
            Some(Status::NeedsAction)
        );
        assert_eq!(Transition::Reopen.next(Some(Status::NeedsAction)), None);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(
            Transition::Toggle.next(Some(Status::Completed)),
            Some(Status::NeedsAction)
        );
        assert_eq!(
            Transition::Toggle.next(Some(Status::Cancelled)),
            Some(Status::Completed)
        );
        assert_eq!(Transition::Toggle.next(None), Some(Status::Completed));
    }
}
