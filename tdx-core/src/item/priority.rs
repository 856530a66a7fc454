//! Priority bands: high (1), medium (2-5), low (6-9).

use std::fmt;
use std::str::FromStr;

use crate::constants::{PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM};
use crate::error::TdxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Band for a PRIORITY value. 0 and out-of-range values mean unset.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Priority::High),
            2..=5 => Some(Priority::Medium),
            6..=9 => Some(Priority::Low),
            _ => None,
        }
    }

    /// Band for an `!`, `!!` or `!!!` marker.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "!!!" => Some(Priority::High),
            "!!" => Some(Priority::Medium),
            "!" => Some(Priority::Low),
            _ => None,
        }
    }

    /// The value written for this band.
    pub fn value(&self) -> u8 {
        match self {
            Priority::High => PRIORITY_HIGH,
            Priority::Medium => PRIORITY_MEDIUM,
            Priority::Low => PRIORITY_LOW,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Priority::High => "!!!",
            Priority::Medium => "!!",
            Priority::Low => "!",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = TdxError;

    /// Accepts `high`/`medium`/`low` or a number from 1 to 9.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let by_keyword = [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .find(|p| p.keyword().eq_ignore_ascii_case(s));

        by_keyword
            .or_else(|| s.parse::<u8>().ok().and_then(Priority::from_value))
            .ok_or_else(|| TdxError::InvalidValue {
                property: "PRIORITY".to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
