//! Parsing the free-form input of `add`.
//!
//! `buy milk tomorrow !!` becomes summary `buy milk`, medium priority, and a
//! due date at tomorrow's local midnight.

use chrono::{DateTime, Local, Utc};

use crate::ics::value::local_midnight;
use crate::item::Priority;

/// A date phrase found in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub at: DateTime<Local>,
    /// The exact substring that was recognized.
    pub matched: String,
    /// Whether the phrase named a time of day.
    pub has_time: bool,
}

/// Natural-language date recognizer.
///
/// No match is a normal outcome, not an error.
pub trait DatePhraseParser {
    fn find(&self, text: &str, now: DateTime<Local>) -> Option<DateMatch>;
}

/// A recognizer that never matches.
pub struct NoDates;

impl DatePhraseParser for NoDates {
    fn find(&self, _text: &str, _now: DateTime<Local>) -> Option<DateMatch> {
        None
    }
}

impl DateMatch {
    /// The instant this match stands for. Date-only phrases resolve to local
    /// midnight.
    pub fn instant(&self) -> DateTime<Utc> {
        if self.has_time {
            return self.at.with_timezone(&Utc);
        }
        local_midnight(self.at.date_naive()).unwrap_or_else(|| self.at.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddInput {
    pub summary: String,
    pub priority: Option<Priority>,
    pub due: Option<DateTime<Utc>>,
}

impl AddInput {
    /// Pull the priority marker and a date phrase out of `input`.
    ///
    /// A standalone `!`, `!!` or `!!!` sets the priority; the last one wins.
    pub fn parse(input: &str, now: DateTime<Local>, dates: &dyn DatePhraseParser) -> AddInput {
        let mut priority = None;
        let words: Vec<&str> = input
            .split_whitespace()
            .filter(|word| match Priority::from_marker(word) {
                Some(p) => {
                    priority = Some(p);
                    false
                }
                None => true,
            })
            .collect();
        let text = words.join(" ");

        let (summary, due) = match dates.find(&text, now) {
            Some(m) if !m.matched.is_empty() => {
                let stripped = text.replacen(&m.matched, " ", 1);
                (collapse_whitespace(&stripped), Some(m.instant()))
            }
            _ => (text, None),
        };

        AddInput {
            summary,
            priority,
            due,
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
