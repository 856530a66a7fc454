//! A single todo: one `.ics` file holding a VTODO.

mod priority;
mod status;
mod tag;
mod write;

pub use priority::Priority;
pub use status::{Status, StatusFilter, Transition};
pub use tag::{Tag, extract_tags};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{DEFAULT_ICAL_VERSION, DEFAULT_PRODID, ICS_EXTENSION};
use crate::error::{TdxError, TdxResult};
use crate::ics::{CalendarObject, Component, PropertyBag, PropertyKind, VTODO, parse_todo_calendar};
use crate::uid::generate_uid;

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Session-local number, assigned at index time. 0 until indexed.
    pub id: u32,
    pub path: PathBuf,
    calendar: CalendarObject,
    #[serde(skip)]
    todo_index: usize,
}

impl Item {
    /// Read and decode an item file.
    ///
    /// Fails with [`TdxError::NotATodo`] if the file decodes but holds no
    /// VTODO.
    pub fn from_file(path: impl AsRef<Path>) -> TdxResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let calendar = parse_todo_calendar(&content)
            .map_err(|reason| TdxError::Decode {
                path: path.to_path_buf(),
                reason,
            })?
            .ok_or_else(|| TdxError::NotATodo(path.to_path_buf()))?;

        Self::from_calendar(path.to_path_buf(), calendar)
    }

    pub fn from_calendar(path: PathBuf, calendar: CalendarObject) -> TdxResult<Self> {
        let todo_index = calendar
            .todo_index()
            .ok_or_else(|| TdxError::NotATodo(path.clone()))?;

        Ok(Item {
            id: 0,
            path,
            calendar,
            todo_index,
        })
    }

    /// A fresh NEEDS-ACTION todo that will be written to `<dir>/<uid>.ics`.
    pub fn new(dir: &Path, summary: &str) -> Self {
        let uid = generate_uid();
        let now = Utc::now();

        let mut todo = Component::new(VTODO);
        todo.set_text(PropertyKind::Uid, &uid);
        todo.set_instant(PropertyKind::DtStamp, now);
        todo.set_instant(PropertyKind::Created, now);
        todo.set_text(PropertyKind::Summary, summary);
        todo.set_text(PropertyKind::Status, Status::NeedsAction.as_str());

        let mut calendar = CalendarObject::default();
        calendar.set_text(PropertyKind::Version, DEFAULT_ICAL_VERSION);
        calendar.set_text(PropertyKind::ProdId, DEFAULT_PRODID);
        calendar.components.push(todo);

        Item {
            id: 0,
            path: dir.join(format!("{}.{}", uid, ICS_EXTENSION)),
            calendar,
            todo_index: 0,
        }
    }

    pub fn calendar(&self) -> &CalendarObject {
        &self.calendar
    }

    pub fn vtodo(&self) -> &Component {
        &self.calendar.components[self.todo_index]
    }

    pub fn vtodo_mut(&mut self) -> &mut Component {
        &mut self.calendar.components[self.todo_index]
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn uid(&self) -> Option<String> {
        self.vtodo().text(&PropertyKind::Uid).filter(|u| !u.is_empty())
    }

    /// The summary, or an empty string.
    pub fn summary(&self) -> String {
        self.vtodo().text(&PropertyKind::Summary).unwrap_or_default()
    }

    pub fn description(&self) -> Option<String> {
        self.vtodo()
            .text(&PropertyKind::Description)
            .filter(|d| !d.is_empty())
    }

    pub fn location(&self) -> Option<String> {
        self.vtodo()
            .text(&PropertyKind::Location)
            .filter(|l| !l.is_empty())
    }

    /// The STATUS text as written in the file.
    pub fn status_text(&self) -> Option<String> {
        self.vtodo().text(&PropertyKind::Status)
    }

    /// The recognized status, matched exactly. Missing or unknown values
    /// (including `completed` in lower case) are `None`.
    pub fn status(&self) -> Option<Status> {
        let text = self.status_text()?;
        Status::ALL.into_iter().find(|status| status.as_str() == text)
    }

    pub fn is_closed(&self) -> bool {
        self.status().is_some_and(|s| s.is_closed())
    }

    /// PRIORITY as 1-9. 0, missing and unparsable values are `None`.
    pub fn priority(&self) -> Option<u8> {
        self.vtodo()
            .integer(&PropertyKind::Priority)
            .ok()
            .flatten()
            .and_then(|p| u8::try_from(p).ok())
            .filter(|p| (1..=9).contains(p))
    }

    pub fn priority_band(&self) -> Option<Priority> {
        self.priority().and_then(Priority::from_value)
    }

    pub fn due(&self) -> Option<DateTime<Utc>> {
        self.vtodo().instant(&PropertyKind::Due)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.vtodo().instant(&PropertyKind::Created)
    }

    pub fn completed(&self) -> Option<DateTime<Utc>> {
        self.vtodo().instant(&PropertyKind::Completed)
    }

    pub fn is_recurring(&self) -> bool {
        self.vtodo().has(&PropertyKind::RRule)
    }

    /// Tags from the summary, then the description.
    pub fn tags(&self) -> Vec<Tag> {
        let summary = self.summary();
        let description = self.description().unwrap_or_default();
        extract_tags([summary.as_str(), description.as_str()])
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags().contains(tag)
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    pub fn set_summary(&mut self, summary: &str) {
        self.vtodo_mut().set_text(PropertyKind::Summary, summary);
    }

    /// Set a text property, or remove it when `text` is `None` or empty.
    pub fn set_text_or_remove(&mut self, kind: PropertyKind, text: Option<&str>) {
        match text.filter(|t| !t.is_empty()) {
            Some(text) => self.vtodo_mut().set_text(kind, text),
            None => {
                self.vtodo_mut().remove(&kind);
            }
        }
    }

    pub fn set_priority(&mut self, priority: Option<u8>) {
        match priority.filter(|p| *p > 0) {
            Some(p) => self.vtodo_mut().set_integer(PropertyKind::Priority, i64::from(p)),
            None => {
                self.vtodo_mut().remove(&PropertyKind::Priority);
            }
        }
    }

    pub fn set_due(&mut self, due: Option<DateTime<Utc>>) {
        match due {
            Some(at) => self.vtodo_mut().set_instant(PropertyKind::Due, at),
            None => {
                self.vtodo_mut().remove(&PropertyKind::Due);
            }
        }
    }

    pub fn set_status(&mut self, status: Status) {
        self.vtodo_mut()
            .set_text(PropertyKind::Status, status.as_str());
    }

    /// Check that `transition` is allowed without changing anything.
    pub fn check_transition(&self, transition: Transition) -> TdxResult<Status> {
        transition
            .next(self.status())
            .ok_or_else(|| TdxError::InvalidTransition {
                id: self.id,
                action: transition.verb(),
                status: self
                    .status_text()
                    .unwrap_or_else(|| Status::NeedsAction.to_string()),
            })
    }

    /// Apply a status transition in memory. COMPLETED gets a completion
    /// timestamp; leaving COMPLETED drops it.
    pub fn apply_transition(
        &mut self,
        transition: Transition,
        now: DateTime<Utc>,
    ) -> TdxResult<Status> {
        let next = self.check_transition(transition)?;
        self.set_status(next);

        if next == Status::Completed {
            self.vtodo_mut().set_instant(PropertyKind::Completed, now);
        } else {
            self.vtodo_mut().remove(&PropertyKind::Completed);
        }

        Ok(next)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn make_test_item(summary: &str) -> Item {
        Item::new(Path::new("/tmp/tdx-test"), summary)
    }

    #[test]
    fn test_new_item_defaults() {
        let item = make_test_item("Water plants");

        assert_eq!(item.summary(), "Water plants");
        assert_eq!(item.status(), Some(Status::NeedsAction));
        assert!(item.uid().is_some());
        assert!(item.created().is_some());
        assert_eq!(item.priority(), None);
        assert_eq!(
            item.path.extension().and_then(|e| e.to_str()),
            Some("ics")
        );
        assert_eq!(
            item.calendar().text(&PropertyKind::ProdId).as_deref(),
            Some(DEFAULT_PRODID)
        );
    }

    #[test]
    fn test_tags_from_summary_then_description() {
        let mut item = make_test_item("Book flights #travel");
        item.set_text_or_remove(PropertyKind::Description, Some("ask #finance about #Travel"));

        let tags: Vec<String> = item.tags().iter().map(Tag::to_string).collect();
        assert_eq!(tags, vec!["#travel", "#finance"]);
        assert!(item.has_tag(&Tag::new("FINANCE")));
    }

    #[test]
    fn test_priority_zero_is_unset() {
        let mut item = make_test_item("x");
        item.vtodo_mut().set_integer(PropertyKind::Priority, 0);
        assert_eq!(item.priority(), None);

        item.set_priority(Some(5));
        assert_eq!(item.priority_band(), Some(Priority::Medium));

        item.set_priority(None);
        assert!(!item.vtodo().has(&PropertyKind::Priority));
    }

    #[test]
    fn test_complete_then_reopen() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut item = make_test_item("x");

        assert_eq!(
            item.apply_transition(Transition::Complete, now).unwrap(),
            Status::Completed
        );
        assert_eq!(item.completed(), Some(now));
        assert!(item.is_closed());

        assert!(item.apply_transition(Transition::Complete, now).is_err());

        item.apply_transition(Transition::Reopen, now).unwrap();
        assert_eq!(item.status(), Some(Status::NeedsAction));
        assert_eq!(item.completed(), None);
    }

    #[test]
    fn test_invalid_transition_leaves_item_unchanged() {
        let now = Utc::now();
        let mut item = make_test_item("x");
        let before = item.calendar().clone();

        let err = item.apply_transition(Transition::Reopen, now).unwrap_err();
        assert!(matches!(err, TdxError::InvalidTransition { action: "reopen", .. }));
        assert_eq!(item.calendar(), &before);
    }

    #[test]
    fn test_unknown_status_is_none() {
        let mut item = make_test_item("x");
        item.vtodo_mut().set_text(PropertyKind::Status, "WAITING");
        assert_eq!(item.status(), None);
        assert_eq!(item.status_text().as_deref(), Some("WAITING"));
    }
}
