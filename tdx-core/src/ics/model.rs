//! Owned iCalendar model.
//!
//! A decoded file is a [`CalendarObject`] holding calendar-level properties and
//! components. Every property keeps its wire-form value and parameters, so
//! properties this crate does not understand are written back verbatim.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::{TdxError, TdxResult};
use crate::ics::value;

/// Recognized property names. Anything else lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Uid,
    Status,
    Summary,
    Description,
    Location,
    Priority,
    Sequence,
    Due,
    Created,
    LastModified,
    DtStamp,
    Completed,
    RRule,
    ProdId,
    Version,
    Other(String),
}

/// How a property's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Instant,
    Opaque,
}

impl PropertyKind {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "UID" => PropertyKind::Uid,
            "STATUS" => PropertyKind::Status,
            "SUMMARY" => PropertyKind::Summary,
            "DESCRIPTION" => PropertyKind::Description,
            "LOCATION" => PropertyKind::Location,
            "PRIORITY" => PropertyKind::Priority,
            "SEQUENCE" => PropertyKind::Sequence,
            "DUE" => PropertyKind::Due,
            "CREATED" => PropertyKind::Created,
            "LAST-MODIFIED" => PropertyKind::LastModified,
            "DTSTAMP" => PropertyKind::DtStamp,
            "COMPLETED" => PropertyKind::Completed,
            "RRULE" => PropertyKind::RRule,
            "PRODID" => PropertyKind::ProdId,
            "VERSION" => PropertyKind::Version,
            other => PropertyKind::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PropertyKind::Uid => "UID",
            PropertyKind::Status => "STATUS",
            PropertyKind::Summary => "SUMMARY",
            PropertyKind::Description => "DESCRIPTION",
            PropertyKind::Location => "LOCATION",
            PropertyKind::Priority => "PRIORITY",
            PropertyKind::Sequence => "SEQUENCE",
            PropertyKind::Due => "DUE",
            PropertyKind::Created => "CREATED",
            PropertyKind::LastModified => "LAST-MODIFIED",
            PropertyKind::DtStamp => "DTSTAMP",
            PropertyKind::Completed => "COMPLETED",
            PropertyKind::RRule => "RRULE",
            PropertyKind::ProdId => "PRODID",
            PropertyKind::Version => "VERSION",
            PropertyKind::Other(name) => name,
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            PropertyKind::Uid
            | PropertyKind::Status
            | PropertyKind::Summary
            | PropertyKind::Description
            | PropertyKind::Location
            | PropertyKind::ProdId
            | PropertyKind::Version => ValueKind::Text,
            PropertyKind::Priority | PropertyKind::Sequence => ValueKind::Integer,
            PropertyKind::Due
            | PropertyKind::Created
            | PropertyKind::LastModified
            | PropertyKind::DtStamp
            | PropertyKind::Completed => ValueKind::Instant,
            PropertyKind::RRule | PropertyKind::Other(_) => ValueKind::Opaque,
        }
    }
}

impl Serialize for PropertyKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A single content line: name, parameters and the value in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub kind: PropertyKind,
    pub params: Vec<(String, Option<String>)>,
    pub value: String,
}

impl Property {
    pub fn new(kind: PropertyKind, value: impl Into<String>) -> Self {
        Property {
            kind,
            params: Vec::new(),
            value: value.into(),
        }
    }

    /// Build a text property, escaping the value.
    pub fn text(kind: PropertyKind, text: &str) -> Self {
        Self::new(kind, value::escape_text(text))
    }

    pub fn integer(kind: PropertyKind, n: i64) -> Self {
        Self::new(kind, n.to_string())
    }

    /// Build a date-time property in UTC form.
    pub fn instant(kind: PropertyKind, at: DateTime<Utc>) -> Self {
        Self::new(kind, value::format_utc(at))
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_deref())
    }

    /// The value with iCalendar text escapes resolved.
    pub fn as_text(&self) -> String {
        value::unescape_text(&self.value)
    }

    pub fn as_integer(&self) -> TdxResult<i64> {
        self.value
            .trim()
            .parse()
            .map_err(|_| TdxError::InvalidValue {
                property: self.name().to_string(),
                value: self.value.clone(),
            })
    }

    /// Interpret the value as an instant, honoring `TZID` and `VALUE=DATE`.
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        let date_only = self
            .param("VALUE")
            .is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
        value::parse_instant(&self.value, self.param("TZID"), date_only)
    }
}

/// Shared property-list operations for calendars and components.
pub trait PropertyBag {
    fn properties(&self) -> &[Property];
    fn properties_mut(&mut self) -> &mut Vec<Property>;

    fn get(&self, kind: &PropertyKind) -> Option<&Property> {
        self.properties().iter().find(|p| &p.kind == kind)
    }

    fn has(&self, kind: &PropertyKind) -> bool {
        self.get(kind).is_some_and(|p| !p.value.is_empty())
    }

    fn text(&self, kind: &PropertyKind) -> Option<String> {
        self.get(kind).map(Property::as_text)
    }

    fn integer(&self, kind: &PropertyKind) -> TdxResult<Option<i64>> {
        self.get(kind).map(Property::as_integer).transpose()
    }

    fn instant(&self, kind: &PropertyKind) -> Option<DateTime<Utc>> {
        self.get(kind).and_then(Property::as_instant)
    }

    /// Replace every property of the same kind with `prop`, keeping the
    /// position of the first one.
    fn set(&mut self, prop: Property) {
        let props = self.properties_mut();
        match props.iter().position(|p| p.kind == prop.kind) {
            Some(idx) => {
                let kind = prop.kind.clone();
                props[idx] = prop;
                let mut seen = false;
                props.retain(|p| {
                    if p.kind != kind {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => props.push(prop),
        }
    }

    fn set_text(&mut self, kind: PropertyKind, text: &str) {
        self.set(Property::text(kind, text));
    }

    fn set_integer(&mut self, kind: PropertyKind, n: i64) {
        self.set(Property::integer(kind, n));
    }

    fn set_instant(&mut self, kind: PropertyKind, at: DateTime<Utc>) {
        self.set(Property::instant(kind, at));
    }

    /// Remove every property of this kind. Returns whether any was present.
    fn remove(&mut self, kind: &PropertyKind) -> bool {
        let props = self.properties_mut();
        let before = props.len();
        props.retain(|p| &p.kind != kind);
        props.len() != before
    }
}

/// A component such as VTODO, VALARM or VTIMEZONE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub name: String,
    pub properties: Vec<Property>,
    pub components: Vec<Component>,
}

impl Component {
    pub fn new(name: &str) -> Self {
        Component {
            name: name.to_ascii_uppercase(),
            properties: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl PropertyBag for Component {
    fn properties(&self) -> &[Property] {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Vec<Property> {
        &mut self.properties
    }
}

/// A whole `VCALENDAR` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarObject {
    pub properties: Vec<Property>,
    pub components: Vec<Component>,
}

impl CalendarObject {
    pub fn todo_index(&self) -> Option<usize> {
        self.components.iter().position(|c| c.is(VTODO))
    }
}

impl PropertyBag for CalendarObject {
    fn properties(&self) -> &[Property] {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Vec<Property> {
        &mut self.properties
    }
}

pub const VTODO: &str = "VTODO";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrips_through_name() {
        for name in ["UID", "LAST-MODIFIED", "RRULE", "X-APPLE-SORT-ORDER"] {
            assert_eq!(PropertyKind::from_name(name).name(), name);
        }
        assert_eq!(PropertyKind::from_name("summary"), PropertyKind::Summary);
    }

    #[test]
    fn test_set_replaces_all_duplicates_in_place() {
        let mut todo = Component::new("VTODO");
        todo.properties.push(Property::text(PropertyKind::Summary, "a"));
        todo.properties.push(Property::new(PropertyKind::Priority, "1"));
        todo.properties.push(Property::text(PropertyKind::Summary, "b"));

        todo.set_text(PropertyKind::Summary, "c");

        let names: Vec<_> = todo.properties.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["SUMMARY", "PRIORITY"]);
        assert_eq!(todo.text(&PropertyKind::Summary).as_deref(), Some("c"));
    }

    #[test]
    fn test_integer_parse_failure_is_an_error() {
        let mut todo = Component::new("VTODO");
        todo.properties.push(Property::new(PropertyKind::Sequence, "abc"));
        assert!(todo.integer(&PropertyKind::Sequence).is_err());
        assert!(todo.integer(&PropertyKind::Priority).unwrap().is_none());
    }

    #[test]
    fn test_text_is_escaped_on_write_and_unescaped_on_read() {
        let prop = Property::text(PropertyKind::Description, "one, two; three\nfour");
        assert_eq!(prop.value, "one\\, two\\; three\\nfour");
        assert_eq!(prop.as_text(), "one, two; three\nfour");
    }
}
