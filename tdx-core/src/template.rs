//! The `KEY: value` template exchanged with the user's editor.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::add::DatePhraseParser;
use crate::error::{TdxError, TdxResult};
use crate::ics::value::local_midnight;
use crate::ics::{PropertyBag, PropertyKind};
use crate::item::{Item, Priority, Status};

/// Editable properties, in template order.
pub const TEMPLATE_FIELDS: [PropertyKind; 6] = [
    PropertyKind::Summary,
    PropertyKind::Description,
    PropertyKind::Status,
    PropertyKind::Priority,
    PropertyKind::Due,
    PropertyKind::Location,
];

const DATETIME_LAYOUT: &str = "%-d %b %Y %H:%M";
const DATETIME_PARSE: &str = "%d %b %Y %H:%M";
const DATE_PARSE: &str = "%d %b %Y";

const TEMPLATE_HELP: &str = "
--------------------

Leave a value empty to remove it.

DUE accepts:
- \"2 Jan 2006 15:04\"
- \"2 Jan 2006\"
- a duration from now, e.g. \"3days\" or \"2h 30m\"
- a natural date, e.g. \"next friday\"

PRIORITY can be:
- high
- medium
- low

STATUS can be:
- NEEDS-ACTION
- IN-PROCESS
- COMPLETED
- CANCELLED
";

/// Render the editable fields of `item`, followed by help text.
pub fn render_template(item: &Item) -> String {
    let mut out = String::new();
    for kind in &TEMPLATE_FIELDS {
        out.push_str(&format!("{}: {}\n", kind.name(), field_value(item, kind)));
    }
    out.push_str(TEMPLATE_HELP);
    out
}

/// The single-line template form of one field.
fn field_value(item: &Item, kind: &PropertyKind) -> String {
    match kind {
        PropertyKind::Due => item
            .due()
            .map(|due| due.with_timezone(&Local).format(DATETIME_LAYOUT).to_string())
            .unwrap_or_default(),
        PropertyKind::Priority => item
            .priority_band()
            .map(|p| p.keyword().to_string())
            .unwrap_or_default(),
        _ => item
            .vtodo()
            .text(kind)
            .map(|t| t.replace('\n', "\\n"))
            .unwrap_or_default(),
    }
}

/// Read `KEY: value` lines up to the first blank line or `-` separator.
pub fn parse_template(text: &str) -> TdxResult<Vec<(PropertyKind, String)>> {
    let mut fields = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() || line.starts_with('-') {
            break;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| TdxError::Template(format!("Expected \"KEY: value\", got {:?}", line)))?;

        let kind = PropertyKind::from_name(key.trim());
        if !TEMPLATE_FIELDS.contains(&kind) {
            return Err(TdxError::Template(format!(
                "Unknown field {:?}. Valid fields: {}",
                key.trim(),
                TEMPLATE_FIELDS.map(|k| k.name().to_string()).join(", ")
            )));
        }

        fields.push((kind, value.trim().to_string()));
    }

    Ok(fields)
}

/// Apply an edited template to `item`. Fields whose value is unchanged are
/// left alone; empty values remove the property. Returns whether anything
/// changed.
pub fn apply_template(
    item: &mut Item,
    text: &str,
    now: DateTime<Local>,
    dates: &dyn DatePhraseParser,
) -> TdxResult<bool> {
    let mut changed = false;

    for (kind, value) in parse_template(text)? {
        if field_value(item, &kind) == value {
            continue;
        }
        changed = true;

        if value.is_empty() {
            item.vtodo_mut().remove(&kind);
            continue;
        }

        match kind {
            PropertyKind::Due => item.set_due(Some(parse_due(&value, now, dates)?)),
            PropertyKind::Priority => {
                let priority: Priority = value.parse()?;
                item.set_priority(Some(priority.value()));
            }
            PropertyKind::Status => {
                let status: Status = value.parse()?;
                item.set_status(status);
                if status == Status::Completed {
                    item.vtodo_mut()
                        .set_instant(PropertyKind::Completed, now.with_timezone(&Utc));
                } else {
                    item.vtodo_mut().remove(&PropertyKind::Completed);
                }
            }
            kind => item
                .vtodo_mut()
                .set_text(kind, &value.replace("\\n", "\n")),
        }
    }

    Ok(changed)
}

/// Parse a DUE value: an absolute date(-time), a duration from now, or a
/// natural date phrase.
pub fn parse_due(
    value: &str,
    now: DateTime<Local>,
    dates: &dyn DatePhraseParser,
) -> TdxResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, DATETIME_PARSE) {
        if let Some(at) = Local.from_local_datetime(&naive).earliest() {
            return Ok(at.with_timezone(&Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_PARSE) {
        if let Some(at) = local_midnight(date) {
            return Ok(at);
        }
    }

    if let Ok(duration) = humantime::parse_duration(value) {
        if let Ok(duration) = chrono::Duration::from_std(duration) {
            return Ok((now + duration).with_timezone(&Utc));
        }
    }

    dates
        .find(value, now)
        .map(|m| m.instant())
        .ok_or_else(|| TdxError::Template(format!("Could not parse DUE value {:?}", value)))
}
