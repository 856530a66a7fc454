//! ICS generation.
//!
//! Properties are written in the order they were decoded so a file that goes
//! through decode and encode only changes where the writer changed it.

use crate::ics::model::{CalendarObject, Component, Property};

/// Octet limit for a content line before folding (RFC 5545 section 3.1).
const MAX_LINE_OCTETS: usize = 75;

/// Serialize a calendar object to `.ics` text with CRLF line endings.
pub fn generate_ics(calendar: &CalendarObject) -> String {
    let mut out = String::new();
    out.push_str("BEGIN:VCALENDAR\r\n");
    for prop in &calendar.properties {
        write_property(&mut out, prop);
    }
    for component in &calendar.components {
        write_component(&mut out, component);
    }
    out.push_str("END:VCALENDAR\r\n");
    out
}

fn write_component(out: &mut String, component: &Component) {
    out.push_str(&format!("BEGIN:{}\r\n", component.name));
    for prop in &component.properties {
        write_property(out, prop);
    }
    for child in &component.components {
        write_component(out, child);
    }
    out.push_str(&format!("END:{}\r\n", component.name));
}

fn write_property(out: &mut String, prop: &Property) {
    let mut line = String::from(prop.name());
    for (key, val) in &prop.params {
        line.push(';');
        line.push_str(key);
        if let Some(val) = val {
            line.push('=');
            if needs_quotes(val) {
                line.push('"');
                line.push_str(val);
                line.push('"');
            } else {
                line.push_str(val);
            }
        }
    }
    line.push(':');
    line.push_str(&prop.value);

    out.push_str(&fold_line(&line));
    out.push_str("\r\n");
}

fn needs_quotes(param: &str) -> bool {
    !param.starts_with('"') && param.contains([':', ';', ','])
}

/// Fold a content line at the octet limit without splitting a UTF-8 char.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    // continuation lines start with a space, which counts toward the limit
    let mut limit = MAX_LINE_OCTETS;

    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > limit {
            folded.push_str("\r\n ");
            width = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        folded.push(c);
        width += len;
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::model::{PropertyBag, PropertyKind};
    use crate::ics::parse::parse_todo_calendar;

    fn sample_calendar() -> CalendarObject {
        let mut todo = Component::new("VTODO");
        todo.set_text(PropertyKind::Uid, "uid-1");
        todo.set_text(PropertyKind::Summary, "Call mom, then dad");
        let mut alarm = Component::new("VALARM");
        alarm.properties.push(Property::new(
            PropertyKind::Other("TRIGGER".to_string()),
            "-PT15M",
        ));
        todo.components.push(alarm);

        let mut calendar = CalendarObject::default();
        calendar.set_text(PropertyKind::Version, "2.0");
        calendar.set_text(PropertyKind::ProdId, "-//TEST//EN");
        calendar.components.push(todo);
        calendar
    }

    #[test]
    fn test_generate_keeps_order_and_nested_components() {
        let ics = generate_ics(&sample_calendar());
        let lines: Vec<&str> = ics.lines().collect();

        assert_eq!(
            lines,
            vec![
                "BEGIN:VCALENDAR",
                "VERSION:2.0",
                "PRODID:-//TEST//EN",
                "BEGIN:VTODO",
                "UID:uid-1",
                "SUMMARY:Call mom\\, then dad",
                "BEGIN:VALARM",
                "TRIGGER:-PT15M",
                "END:VALARM",
                "END:VTODO",
                "END:VCALENDAR",
            ]
        );
        assert!(ics.ends_with("\r\n"));
    }

    #[test]
    fn test_generate_quotes_params_with_separators() {
        let mut prop = Property::new(PropertyKind::Other("ATTENDEE".to_string()), "mailto:a@b.c");
        prop.params.push(("CN".to_string(), Some("Doe, Jane".to_string())));
        let mut out = String::new();
        write_property(&mut out, &prop);
        assert_eq!(out, "ATTENDEE;CN=\"Doe, Jane\":mailto:a@b.c\r\n");
    }

    #[test]
    fn test_fold_long_lines() {
        let long = format!("DESCRIPTION:{}", "é".repeat(60));
        let folded = fold_line(&long);

        for physical in folded.split("\r\n") {
            assert!(physical.len() <= MAX_LINE_OCTETS, "line too long: {}", physical.len());
        }
        assert_eq!(folded.replace("\r\n ", ""), long);
    }

    #[test]
    fn test_generate_then_parse_roundtrip() {
        let calendar = sample_calendar();
        let parsed = parse_todo_calendar(&generate_ics(&calendar))
            .unwrap()
            .expect("todo survives");
        assert_eq!(parsed, calendar);
    }
}
