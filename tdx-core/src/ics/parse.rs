//! ICS decoding using the icalendar crate's parser.

use icalendar::parser::{self, read_calendar, unfold};

use crate::ics::model::{CalendarObject, Component, Property, PropertyKind};

/// Stands in for `\` while the parser runs, so its TEXT unescaping leaves
/// values in wire form. U+FDD0 is a noncharacter.
const BACKSLASH_GUARD: char = '\u{FDD0}';

/// Decode a calendar stream and return the first `VCALENDAR` block that
/// contains a VTODO.
///
/// `Ok(None)` means the stream decoded fine but holds no todo (e.g. a file
/// with only a VEVENT). A malformed block anywhere in the stream is an error.
pub fn parse_todo_calendar(content: &str) -> Result<Option<CalendarObject>, String> {
    let unfolded = unfold(content).replace('\\', &BACKSLASH_GUARD.to_string());
    let blocks = calendar_blocks(&unfolded);

    if blocks.is_empty() {
        return Err("no VCALENDAR block found".to_string());
    }

    for block in blocks {
        let parsed = read_calendar(&block).map_err(|e| e.to_string())?;
        let calendar = to_calendar_object(&parsed);

        if calendar.todo_index().is_some() {
            return Ok(Some(calendar));
        }
    }

    Ok(None)
}

/// Split an unfolded stream into its top-level `VCALENDAR` blocks.
fn calendar_blocks(unfolded: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in unfolded.lines() {
        let trimmed = line.trim_end_matches('\r');
        if trimmed.eq_ignore_ascii_case("BEGIN:VCALENDAR") {
            current = Some(vec![trimmed]);
            continue;
        }
        if let Some(lines) = current.as_mut() {
            if trimmed.is_empty() {
                continue;
            }
            lines.push(trimmed);
            if trimmed.eq_ignore_ascii_case("END:VCALENDAR") {
                blocks.push(lines.join("\r\n"));
                current = None;
            }
        }
    }

    blocks
}

fn to_calendar_object(parsed: &parser::Calendar) -> CalendarObject {
    let mut calendar = CalendarObject {
        properties: parsed.properties.iter().map(to_property).collect(),
        components: parsed.components.iter().map(to_component).collect(),
    };

    // Some parser versions keep the VCALENDAR wrapper as the only component
    let wrapped = calendar.components.len() == 1 && calendar.components[0].is("VCALENDAR");
    if wrapped {
        let wrapper = calendar.components.remove(0);
        calendar.properties.extend(wrapper.properties);
        calendar.components = wrapper.components;
    }

    calendar
}

fn to_component(component: &parser::Component) -> Component {
    Component {
        name: component.name.to_string().to_ascii_uppercase(),
        properties: component.properties.iter().map(to_property).collect(),
        components: component.components.iter().map(to_component).collect(),
    }
}

fn to_property(prop: &parser::Property) -> Property {
    Property {
        kind: PropertyKind::from_name(prop.name.as_ref()),
        params: prop
            .params
            .iter()
            .map(|p| (p.key.to_string(), p.val.as_ref().map(|v| restore(v.as_ref()))))
            .collect(),
        value: restore(prop.val.as_ref()),
    }
}

fn restore(guarded: &str) -> String {
    guarded.replace(BACKSLASH_GUARD, "\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::model::PropertyBag;

    const TODO_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//TEST//EN\r\n\
BEGIN:VTODO\r\n\
UID:abc-123\r\n\
SUMMARY:Ship release #launch\r\n\
PRIORITY:1\r\n\
STATUS:NEEDS-ACTION\r\n\
X-CUSTOM;X-PARAM=1:kept\r\n\
DESCRIPTION:Hello \r\n world\\, again\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parse_todo_with_folding_and_escapes() {
        let calendar = parse_todo_calendar(TODO_ICS).unwrap().expect("has a todo");
        let todo = &calendar.components[calendar.todo_index().unwrap()];

        assert_eq!(todo.text(&PropertyKind::Uid).as_deref(), Some("abc-123"));
        assert_eq!(
            todo.text(&PropertyKind::Description).as_deref(),
            Some("Hello world, again")
        );
        assert_eq!(todo.integer(&PropertyKind::Priority).unwrap(), Some(1));
        assert_eq!(
            calendar.text(&PropertyKind::ProdId).as_deref(),
            Some("-//TEST//EN")
        );
    }

    #[test]
    fn test_parse_keeps_text_values_in_wire_form() {
        let ics = "BEGIN:VCALENDAR\r\n\
BEGIN:VTODO\r\n\
UID:t\r\n\
DESCRIPTION:line one\\nline two C:\\\\temp\\, ok\r\n\
CATEGORIES:a\\,b,c\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

        let calendar = parse_todo_calendar(ics).unwrap().unwrap();
        let todo = &calendar.components[0];
        let description = todo.get(&PropertyKind::Description).unwrap();

        assert_eq!(description.value, "line one\\nline two C:\\\\temp\\, ok");
        assert_eq!(description.as_text(), "line one\nline two C:\\temp, ok");

        let categories = todo
            .get(&PropertyKind::Other("CATEGORIES".to_string()))
            .unwrap();
        assert_eq!(categories.value, "a\\,b,c");
    }

    #[test]
    fn test_parse_keeps_unknown_properties_and_params() {
        let calendar = parse_todo_calendar(TODO_ICS).unwrap().unwrap();
        let todo = &calendar.components[0];
        let custom = todo
            .get(&PropertyKind::Other("X-CUSTOM".to_string()))
            .expect("custom property kept");

        assert_eq!(custom.value, "kept");
        assert_eq!(custom.param("X-PARAM"), Some("1"));
    }

    #[test]
    fn test_parse_event_only_file_has_no_todo() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:event-1
SUMMARY:Meeting
DTSTART:20240101T100000Z
END:VEVENT
END:VCALENDAR"#;

        assert_eq!(parse_todo_calendar(ics).unwrap(), None);
    }

    #[test]
    fn test_parse_picks_first_block_with_a_todo() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:event-1
SUMMARY:Meeting
END:VEVENT
END:VCALENDAR
BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VTODO
UID:todo-1
SUMMARY:Second block
END:VTODO
END:VCALENDAR"#;

        let calendar = parse_todo_calendar(ics).unwrap().unwrap();
        assert_eq!(calendar.todo_index(), Some(0));
        assert_eq!(
            calendar.components[0].text(&PropertyKind::Summary).as_deref(),
            Some("Second block")
        );
    }

    #[test]
    fn test_parse_without_calendar_is_an_error() {
        assert!(parse_todo_calendar("this is not ics").is_err());
    }
}
