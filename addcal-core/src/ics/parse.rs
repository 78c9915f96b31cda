//! Reading generated ICS text back into properties.

use icalendar::parser::{Component, read_components, unfold};

use crate::error::{AddCalError, AddCalResult};

/// One content line of an ICS document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsProperty {
    pub name: String,
    pub params: Vec<(String, String)>,
    /// Value with TEXT escaping removed
    pub value: String,
}

impl IcsProperty {
    fn marker(name: &str, component: &Component) -> Self {
        IcsProperty {
            name: name.to_string(),
            params: Vec::new(),
            value: component.name.as_str().to_string(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse `content` into a flat list of properties in document order.
///
/// Each component contributes a `BEGIN` entry, its own properties, its
/// subcomponents and an `END` entry, so the list mirrors the content lines.
pub fn parse_properties(content: &str) -> AddCalResult<Vec<IcsProperty>> {
    let unfolded = unfold(content);
    let components = read_components(&unfolded).map_err(AddCalError::IcsParse)?;

    let mut properties = Vec::new();
    for component in &components {
        flatten(component, &mut properties);
    }
    Ok(properties)
}

fn flatten(component: &Component, out: &mut Vec<IcsProperty>) {
    out.push(IcsProperty::marker("BEGIN", component));

    for property in &component.properties {
        out.push(IcsProperty {
            name: property.name.as_str().to_ascii_uppercase(),
            params: property
                .params
                .iter()
                .map(|param| {
                    (
                        param.key.as_str().to_ascii_uppercase(),
                        param
                            .val
                            .as_ref()
                            .map(|val| val.as_str().to_string())
                            .unwrap_or_default(),
                    )
                })
                .collect(),
            value: property.val.as_str().to_string(),
        });
    }

    for child in &component.components {
        flatten(child, out);
    }

    out.push(IcsProperty::marker("END", component));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties_with_params() {
        let ics = "BEGIN:VEVENT\r\nDTSTART;VALUE=DATE:20240301\r\nURL;VALUE=URI:https://example.org/node/1\r\nEND:VEVENT";
        let props = parse_properties(ics).unwrap();

        assert_eq!(props.len(), 4);
        assert_eq!(props[0].name, "BEGIN");
        assert_eq!(props[0].value, "VEVENT");
        assert_eq!(props[1].name, "DTSTART");
        assert_eq!(props[1].param("value"), Some("DATE"));
        assert_eq!(props[1].value, "20240301");
        assert_eq!(props[2].value, "https://example.org/node/1");
        assert_eq!(props[3].name, "END");
    }

    #[test]
    fn test_parse_properties_unfolds_and_unescapes_text() {
        let ics = "BEGIN:VEVENT\r\nSUMMARY:Talks\\, tea\\; and\r\n  cake\r\nLOCATION:\r\nEND:VEVENT\r\n";
        let props = parse_properties(ics).unwrap();

        assert_eq!(props[1].name, "SUMMARY");
        assert_eq!(props[1].value, "Talks, tea; and cake");
        assert_eq!(props[2].name, "LOCATION");
        assert_eq!(props[2].value, "");
    }

    #[test]
    fn test_parse_properties_nested_components_in_order() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:x\r\nEND:VEVENT\r\nEND:VCALENDAR";
        let names: Vec<String> = parse_properties(ics)
            .unwrap()
            .into_iter()
            .map(|p| format!("{}:{}", p.name, p.value))
            .collect();

        assert_eq!(
            names,
            [
                "BEGIN:VCALENDAR",
                "VERSION:2.0",
                "BEGIN:VEVENT",
                "UID:x",
                "END:VEVENT",
                "END:VCALENDAR"
            ]
        );
    }

    #[test]
    fn test_parse_properties_rejects_unterminated_component() {
        let err = parse_properties("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n").unwrap_err();
        assert!(matches!(err, AddCalError::IcsParse(_)));
    }
}
