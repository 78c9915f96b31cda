//! Dropdown form widget for integer fields.
//!
//! Instead of a free-form number input the field offers every integer
//! between its configured min and max.

use serde::{Deserialize, Serialize};

use crate::error::{AddCalError, AddCalResult};
use crate::render::Render;

/// Label of the "no value" option.
pub const EMPTY_OPTION: &str = "--";

/// Largest number of options a dropdown may list.
pub const MAX_OPTIONS: u64 = 10_000;

/// Settings of an integer field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerFieldSettings {
    pub min: i64,
    pub max: i64,
    /// `singular|plural` variants are allowed; the last one is shown
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

/// One `<option>` of a select element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
}

/// Form element description handed to the host's form renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectElement {
    pub default_value: Option<i64>,
    pub options: Vec<SelectOption>,
    pub empty_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_suffix: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IntegerDropdown {
    settings: IntegerFieldSettings,
}

impl IntegerDropdown {
    /// Fails with `InvalidInputType` when min and max are so far apart the
    /// range would have more than [`MAX_OPTIONS`] entries.
    pub fn new(settings: IntegerFieldSettings) -> AddCalResult<Self> {
        let span = settings.min.abs_diff(settings.max);
        if span >= MAX_OPTIONS {
            return Err(AddCalError::InvalidInputType(format!(
                "range {}..={} has more than {MAX_OPTIONS} values",
                settings.min, settings.max
            )));
        }

        Ok(IntegerDropdown { settings })
    }

    pub fn settings(&self) -> &IntegerFieldSettings {
        &self.settings
    }

    /// All selectable values, counting down when `min > max`.
    pub fn values(&self) -> Vec<i64> {
        let IntegerFieldSettings { min, max, .. } = self.settings;
        if min <= max {
            (min..=max).collect()
        } else {
            (max..=min).rev().collect()
        }
    }
}

impl Render<Option<i64>> for IntegerDropdown {
    type Output = SelectElement;

    fn render(&self, current: Option<i64>) -> SelectElement {
        let options = self
            .values()
            .into_iter()
            .map(|value| SelectOption {
                value,
                label: value.to_string(),
            })
            .collect();

        SelectElement {
            default_value: current,
            options,
            empty_option: EMPTY_OPTION.to_string(),
            field_prefix: last_variant(self.settings.prefix.as_deref()),
            field_suffix: last_variant(self.settings.suffix.as_deref()),
        }
    }
}

fn last_variant(setting: Option<&str>) -> Option<String> {
    let setting = setting.filter(|s| !s.is_empty())?;
    setting.rsplit('|').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(min: i64, max: i64) -> IntegerFieldSettings {
        IntegerFieldSettings {
            min,
            max,
            prefix: None,
            suffix: None,
        }
    }

    #[test]
    fn test_render_lists_range_inclusive() {
        let element = IntegerDropdown::new(settings(1, 5)).unwrap().render(Some(3));

        let values: Vec<i64> = element.options.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(element.options[0].label, "1");
        assert_eq!(element.default_value, Some(3));
        assert_eq!(element.empty_option, "--");
        assert_eq!(element.field_prefix, None);
    }

    #[test]
    fn test_render_descending_range() {
        let dropdown = IntegerDropdown::new(settings(3, -1)).unwrap();
        assert_eq!(dropdown.values(), vec![3, 2, 1, 0, -1]);
    }

    #[test]
    fn test_oversized_range_is_rejected() {
        for (min, max) in [(i64::MIN, i64::MAX), (i64::MAX, 0), (0, MAX_OPTIONS as i64)] {
            let err = IntegerDropdown::new(settings(min, max)).unwrap_err();
            assert!(matches!(err, AddCalError::InvalidInputType(_)));
        }

        let widest = IntegerDropdown::new(settings(1, MAX_OPTIONS as i64)).unwrap();
        assert_eq!(widest.values().len() as u64, MAX_OPTIONS);
    }

    #[test]
    fn test_single_value_range() {
        assert_eq!(IntegerDropdown::new(settings(7, 7)).unwrap().values(), vec![7]);
    }

    #[test]
    fn test_prefix_and_suffix_use_last_variant() {
        let dropdown = IntegerDropdown::new(IntegerFieldSettings {
            min: 1,
            max: 3,
            prefix: Some("$".to_string()),
            suffix: Some(" night| nights".to_string()),
        })
        .unwrap();
        let element = dropdown.render(None);

        assert_eq!(element.field_prefix.as_deref(), Some("$"));
        assert_eq!(element.field_suffix.as_deref(), Some(" nights"));
        assert_eq!(element.default_value, None);
    }

    #[test]
    fn test_empty_prefix_is_omitted() {
        let dropdown = IntegerDropdown::new(IntegerFieldSettings {
            prefix: Some(String::new()),
            ..settings(0, 1)
        })
        .unwrap();
        let json = serde_json::to_value(dropdown.render(Some(0))).unwrap();

        assert!(json.get("field_prefix").is_none());
        assert_eq!(json["options"][1]["value"], 1);
    }
}
