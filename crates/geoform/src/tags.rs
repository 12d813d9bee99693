//! Typed access to free-form feature tags.
//!
//! Tags arrive as a flat JSON object. Values are reduced to text, numbers and
//! booleans; anything else is treated as absent. Unrecognized keys are kept
//! but never consulted.

use std::collections::BTreeMap;

use serde::Serialize;

pub const BUILDING: &str = "building";
pub const BUILDING_LEVELS: &str = "building:levels";
pub const HEIGHT: &str = "height";
pub const MIN_HEIGHT: &str = "min_height";
pub const BUILDING_COLOUR: &str = "building:colour";
pub const ROOF_MATERIAL: &str = "roof:material";
pub const ROOF_COLOUR: &str = "roof:colour";
pub const NATURAL: &str = "natural";

/// A single tag value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl TagValue {
    /// Convert a JSON value, dropping nulls, arrays and objects.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }

    /// Numeric interpretation of the value.
    ///
    /// Text is accepted when it holds a number with an optional `m` unit.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => parse_measure(s)?,
            Self::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value switches a feature on (`"yes"`, `"house"`, `1`, `true`).
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => {
                let s = s.trim();
                !(s.is_empty() || s.eq_ignore_ascii_case("no") || s.eq_ignore_ascii_case("false"))
            }
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<f64> for TagValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for TagValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

fn parse_measure(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix('m').unwrap_or(s).trim_end();
    s.parse().ok()
}

/// The tag mapping of one feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, TagValue>);

impl Tags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a GeoJSON properties object.
    #[must_use]
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self(
            object
                .iter()
                .filter_map(|(key, value)| TagValue::from_json(value).map(|v| (key.clone(), v)))
                .collect(),
        )
    }

    /// Builder-style insert, mostly for tests and callers assembling tags by hand.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<TagValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<TagValue>) {
        self.0.insert(key.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TagValue::as_text)
    }

    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(TagValue::as_number)
    }

    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(TagValue::is_truthy)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn building(&self) -> bool {
        self.is_truthy(BUILDING)
    }

    #[must_use]
    pub fn building_levels(&self) -> Option<f64> {
        self.number(BUILDING_LEVELS)
    }

    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.number(HEIGHT)
    }

    #[must_use]
    pub fn min_height(&self) -> Option<f64> {
        self.number(MIN_HEIGHT)
    }

    #[must_use]
    pub fn building_colour(&self) -> Option<&str> {
        self.text(BUILDING_COLOUR)
    }

    #[must_use]
    pub fn roof_material(&self) -> Option<&str> {
        self.text(ROOF_MATERIAL)
    }

    #[must_use]
    pub fn roof_colour(&self) -> Option<&str> {
        self.text(ROOF_COLOUR)
    }

    /// The `natural` value; any present value yields a natural surface.
    #[must_use]
    pub fn natural(&self) -> Option<&TagValue> {
        self.get(NATURAL)
    }
}

impl<K: Into<String>, V: Into<TagValue>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object() {
        let value = json!({
            "building": "yes",
            "height": 12.5,
            "wheelchair": true,
            "note": null,
            "nested": { "a": 1 },
        });
        let tags = Tags::from_json_object(value.as_object().unwrap());
        assert_eq!(tags.len(), 3);
        assert!(tags.building());
        assert_eq!(tags.height(), Some(12.5));
        assert_eq!(tags.get("wheelchair"), Some(&TagValue::Bool(true)));
        assert!(tags.get("note").is_none());
        assert!(tags.get("nested").is_none());
    }

    #[test]
    fn test_numeric_strings() {
        let tags = Tags::new()
            .with(HEIGHT, "21")
            .with(MIN_HEIGHT, "3.5 m")
            .with(BUILDING_LEVELS, "lots");
        assert_eq!(tags.height(), Some(21.0));
        assert_eq!(tags.min_height(), Some(3.5));
        assert_eq!(tags.building_levels(), None);
    }

    #[test]
    fn test_non_finite_numbers_are_absent() {
        let tags = Tags::new().with(HEIGHT, "inf").with(MIN_HEIGHT, f64::NAN);
        assert_eq!(tags.height(), None);
        assert_eq!(tags.min_height(), None);
    }

    #[test]
    fn test_building_truthiness() {
        for value in ["yes", "house", "commercial", "1"] {
            assert!(Tags::new().with(BUILDING, value).building(), "{value}");
        }
        for value in ["", "no", "false", "  "] {
            assert!(!Tags::new().with(BUILDING, value).building(), "{value:?}");
        }
        assert!(Tags::new().with(BUILDING, true).building());
        assert!(!Tags::new().with(BUILDING, false).building());
        assert!(!Tags::new().with(BUILDING, 0.0).building());
        assert!(!Tags::new().building());
    }

    #[test]
    fn test_text_accessors() {
        let tags: Tags = [
            (ROOF_MATERIAL, "glass"),
            (ROOF_COLOUR, "#ff0000"),
            (BUILDING_COLOUR, "white"),
            (NATURAL, "water"),
        ]
        .into_iter()
        .collect();
        assert_eq!(tags.roof_material(), Some("glass"));
        assert_eq!(tags.roof_colour(), Some("#ff0000"));
        assert_eq!(tags.building_colour(), Some("white"));
        assert_eq!(tags.natural().and_then(TagValue::as_text), Some("water"));
    }
}
