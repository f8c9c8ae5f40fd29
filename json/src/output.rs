//! The structured output tree.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

use crate::{INFINITY, NAN, NEG_INFINITY};

/// A decoded numeric value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Number {
    /// an unsigned integer (US, UL, AT)
    Unsigned(u64),
    /// a signed integer (SS, SL)
    Signed(i64),
    /// a floating point number (FL, FD)
    Float(f64),
}

impl From<u16> for Number {
    fn from(value: u16) -> Self {
        Number::Unsigned(value.into())
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Unsigned(value.into())
    }
}

impl From<i16> for Number {
    fn from(value: i16) -> Self {
        Number::Signed(value.into())
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Signed(value.into())
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value.into())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl Serialize for Number {
    /// Serializes the number as a JSON number.
    ///
    /// Non-finite floating point values have no JSON number representation
    /// and are written as the strings `"NaN"`, `"inf"` and `"-inf"`.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Number::Unsigned(n) => serializer.serialize_u64(n),
            Number::Signed(n) => serializer.serialize_i64(n),
            Number::Float(n) if n.is_finite() => serializer.serialize_f64(n),
            Number::Float(n) if n.is_nan() => serializer.serialize_str(NAN),
            Number::Float(n) if n.is_sign_positive() => serializer.serialize_str(INFINITY),
            Number::Float(_) => serializer.serialize_str(NEG_INFINITY),
        }
    }
}

/// The structured value of a single data element.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    /// textual value
    String(String),
    /// zero or more numbers
    Numbers(Vec<Number>),
    /// a single number, when single values are not kept in arrays
    Number(Number),
    /// a reference to binary data in the source buffer
    BulkData {
        /// the bulk data URI
        uri: String,
    },
    /// the serialized items of a sequence
    Sequence(Vec<OutputMap>),
}

impl OutputValue {
    /// Obtain the bulk data URI, if this is a bulk data reference.
    pub fn bulk_data_uri(&self) -> Option<&str> {
        match self {
            OutputValue::BulkData { uri } => Some(uri),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct BulkDataDef<'a> {
    #[serde(rename = "BulkDataURI")]
    uri: &'a str,
}

impl Serialize for OutputValue {
    /// Serializes the value without any type annotation:
    /// strings as strings, numbers as numbers or arrays of numbers,
    /// bulk data as `{"BulkDataURI": "..."}`
    /// and sequences as arrays of objects.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OutputValue::String(s) => serializer.serialize_str(s),
            OutputValue::Numbers(numbers) => serializer.collect_seq(numbers),
            OutputValue::Number(number) => number.serialize(serializer),
            OutputValue::BulkData { uri } => BulkDataDef { uri }.serialize(serializer),
            OutputValue::Sequence(items) => serializer.collect_seq(items),
        }
    }
}

/// A mapping from output keys to element values,
/// keeping the order in which entries were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputMap {
    entries: Vec<(String, OutputValue)>,
    index: HashMap<String, usize>,
}

impl OutputMap {
    pub fn new() -> Self {
        Default::default()
    }

    /// Insert an entry.
    ///
    /// If the key is already present, its value is replaced in place
    /// and the previous value is returned.
    pub fn insert(&mut self, key: String, value: OutputValue) -> Option<OutputValue> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Fetch a value by key.
    pub fn get(&self, key: &str) -> Option<&OutputValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for OutputMap {
    /// Serializes the mapping as a JSON object in insertion order.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serialize_numbers() {
        let v = OutputValue::Numbers(vec![20_u16.into(), (-40_i16).into(), 0.5_f32.into()]);
        assert_eq!(serde_json::to_value(&v).unwrap(), json!([20, -40, 0.5]));

        let v = OutputValue::Number(Number::from(7_u32));
        assert_eq!(serde_json::to_value(&v).unwrap(), json!(7));

        let v = OutputValue::Numbers(vec![
            f64::NAN.into(),
            f64::INFINITY.into(),
            f64::NEG_INFINITY.into(),
        ]);
        assert_eq!(serde_json::to_value(&v).unwrap(), json!(["NaN", "inf", "-inf"]));

        let v = OutputValue::Numbers(vec![]);
        assert_eq!(serde_json::to_value(&v).unwrap(), json!([]));
    }

    #[test]
    fn serialize_bulk_data_and_sequences() {
        let mut item = OutputMap::new();
        item.insert("00080100".to_string(), OutputValue::String("121327".to_string()));
        item.insert(
            "7fe00010".to_string(),
            OutputValue::BulkData {
                uri: "?offset=8&length=2".to_string(),
            },
        );
        let v = OutputValue::Sequence(vec![item, OutputMap::new()]);
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!([
                {
                    "00080100": "121327",
                    "7fe00010": { "BulkDataURI": "?offset=8&length=2" }
                },
                {}
            ])
        );
    }

    #[test]
    fn map_keeps_insertion_order_and_last_write() {
        let mut map = OutputMap::new();
        map.insert("b".to_string(), OutputValue::String("1".to_string()));
        map.insert("a".to_string(), OutputValue::String("2".to_string()));
        let previous = map.insert("b".to_string(), OutputValue::String("3".to_string()));

        assert_eq!(previous, Some(OutputValue::String("1".to_string())));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&OutputValue::String("3".to_string())));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"b":"3","a":"2"}"#);
    }
}
