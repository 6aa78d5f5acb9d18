//! Flat key-value records: the unit forwarded to every sink.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    /// Values that do not fit `i64`, e.g. session uids.
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON scalar. Returns `None` for null, arrays and objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Integer)
                .or_else(|| n.as_u64().map(FieldValue::Unsigned))
                .or_else(|| n.as_f64().map(FieldValue::Float)),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Numeric view used for gauges; text and booleans are not numeric.
    #[expect(
        clippy::cast_precision_loss,
        reason = "gauge values are f64; integers past 2^53 lose low bits"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Unsigned(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Boolean(_) | FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Unsigned(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Boolean(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        FieldValue::Integer(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

/// One flattened record: field name to scalar, ordered by name.
///
/// Never holds nested data; array fields appear as `<name>1..<name>K`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord(BTreeMap<String, FieldValue>);

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Copy every field of `other` into `self`; `other` wins on collision.
    pub fn overlay(&mut self, other: &FlatRecord) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// True when the record has a non-empty `name` field.
    pub fn has_name(&self) -> bool {
        self.get("name")
            .is_some_and(|v| !matches!(v, FieldValue::Text(s) if s.is_empty()))
    }
}

impl FromIterator<(String, FieldValue)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Wall-clock time as float seconds since the Unix epoch.
#[expect(
    clippy::cast_precision_loss,
    reason = "microsecond timestamps stay well below 2^53"
)]
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn json_numbers_keep_their_kind() {
        let v = serde_json::json!(-3);
        assert_eq!(FieldValue::from_json(&v), Some(FieldValue::Integer(-3)));
        let v = serde_json::json!(u64::MAX);
        assert_eq!(FieldValue::from_json(&v), Some(FieldValue::Unsigned(u64::MAX)));
        let v = serde_json::json!(1.5);
        assert_eq!(FieldValue::from_json(&v), Some(FieldValue::Float(1.5)));
        assert_eq!(FieldValue::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn numeric_view_covers_every_number_kind() {
        assert_eq!(FieldValue::Integer(-7).as_f64(), Some(-7.0));
        assert_eq!(FieldValue::Unsigned(1 << 40).as_f64(), Some(1_099_511_627_776.0));
        assert_eq!(FieldValue::Float(0.25).as_f64(), Some(0.25));
        assert_eq!(FieldValue::Boolean(true).as_f64(), None);
        assert_eq!(FieldValue::from("12").as_f64(), None);
    }

    #[test]
    fn epoch_seconds_has_sub_second_resolution() {
        let now = epoch_seconds();
        assert!(now > 1.6e9);
        assert!(now.fract() >= 0.0 && now.fract() < 1.0);
    }

    #[test]
    fn overlay_replaces_colliding_fields() {
        let mut base = FlatRecord::new();
        base.insert("speed", 200i64);
        base.insert("packet_id", 0i64);
        let mut top = FlatRecord::new();
        top.insert("packet_id", 6i64);
        base.overlay(&top);
        assert_eq!(base.get("packet_id"), Some(&FieldValue::Integer(6)));
        assert_eq!(base.get("speed"), Some(&FieldValue::Integer(200)));
    }

    #[test]
    fn name_presence() {
        let mut r = FlatRecord::new();
        assert!(!r.has_name());
        r.insert("name", "");
        assert!(!r.has_name());
        r.insert("name", "NORRIS");
        assert!(r.has_name());
    }

    #[test]
    fn serializes_as_plain_object() -> TestResult {
        let mut r = FlatRecord::new();
        r.insert("gear", 7i64);
        r.insert("name", "ALONSO");
        let json = serde_json::to_string(&r)?;
        assert_eq!(json, r#"{"gear":7,"name":"ALONSO"}"#);
        Ok(())
    }
}
