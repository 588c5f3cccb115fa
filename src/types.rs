//! Core data model types.
//!
//! A [`DataSet`] is an ordered list of [`Record`]s. Each record maps field names to scalar
//! [`Value`]s; fields may be absent from individual rows. A [`Schema`] (a list of typed
//! [`Field`]s) is only needed when ingesting untyped sources such as CSV.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the expected shape of incoming data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single scalar value in a [`Record`].
///
/// Serializes untagged, so a record round-trips through plain JSON objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    #[default]
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for `Null` and for the empty string. Every component uses this same test.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value. Booleans are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convert a JSON scalar into a value. Arrays and objects have no scalar form.
    pub fn from_json(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int64)
                .or_else(|| n.as_f64().map(Value::Float64)),
            serde_json::Value::String(s) => Some(Value::Utf8(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// JSON form of the value. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int64(v) => serde_json::Value::from(*v),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Utf8(s) => serde_json::Value::String(s.clone()),
        }
    }
}

// Floats compare bitwise so values can key hash maps (frequency counters, dedup keys).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Utf8(a), Value::Utf8(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int64(v) => v.hash(state),
            Value::Float64(v) => v.to_bits().hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Utf8(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One row: field name to value.
pub type Record = BTreeMap<String, Value>;

/// Build a [`Record`] from `(name, value)` pairs.
pub fn record<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// In-memory tabular dataset held entirely in memory, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSet {
    /// Row storage.
    pub rows: Vec<Record>,
}

impl DataSet {
    /// Create a dataset from rows.
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` when the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of field names across all rows, sorted.
    pub fn field_names(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    /// Create a new dataset containing only rows that match `predicate`.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect();
        Self { rows }
    }

    /// Create a new dataset by applying `mapper` to every row.
    pub fn map_rows<F>(&self, mapper: F) -> Self
    where
        F: FnMut(&Record) -> Record,
    {
        Self {
            rows: self.rows.iter().map(mapper).collect(),
        }
    }
}

impl From<Vec<Record>> for DataSet {
    fn from(rows: Vec<Record>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Record> for DataSet {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{record, DataSet, Value};

    fn sample_dataset() -> DataSet {
        DataSet::new(vec![
            record([("id", Value::Int64(1)), ("name", Value::from("a"))]),
            record([("id", Value::Int64(2)), ("active", Value::Bool(false))]),
            record([("id", Value::Int64(3)), ("name", Value::from(""))]),
        ])
    }

    #[test]
    fn missing_covers_null_and_empty_string_only() {
        assert!(Value::Null.is_missing());
        assert!(Value::from("").is_missing());
        assert!(!Value::from(" ").is_missing());
        assert!(!Value::Int64(0).is_missing());
        assert!(!Value::Bool(false).is_missing());
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert_eq!(Value::Bool(true).as_f64(), None);
        assert_eq!(Value::Int64(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float64(2.5).as_f64(), Some(2.5));
    }

    #[test]
    fn field_names_is_union_across_rows() {
        let ds = sample_dataset();
        let names: Vec<&str> = ds.field_names().into_iter().collect();
        assert_eq!(names, vec!["active", "id", "name"]);
    }

    #[test]
    fn filter_rows_keeps_original_unchanged() {
        let ds = sample_dataset();
        let out = ds.filter_rows(|row| matches!(row.get("id"), Some(Value::Int64(v)) if *v > 1));
        assert_eq!(out.row_count(), 2);
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn untagged_json_round_trip() {
        let row = record([
            ("a", Value::Null),
            ("b", Value::Int64(7)),
            ("c", Value::Float64(1.5)),
            ("d", Value::Bool(true)),
            ("e", Value::from("x")),
        ]);
        let text = serde_json::to_string(&row).unwrap();
        assert_eq!(text, r#"{"a":null,"b":7,"c":1.5,"d":true,"e":"x"}"#);
        let back: super::Record = serde_json::from_str(&text).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn int_and_float_are_distinct_keys() {
        assert_ne!(Value::Int64(1), Value::Float64(1.0));
        assert_eq!(Value::Float64(1.0), Value::Float64(1.0));
    }
}
