//! Typed cell values.
//!
//! Every cell of a [`Dataset`](crate::Dataset) holds a [`Value`]. Equality
//! between cells is explicit: see [`Value::cell_eq`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// A value in a dataset cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Integer value
    Int(i64),
    /// Floating point value (NaN reads as null)
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text value
    Text(String),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without zone
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns true if this value is null. A NaN float counts as null.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Replaces a NaN float with [`Value::Null`].
    pub fn normalized(self) -> Value {
        if self.is_null() { Value::Null } else { self }
    }

    /// Cell equality used by the positional diff.
    ///
    /// Null equals null, null never equals a non-null value, and non-null
    /// values are equal only when they share a variant and compare equal
    /// under that variant's native equality. `Int(1)` and `Float(1.0)` are
    /// therefore different cells. NaN is null on both sides.
    pub fn cell_eq(&self, other: &Value) -> bool {
        match (self.is_null(), other.is_null()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Float(v) if v.is_nan() => Ok(()),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

/// NaN is a missing value, not a number.
impl From<f64> for Value {
    fn from(f: f64) -> Self {
        if f.is_nan() { Value::Null } else { Value::Float(f) }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_equality() {
        assert!(Value::Null.cell_eq(&Value::Null));
        assert!(!Value::Null.cell_eq(&Value::Int(0)));
        assert!(!Value::Text(String::new()).cell_eq(&Value::Null));
    }

    #[test]
    fn test_cross_variant_values_differ() {
        assert!(!Value::Int(1).cell_eq(&Value::Float(1.0)));
        assert!(!Value::Text("1".into()).cell_eq(&Value::Int(1)));
        assert!(Value::Float(1.5).cell_eq(&Value::Float(1.5)));
    }

    #[test]
    fn test_nan_is_null() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        assert_eq!(Value::from(2.5), Value::Float(2.5));
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(1985, 1, 7).unwrap();
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(44).to_string(), "44");
        assert_eq!(Value::from(date).to_string(), "1985-01-07");
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_nan_float_behaves_as_null() {
        let nan = Value::Float(f64::NAN);
        assert!(nan.is_null());
        assert!(nan.cell_eq(&Value::Float(f64::NAN)));
        assert!(nan.cell_eq(&Value::Null));
        assert!(!nan.cell_eq(&Value::Float(0.0)));
        assert!(!Value::Int(0).cell_eq(&nan));
        assert_eq!(nan.normalized(), Value::Null);
    }
}
