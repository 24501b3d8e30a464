//! Values bound to statements and carried in query fingerprints.
//!
//! [`Value`] compares numbers by mathematical value: `Int(1)`, `Float(1.0)`
//! and a widened `1f32` are all equal and hash identically, while `Int(1)`
//! and `String("1")` are not.
//!
//! ```rust
//! use quill_query::Value;
//!
//! let a: Value = 1i32.into();
//! let b: Value = 1.0f64.into();
//! assert_eq!(a, b);
//! assert_ne!(a, Value::from("1"));
//! assert_ne!(a, Value::from(1.2));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A parameter or attribute value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// JSON value.
    Json(serde_json::Value),
    /// List of values.
    List(Vec<Value>),
}

impl Value {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this is a numeric value.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// A short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Json(_) => "json",
            Self::List(_) => "list",
        }
    }

    /// Integral view of a number, if it has one.
    ///
    /// Floats qualify only when they have no fractional part and fit in `i64`.
    fn as_integral(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => integral_f64(*f),
            _ => None,
        }
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && (-BOUND..BOUND).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Int(_), Self::Float(_)) | (Self::Float(_), Self::Int(_)) => {
                match (self.as_integral(), other.as_integral()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Numbers equal by value must land on the same tag.
        match self {
            Self::Null => 0u8.hash(state),
            Self::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Self::Int(_) | Self::Float(_) => match self.as_integral() {
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None => {
                    3u8.hash(state);
                    if let Self::Float(f) = self {
                        let bits = if f.is_nan() { f64::NAN.to_bits() } else { f.to_bits() };
                        bits.hash(state);
                    }
                }
            },
            Self::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Self::Json(j) => {
                5u8.hash(state);
                j.to_string().hash(state);
            }
            Self::List(items) => {
                6u8.hash(state);
                items.len().hash(state);
                for item in items {
                    item.hash(state);
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => f.write_str(s),
            Self::Json(j) => write!(f, "{}", j),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(v as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Float(v as f64),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_numeric_equality_across_types() {
        let values = [
            Value::from(1i32),
            Value::from(1i64),
            Value::from(1.0f64),
            Value::from(1.0f32),
            Value::from(1u64),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(a, b);
                assert_eq!(hash_of(a), hash_of(b));
            }
        }
    }

    #[test]
    fn test_numeric_inequality() {
        assert_ne!(Value::from(1), Value::from(1.2));
        assert_ne!(Value::from(1), Value::from("1"));
        assert_ne!(Value::from(2), Value::from(1.0));
    }

    #[test]
    fn test_strings_are_case_sensitive() {
        assert_ne!(Value::from("Andrey"), Value::from("andrey"));
        assert_eq!(Value::from("Andrey"), Value::from(String::from("Andrey")));
    }

    #[test]
    fn test_nan_is_reflexive() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(hash_of(&nan), hash_of(&Value::Float(-f64::NAN)));
    }

    #[test]
    fn test_large_u64_does_not_wrap() {
        let big = Value::from(u64::MAX);
        assert!(matches!(big, Value::Float(_)));
        assert_ne!(big, Value::from(-1i64));
    }

    #[test]
    fn test_list_equality_is_numeric_tolerant() {
        assert_eq!(Value::from(vec![1, 2]), Value::from(vec![1.0, 2.0]));
    }

    #[test]
    fn test_option_into_null() {
        let v: Value = Option::<i32>::None.into();
        assert!(v.is_null());
        assert_eq!(v.kind(), "null");
    }
}
