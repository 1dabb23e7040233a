//! Typed metadata attached to regions and checkpoints
//!
//! Callers annotate measurements with small scalar values (batch sizes,
//! item counts, flags). Values are restricted to an explicit set of scalar
//! kinds so exported profiles stay structured instead of carrying opaque
//! strings. Non-finite floats are stored under their string names, since
//! JSON cannot carry them as numbers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single metadata value.
///
/// Serializes untagged, so a value appears in JSON as the bare scalar
/// (`true`, `25`, `0.5`, `"cached"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer (counts, sizes)
    Int(i64),
    /// Finite floating-point number (rates, ratios)
    Float(f64),
    /// Free-form string
    Str(String),
}

/// Metadata mapping attached to one region or checkpoint.
///
/// Ordered so that rendered and exported output is deterministic.
pub type Metadata = BTreeMap<String, MetaValue>;

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Bool(v) => write!(f, "{}", v),
            MetaValue::Int(v) => write!(f, "{}", v),
            MetaValue::Float(v) => write!(f, "{}", v),
            MetaValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<i32> for MetaValue {
    fn from(v: i32) -> Self {
        MetaValue::Int(i64::from(v))
    }
}

impl From<u32> for MetaValue {
    fn from(v: u32) -> Self {
        MetaValue::Int(i64::from(v))
    }
}

impl From<usize> for MetaValue {
    fn from(v: usize) -> Self {
        MetaValue::Int(v as i64)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            MetaValue::Float(v)
        } else {
            // serde_json writes non-finite numbers as null, which the
            // untagged deserializer cannot read back
            MetaValue::Str(v.to_string())
        }
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Str(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Str(v)
    }
}

/// Render a metadata map as `{key=value, key=value}` for alert lines and
/// report rows. Empty maps render as `{}`.
pub fn format_metadata(metadata: &Metadata) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in metadata.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push('=');
        out.push_str(&value.to_string());
    }
    out.push('}');
    out
}

/// Build a [`Metadata`] map from `key => value` pairs.
///
/// Values can be any type with a `From` conversion into [`MetaValue`]
/// (bool, integers, f64, strings).
///
/// # Example
/// ```
/// let meta = cronista::metadata! {
///     "batch_size" => 25,
///     "cached" => false,
/// };
/// assert_eq!(meta.len(), 2);
/// ```
#[macro_export]
macro_rules! metadata {
    () => {
        $crate::metadata::Metadata::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::metadata::Metadata::new();
        $(
            map.insert($key.to_string(), $crate::metadata::MetaValue::from($value));
        )+
        map
    }};
}
