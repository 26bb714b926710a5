use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// Leaf values of a decoded report.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// A value recovered from LLM output, decoded once from JSON (or built by the
/// section extractor) so that rendering dispatches on an explicit tag.
///
/// Mappings keep their entries in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportValue {
    Scalar(Scalar),
    Sequence(Vec<ReportValue>),
    Mapping(Vec<(String, ReportValue)>),
}

impl ReportValue {
    pub fn text(s: impl Into<String>) -> Self {
        ReportValue::Scalar(Scalar::Text(s.into()))
    }

    pub fn null() -> Self {
        ReportValue::Scalar(Scalar::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ReportValue::Scalar(Scalar::Null))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ReportValue::Scalar(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ReportValue::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReportValue::Scalar(Scalar::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ReportValue]> {
        match self {
            ReportValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, ReportValue)]> {
        match self {
            ReportValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key in a mapping. Returns `None` for other shapes.
    pub fn get(&self, key: &str) -> Option<&ReportValue> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Like [`get`](Self::get), but treats `null` as absent.
    pub fn get_present(&self, key: &str) -> Option<&ReportValue> {
        self.get(key).filter(|v| !v.is_null())
    }

    /// Plain-text form of a scalar, or compact JSON for containers.
    pub fn to_display_string(&self) -> String {
        match self {
            ReportValue::Scalar(s) => s.to_string(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

impl From<Value> for ReportValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ReportValue::Scalar(Scalar::Null),
            Value::Bool(b) => ReportValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => ReportValue::Scalar(Scalar::Number(n)),
            Value::String(s) => ReportValue::Scalar(Scalar::Text(s)),
            Value::Array(items) => {
                ReportValue::Sequence(items.into_iter().map(ReportValue::from).collect())
            }
            Value::Object(map) => ReportValue::Mapping(
                map.into_iter().map(|(k, v)| (k, ReportValue::from(v))).collect(),
            ),
        }
    }
}

impl Serialize for ReportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportValue::Scalar(Scalar::Null) => serializer.serialize_unit(),
            ReportValue::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            ReportValue::Scalar(Scalar::Number(n)) => n.serialize(serializer),
            ReportValue::Scalar(Scalar::Text(s)) => serializer.serialize_str(s),
            ReportValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ReportValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
