//! Result value type

use serde::{Deserialize, Serialize};

/// A single value produced by a query task.
///
/// Serialized untagged, so a [`ResultSet`](super::result_set::ResultSet)
/// renders as a plain JSON object (`{"Name": "Hydra", "Heads": 8}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ResultValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ResultValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResultValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Debug-dump rendering: text is quoted, everything else is printed bare.
impl std::fmt::Display for ResultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultValue::Bool(v) => write!(f, "{}", v),
            ResultValue::Integer(v) => write!(f, "{}", v),
            ResultValue::Float(v) => write!(f, "{:?}", v),
            ResultValue::Text(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for ResultValue {
    fn from(v: bool) -> Self {
        ResultValue::Bool(v)
    }
}

impl From<i64> for ResultValue {
    fn from(v: i64) -> Self {
        ResultValue::Integer(v)
    }
}

impl From<i32> for ResultValue {
    fn from(v: i32) -> Self {
        ResultValue::Integer(v.into())
    }
}

impl From<u32> for ResultValue {
    fn from(v: u32) -> Self {
        ResultValue::Integer(v.into())
    }
}

impl From<f64> for ResultValue {
    fn from(v: f64) -> Self {
        ResultValue::Float(v)
    }
}

impl From<&str> for ResultValue {
    fn from(v: &str) -> Self {
        ResultValue::Text(v.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(v: String) -> Self {
        ResultValue::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_untagged() {
        assert_eq!(serde_json::to_string(&ResultValue::from(8)).unwrap(), "8");
        assert_eq!(
            serde_json::to_string(&ResultValue::from("Hydra")).unwrap(),
            "\"Hydra\""
        );
        assert_eq!(serde_json::to_string(&ResultValue::from(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&ResultValue::from(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_deserialize_picks_narrowest_kind() {
        let v: ResultValue = serde_json::from_str("8").unwrap();
        assert_eq!(v, ResultValue::Integer(8));
        let v: ResultValue = serde_json::from_str("8.25").unwrap();
        assert_eq!(v, ResultValue::Float(8.25));
        let v: ResultValue = serde_json::from_str("false").unwrap();
        assert_eq!(v, ResultValue::Bool(false));
    }

    #[test]
    fn test_display_quotes_text_only() {
        assert_eq!(ResultValue::from("Hydra").to_string(), "\"Hydra\"");
        assert_eq!(ResultValue::from(8).to_string(), "8");
        assert_eq!(ResultValue::from(2.0).to_string(), "2.0");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ResultValue::from(3).as_i64(), Some(3));
        assert_eq!(ResultValue::from("x").as_i64(), None);
        assert_eq!(ResultValue::from("x").as_str(), Some("x"));
    }
}
