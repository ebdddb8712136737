//! Station identifier types.

use std::fmt;

use serde_json::Value;

/// Identifier of a station as the ticketing system names it
/// (e.g. `shanghai`, `suzhou`).
///
/// Identifiers are opaque strings. The upstream route documents are loosely
/// typed, so a `StationId` may also come from a number or other JSON scalar;
/// see [`StationId::from_json`].
///
/// # Examples
///
/// ```
/// use route_verifier::domain::StationId;
///
/// let sh = StationId::new("shanghai");
/// assert_eq!(sh.as_str(), "shanghai");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(String);

impl StationId {
    /// Create a station identifier from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Coerce a JSON value into a station identifier.
    ///
    /// Strings are used verbatim, numbers by their decimal form and booleans
    /// as `True`/`False`, as the generated Python config spells them. Arrays
    /// and objects fall back to their compact JSON text. Returns `None` for
    /// `null` and for values that coerce to an empty string.
    pub fn from_json(value: &Value) -> Option<Self> {
        let text = match value {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            other => other.to_string(),
        };

        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A directed pair of stations: `origin` is visited before `destination`
/// on at least one known route.
///
/// Ordering is lexicographic by origin, then destination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationPair {
    pub origin: StationId,
    pub destination: StationId,
}

impl StationPair {
    /// Create a new pair.
    pub fn new(origin: StationId, destination: StationId) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

impl fmt::Display for StationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_string() {
        let id = StationId::from_json(&json!("suzhou")).unwrap();
        assert_eq!(id.as_str(), "suzhou");
    }

    #[test]
    fn coerce_number() {
        assert_eq!(StationId::from_json(&json!(42)).unwrap().as_str(), "42");
        assert_eq!(StationId::from_json(&json!(1.5)).unwrap().as_str(), "1.5");
    }

    #[test]
    fn coerce_bool() {
        assert_eq!(StationId::from_json(&json!(true)).unwrap().as_str(), "True");
        assert_eq!(StationId::from_json(&json!(false)).unwrap().as_str(), "False");
    }

    #[test]
    fn reject_null_and_empty() {
        assert!(StationId::from_json(&Value::Null).is_none());
        assert!(StationId::from_json(&json!("")).is_none());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::new("nanjing");
        assert_eq!(format!("{}", id), "nanjing");
        assert_eq!(format!("{:?}", id), "StationId(nanjing)");

        let pair = StationPair::new("a".into(), "b".into());
        assert_eq!(pair.to_string(), "a -> b");
    }

    #[test]
    fn pairs_order_by_origin_then_destination() {
        let mut pairs = vec![
            StationPair::new("b".into(), "a".into()),
            StationPair::new("a".into(), "c".into()),
            StationPair::new("a".into(), "b".into()),
        ];
        pairs.sort();

        let rendered: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["a -> b", "a -> c", "b -> a"]);
    }
}
