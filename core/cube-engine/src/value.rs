//! FILENAME: core/cube-engine/src/value.rs
//! Cube Value - The canonical raw value a dimension extracts from an item.
//!
//! Dimensions turn arbitrary items into a `CubeValue`, and every grouping,
//! filtering and path signature goes through the value's canonical key.
//! Missing data is represented by `CubeValue::Empty`, which keys to a reserved
//! sentinel so that untrusted rows end up in an "Unknown" bucket instead of
//! failing the whole aggregation.

use serde::{Deserialize, Serialize};

/// Reserved bucket key for `Empty` values.
pub const NULL_KEY: &str = "__null__";

/// Default display label for the `Empty` bucket.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ============================================================================
// CUBE VALUE
// ============================================================================

/// A normalized, hashable representation of an item's field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeValue {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl CubeValue {
    pub fn text(s: impl Into<String>) -> Self {
        CubeValue::Text(s.into())
    }

    pub fn number(n: f64) -> Self {
        CubeValue::Number(OrderedFloat(n))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CubeValue::Empty)
    }

    /// Returns the numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CubeValue::Number(n) => Some(n.0),
            _ => None,
        }
    }

    /// String coercion used as the default bucket key.
    /// `Empty` maps to [`NULL_KEY`].
    pub fn canonical_key(&self) -> String {
        match self {
            CubeValue::Empty => NULL_KEY.to_string(),
            CubeValue::Number(n) => format_key_number(n.0),
            CubeValue::Text(s) => s.clone(),
            CubeValue::Boolean(b) => b.to_string(),
        }
    }
}

impl Default for CubeValue {
    fn default() -> Self {
        CubeValue::Empty
    }
}

/// Integral numbers key without a fractional part ("5", not "5.0").
fn format_key_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{:.0}", n);
    }
    n.to_string()
}

impl From<&str> for CubeValue {
    fn from(value: &str) -> Self {
        CubeValue::Text(value.to_string())
    }
}

impl From<String> for CubeValue {
    fn from(value: String) -> Self {
        CubeValue::Text(value)
    }
}

impl From<&String> for CubeValue {
    fn from(value: &String) -> Self {
        CubeValue::Text(value.clone())
    }
}

impl From<f64> for CubeValue {
    fn from(value: f64) -> Self {
        CubeValue::Number(OrderedFloat(value))
    }
}

impl From<i64> for CubeValue {
    fn from(value: i64) -> Self {
        CubeValue::Number(OrderedFloat(value as f64))
    }
}

impl From<u32> for CubeValue {
    fn from(value: u32) -> Self {
        CubeValue::Number(OrderedFloat(value as f64))
    }
}

impl From<bool> for CubeValue {
    fn from(value: bool) -> Self {
        CubeValue::Boolean(value)
    }
}

impl<V: Into<CubeValue>> From<Option<V>> for CubeValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(CubeValue::Empty, Into::into)
    }
}

// ============================================================================
// ORDERED FLOAT
// ============================================================================

/// `f64` with total equality, usable as a hash key. All NaNs compare equal,
/// and so do `0.0` and `-0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    /// Bit pattern shared by every value that compares equal.
    fn identity_bits(self) -> u64 {
        match self.0 {
            n if n.is_nan() => u64::MAX,
            n if n == 0.0 => 0,
            n => n.to_bits(),
        }
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.identity_bits() == other.identity_bits()
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity_bits().hash(state);
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_keys() {
        assert_eq!(CubeValue::Empty.canonical_key(), NULL_KEY);
        assert_eq!(CubeValue::number(5.0).canonical_key(), "5");
        assert_eq!(CubeValue::number(2.5).canonical_key(), "2.5");
        assert_eq!(CubeValue::number(-3.0).canonical_key(), "-3");
        assert_eq!(CubeValue::number(-0.0).canonical_key(), "0");
        assert_eq!(CubeValue::number(0.0).canonical_key(), "0");
        assert_eq!(CubeValue::text("dev").canonical_key(), "dev");
        assert_eq!(CubeValue::Boolean(true).canonical_key(), "true");
    }

    #[test]
    fn test_number_and_text_can_share_a_key() {
        // Equality for grouping is through the key, not the variant.
        assert_eq!(
            CubeValue::number(42.0).canonical_key(),
            CubeValue::text("42").canonical_key()
        );
    }

    #[test]
    fn test_option_conversion() {
        let missing: Option<&str> = None;
        assert_eq!(CubeValue::from(missing), CubeValue::Empty);
        assert_eq!(CubeValue::from(Some("qa")), CubeValue::text("qa"));
    }

    #[test]
    fn test_nan_equality() {
        assert_eq!(OrderedFloat(f64::NAN), OrderedFloat(f64::NAN));
        assert_eq!(CubeValue::number(f64::NAN).canonical_key(), "NaN");
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |f: OrderedFloat| {
            let mut h = DefaultHasher::new();
            f.hash(&mut h);
            h.finish()
        };
        assert_eq!(OrderedFloat(0.0), OrderedFloat(-0.0));
        assert_eq!(hash(OrderedFloat(0.0)), hash(OrderedFloat(-0.0)));
        assert_ne!(OrderedFloat(1.0), OrderedFloat(-1.0));
    }
}
