//! Remote result conversion.
//!
//! Value-returning remote calls come back as JSON. The conversion set
//! is closed: exactly the types implementing [`RemoteValue`] can be
//! requested, and each defines its own strict conversion rule plus the
//! fallback ("zero") value used when a contained call fails.
//!
//! # Conversion Table
//!
//! | Rust type | Accepts | Zero |
//! |-----------|---------|------|
//! | `String` | JSON string | `""` |
//! | `f64` | JSON number | `0.0` |
//! | `i64` | integral JSON number | `0` |
//! | `bool` | JSON boolean | `false` |
//!
//! Anything outside the table is an [`Error::TypeConversion`]. There
//! is no cross-type coercion: a number does not convert to `String`,
//! and a fractional number does not convert to `i64`.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Sealed
// ============================================================================

mod sealed {
    /// Closes the [`RemoteValue`](super::RemoteValue) conversion set.
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for f64 {}
    impl Sealed for i64 {}
    impl Sealed for bool {}
}

// ============================================================================
// RemoteValue
// ============================================================================

/// A type a remote result can be converted into.
///
/// Sealed: the implementations in this module are the entire
/// conversion set.
///
/// # Examples
///
/// ```
/// use browser_bridge::session::RemoteValue;
///
/// let score = f64::from_remote(serde_json::json!(42)).unwrap();
/// assert_eq!(score, 42.0);
///
/// assert!(String::from_remote(serde_json::json!(42)).is_err());
/// assert_eq!(String::zero(), "");
/// ```
pub trait RemoteValue: sealed::Sealed + Sized {
    /// Type name used in conversion diagnostics.
    const TYPE_NAME: &'static str;

    /// The fallback value contained execution returns on failure.
    #[must_use]
    fn zero() -> Self;

    /// Converts a remote JSON result into this type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] when the JSON value is
    /// outside this type's conversion rule.
    fn from_remote(value: Value) -> Result<Self>;
}

impl RemoteValue for String {
    const TYPE_NAME: &'static str = "String";

    #[inline]
    fn zero() -> Self {
        String::new()
    }

    fn from_remote(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::type_conversion(Self::TYPE_NAME, describe(&other))),
        }
    }
}

impl RemoteValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    #[inline]
    fn zero() -> Self {
        0.0
    }

    fn from_remote(value: Value) -> Result<Self> {
        match value.as_f64() {
            Some(n) => Ok(n),
            None => Err(Error::type_conversion(Self::TYPE_NAME, describe(&value))),
        }
    }
}

impl RemoteValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    #[inline]
    fn zero() -> Self {
        0
    }

    fn from_remote(value: Value) -> Result<Self> {
        match value.as_i64() {
            Some(n) => Ok(n),
            None => Err(Error::type_conversion(Self::TYPE_NAME, describe(&value))),
        }
    }
}

impl RemoteValue for bool {
    const TYPE_NAME: &'static str = "bool";

    #[inline]
    fn zero() -> Self {
        false
    }

    fn from_remote(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_conversion(Self::TYPE_NAME, describe(&other))),
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Renders a JSON value kind for conversion error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_string_from_string() {
        let s = String::from_remote(json!("hello")).expect("convert");
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_string_rejects_number() {
        let err = String::from_remote(json!(42)).expect_err("should fail");
        assert!(matches!(
            err,
            Error::TypeConversion {
                expected: "String",
                ..
            }
        ));
    }

    #[test]
    fn test_f64_from_number() {
        assert_eq!(f64::from_remote(json!(42)).expect("convert"), 42.0);
        assert_eq!(f64::from_remote(json!(2.5)).expect("convert"), 2.5);
    }

    #[test]
    fn test_f64_rejects_string() {
        let err = f64::from_remote(json!("42")).expect_err("should fail");
        assert!(err.to_string().contains("string \"42\""));
    }

    #[test]
    fn test_i64_from_integral_number() {
        assert_eq!(i64::from_remote(json!(7)).expect("convert"), 7);
        assert_eq!(i64::from_remote(json!(-3)).expect("convert"), -3);
    }

    #[test]
    fn test_i64_rejects_fractional() {
        let err = i64::from_remote(json!(7.5)).expect_err("should fail");
        assert!(matches!(
            err,
            Error::TypeConversion { expected: "i64", .. }
        ));
    }

    #[test]
    fn test_bool_from_bool() {
        assert!(bool::from_remote(json!(true)).expect("convert"));
        assert!(!bool::from_remote(json!(false)).expect("convert"));
    }

    #[test]
    fn test_bool_rejects_null() {
        let err = bool::from_remote(json!(null)).expect_err("should fail");
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(String::zero(), "");
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(i64::zero(), 0);
        assert!(!bool::zero());
    }

    #[test]
    fn test_describe_kinds() {
        assert_eq!(describe(&json!(null)), "null");
        assert_eq!(describe(&json!(true)), "bool true");
        assert_eq!(describe(&json!(1.5)), "number 1.5");
        assert_eq!(describe(&json!("x")), "string \"x\"");
        assert_eq!(describe(&json!([1])), "array");
        assert_eq!(describe(&json!({"a": 1})), "object");
    }
}
