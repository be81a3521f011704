//! Context values - plain data or an attached error
//!
//! Record context is caller-supplied and heterogeneous: most entries are
//! plain structured data, but by convention the reserved `exception` key
//! carries a live error object. An explicit sum type keeps the two apart
//! without any runtime type inspection.

use crate::exception::ChainedError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A single record context entry
#[derive(Clone)]
pub enum ContextValue {
    /// Plain structured data
    Data(Value),

    /// An attached error object
    ///
    /// Shared rather than owned so cloning a record never clones the error.
    Exception(Arc<dyn ChainedError>),
}

impl ContextValue {
    /// The data value, if this entry is plain data
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Exception(_) => None,
        }
    }

    /// The attached error, if this entry is one
    pub fn as_exception(&self) -> Option<&Arc<dyn ChainedError>> {
        match self {
            Self::Exception(error) => Some(error),
            Self::Data(_) => None,
        }
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::Exception(error) => f.debug_tuple("Exception").field(&error.type_name()).finish(),
        }
    }
}

/// Data entries compare by value. Exception entries compare by identity:
/// two clones of the same attachment are equal, two separately constructed
/// errors are not, even if they look alike.
impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::Exception(a), Self::Exception(b)) => {
                // Compare data pointers only - vtable addresses are not stable.
                std::ptr::eq(
                    Arc::as_ptr(a) as *const (),
                    Arc::as_ptr(b) as *const (),
                )
            }
            _ => false,
        }
    }
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Data(Value::String(value.to_string()))
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Data(Value::String(value))
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Data(Value::Bool(value))
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        Self::Data(Value::from(value))
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Data(Value::from(value))
    }
}

impl From<u64> for ContextValue {
    fn from(value: u64) -> Self {
        Self::Data(Value::from(value))
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Data(Value::from(value))
    }
}

impl From<Arc<dyn ChainedError>> for ContextValue {
    fn from(error: Arc<dyn ChainedError>) -> Self {
        Self::Exception(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct TestError;

    impl ChainedError for TestError {
        fn type_name(&self) -> &str {
            "TestError"
        }

        fn cause(&self) -> Option<&dyn ChainedError> {
            None
        }
    }

    #[test]
    fn test_data_accessors() {
        let value = ContextValue::from("bar");

        assert_eq!(value.as_data(), Some(&Value::String("bar".to_string())));
        assert!(value.as_exception().is_none());
    }

    #[test]
    fn test_exception_accessors() {
        let error: Arc<dyn ChainedError> = Arc::new(TestError);
        let value = ContextValue::from(error);

        assert!(value.as_data().is_none());
        let attached = value.as_exception().expect("should hold the error");
        assert_eq!(attached.type_name(), "TestError");
    }

    #[test]
    fn test_data_equality_by_value() {
        assert_eq!(ContextValue::from(42), ContextValue::from(42));
        assert_ne!(ContextValue::from(42), ContextValue::from(43));
    }

    #[test]
    fn test_exception_equality_by_identity() {
        let error: Arc<dyn ChainedError> = Arc::new(TestError);

        let a = ContextValue::Exception(Arc::clone(&error));
        let b = ContextValue::Exception(Arc::clone(&error));
        assert_eq!(a, b);

        let other = ContextValue::Exception(Arc::new(TestError));
        assert_ne!(a, other);
    }

    #[test]
    fn test_data_never_equals_exception() {
        let error: Arc<dyn ChainedError> = Arc::new(TestError);
        assert_ne!(
            ContextValue::from("TestError"),
            ContextValue::Exception(error)
        );
    }

    #[test]
    fn test_debug_shows_type_name_not_internals() {
        let error: Arc<dyn ChainedError> = Arc::new(TestError);
        let debug = format!("{:?}", ContextValue::Exception(error));
        assert_eq!(debug, r#"Exception("TestError")"#);
    }
}
