//! The structured log record envelope
//!
//! A [`Record`] is what flows through a processor chain on its way to a
//! sink: a leveled message plus two key-value areas. `context` is
//! caller-supplied and may carry a live error under the reserved
//! `exception` key; `extra` belongs to processors.
//!
//! # Lazy Allocation
//!
//! Both maps are `None` until the first insert, so records without
//! structured data stay small and cheap to clone. Accessors hide the
//! distinction: `context()` returns a shared empty map when absent,
//! `context_mut()` allocates on demand.
//!
//! # Transformation Semantics
//!
//! Processors take a `Record` by value and return a new one. Nothing is
//! shared mutably, so a processor can run against any number of records
//! concurrently without coordination.

use crate::context::ContextValue;
use crate::exception::ChainedError;
use crate::record_keys;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Type alias for context storage - lazy allocation
pub type Context = Option<Box<HashMap<String, ContextValue>>>;

/// Type alias for extra storage - lazy allocation
pub type Extra = Option<Box<HashMap<String, serde_json::Value>>>;

/// Helper to get context or empty map
#[inline]
fn context_ref(c: &Context) -> &HashMap<String, ContextValue> {
    static EMPTY: std::sync::OnceLock<HashMap<String, ContextValue>> = std::sync::OnceLock::new();
    c.as_ref()
        .map(|b| b.as_ref())
        .unwrap_or_else(|| EMPTY.get_or_init(HashMap::new))
}

/// Helper to get extra or empty map
#[inline]
fn extra_ref(e: &Extra) -> &HashMap<String, serde_json::Value> {
    static EMPTY: std::sync::OnceLock<HashMap<String, serde_json::Value>> =
        std::sync::OnceLock::new();
    e.as_ref()
        .map(|b| b.as_ref())
        .unwrap_or_else(|| EMPTY.get_or_init(HashMap::new))
}

/// Record severity levels
///
/// The classic eight-level syslog scale. Ordering follows severity, so
/// `Level::Error > Level::Warning` holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Detailed debug information
    Debug,
    /// Interesting events
    Info,
    /// Normal but significant events
    Notice,
    /// Exceptional occurrences that are not errors
    Warning,
    /// Runtime errors that do not require immediate action
    Error,
    /// Critical conditions
    Critical,
    /// Action must be taken immediately
    Alert,
    /// System is unusable
    Emergency,
}

impl Level {
    /// Numeric severity value (higher is more severe)
    pub fn as_value(&self) -> u16 {
        match self {
            Self::Debug => 100,
            Self::Info => 200,
            Self::Notice => 250,
            Self::Warning => 300,
            Self::Error => 400,
            Self::Critical => 500,
            Self::Alert => 550,
            Self::Emergency => 600,
        }
    }

    /// Lowercase level name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Alert => "alert",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "notice" => Ok(Self::Notice),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            "alert" => Ok(Self::Alert),
            "emergency" => Ok(Self::Emergency),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// The structured log record
///
/// # Example
///
/// ```
/// use ketju_core::{Level, Record};
///
/// let record = Record::new("payments", Level::Error, "charge failed")
///     .with_context("order_id", 4711);
/// assert_eq!(record.channel, "payments");
/// assert!(record.context().contains_key("order_id"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Originating logger name
    pub channel: String,

    /// Severity level
    pub level: Level,

    /// Human-readable message
    pub message: String,

    /// When the record was created
    pub datetime: DateTime<Utc>,

    /// Caller-supplied structured data
    ///
    /// May carry a live error under the reserved `exception` key.
    /// Lazily allocated - None when empty.
    pub context: Context,

    /// Processor-supplied structured data
    ///
    /// Lazily allocated - None when empty.
    pub extra: Extra,
}

impl Record {
    /// Create a new Record stamped with the current time
    ///
    /// # Arguments
    /// * `channel` - Originating logger name
    /// * `level` - Severity level
    /// * `message` - Human-readable message
    pub fn new(channel: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            level,
            message: message.into(),
            datetime: Utc::now(),
            context: None,
            extra: None,
        }
    }

    /// Add a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.context_mut().insert(key.into(), value.into());
        self
    }

    /// Attach an error under the reserved `exception` context key
    pub fn with_exception(self, error: impl ChainedError + 'static) -> Self {
        self.with_exception_arc(Arc::new(error))
    }

    /// Attach an already-shared error under the reserved `exception` context key
    pub fn with_exception_arc(self, error: Arc<dyn ChainedError>) -> Self {
        self.with_context(record_keys::EXCEPTION, ContextValue::Exception(error))
    }

    /// Add an extra entry
    pub fn with_extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extra_mut().insert(key.into(), value.into());
        self
    }

    /// Get context reference (returns empty map if None)
    #[inline]
    pub fn context(&self) -> &HashMap<String, ContextValue> {
        context_ref(&self.context)
    }

    /// Get mutable context, allocating if needed
    #[inline]
    pub fn context_mut(&mut self) -> &mut HashMap<String, ContextValue> {
        self.context.get_or_insert_with(|| Box::new(HashMap::new()))
    }

    /// Get extra reference (returns empty map if None)
    #[inline]
    pub fn extra(&self) -> &HashMap<String, serde_json::Value> {
        extra_ref(&self.extra)
    }

    /// Get mutable extra, allocating if needed
    #[inline]
    pub fn extra_mut(&mut self) -> &mut HashMap<String, serde_json::Value> {
        self.extra.get_or_insert_with(|| Box::new(HashMap::new()))
    }

    /// The error attached under the reserved `exception` context key, if any
    ///
    /// Returns `None` when context is absent, the key is missing, or the
    /// value under the key is plain data rather than an error.
    pub fn exception(&self) -> Option<&Arc<dyn ChainedError>> {
        self.context()
            .get(record_keys::EXCEPTION)
            .and_then(ContextValue::as_exception)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::Value;
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
    fn test_record_creation() {
        let record = Record::new("app", Level::Info, "hello");

        assert_eq!(record.channel, "app");
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.message, "hello");
        assert!(record.context.is_none());
        assert!(record.extra.is_none());
    }

    #[test]
    fn test_lazy_allocation() {
        let record = Record::new("app", Level::Info, "hello");

        // Reading through the accessor must not allocate
        assert!(record.context().is_empty());
        assert!(record.extra().is_empty());
        assert!(record.context.is_none());
        assert!(record.extra.is_none());

        let record = record.with_context("foo", "bar");
        assert!(record.context.is_some());
    }

    #[test]
    fn test_builders() {
        let record = Record::new("app", Level::Warning, "careful")
            .with_context("tenant", "acme")
            .with_extra("hostname", "web-1");

        assert_eq!(
            record.context().get("tenant"),
            Some(&ContextValue::from("acme"))
        );
        assert_eq!(
            record.extra().get("hostname"),
            Some(&Value::String("web-1".to_string()))
        );
    }

    #[test]
    fn test_exception_accessor() {
        let record = Record::new("app", Level::Error, "failed").with_exception(TestError);

        let attached = record.exception().expect("exception should be attached");
        assert_eq!(attached.type_name(), "TestError");
    }

    #[test]
    fn test_exception_accessor_ignores_plain_data() {
        let record = Record::new("app", Level::Error, "failed")
            .with_context(record_keys::EXCEPTION, "not an error object");

        assert!(record.exception().is_none());
    }

    #[test]
    fn test_clone_preserves_exception_identity() {
        let record = Record::new("app", Level::Error, "failed").with_exception(TestError);
        let cloned = record.clone();

        // Cloning shares the attachment instead of duplicating it
        assert_eq!(record, cloned);
        let original = record.exception().unwrap();
        let shared = cloned.exception().unwrap();
        assert!(std::ptr::eq(
            Arc::as_ptr(original) as *const (),
            Arc::as_ptr(shared) as *const (),
        ));
    }

    #[test]
    fn test_level_values() {
        assert_eq!(Level::Debug.as_value(), 100);
        assert_eq!(Level::Info.as_value(), 200);
        assert_eq!(Level::Notice.as_value(), 250);
        assert_eq!(Level::Warning.as_value(), 300);
        assert_eq!(Level::Error.as_value(), 400);
        assert_eq!(Level::Critical.as_value(), 500);
        assert_eq!(Level::Alert.as_value(), 550);
        assert_eq!(Level::Emergency.as_value(), 600);
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error > Level::Warning);
        assert!(Level::Emergency > Level::Debug);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warning);

        let err = "loud".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), "unknown log level: loud");
    }

    #[test]
    fn test_level_display_roundtrip() {
        for level in [
            Level::Debug,
            Level::Info,
            Level::Notice,
            Level::Warning,
            Level::Error,
            Level::Critical,
            Level::Alert,
            Level::Emergency,
        ] {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
    }

    #[test]
    fn test_level_serde_lowercase() {
        let json = serde_json::to_string(&Level::Critical).unwrap();
        assert_eq!(json, r#""critical""#);

        let parsed: Level = serde_json::from_str(r#""notice""#).unwrap();
        assert_eq!(parsed, Level::Notice);
    }
}
