//! The error capability the enrichment core depends on
//!
//! Logging pipelines attach live error objects to records. The pipeline
//! doesn't care what concrete type an error is - it only needs a stable
//! type identifier, the causal predecessor, and (for errors that carry one)
//! a block of structured diagnostic context. [`ChainedError`] is that
//! capability, and [`exception_chain`] turns any implementor into a flat,
//! serializable description of its whole causal chain.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;

/// Structured diagnostic data carried by an error
pub type ErrorContext = serde_json::Map<String, Value>;

/// Upper bound on causal-chain traversal.
///
/// A cause set once at construction cannot form a cycle, but the trait
/// makes no structural guarantee - a foreign impl may hand back an error
/// already seen. Traversal stops here instead of looping.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// The minimal capability an error attached to a record must offer
///
/// Implementors are ordinary Rust errors ([`std::error::Error`] is a
/// supertrait) that additionally expose an explicit cause accessor and a
/// stable type identifier. `cause()` exists alongside the std `source()`
/// because a chain walked through `source()` loses this capability after
/// the first hop.
///
/// # Example
///
/// ```
/// use ketju_core::ChainedError;
///
/// #[derive(Debug)]
/// struct TimeoutError;
///
/// impl std::fmt::Display for TimeoutError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "upstream timed out")
///     }
/// }
///
/// impl std::error::Error for TimeoutError {}
///
/// impl ChainedError for TimeoutError {
///     fn type_name(&self) -> &str {
///         "TimeoutError"
///     }
///
///     fn cause(&self) -> Option<&dyn ChainedError> {
///         None
///     }
/// }
/// ```
pub trait ChainedError: StdError + Send + Sync {
    /// Stable type identifier, used as the link name in extracted chains
    ///
    /// Chosen by the implementor rather than derived from reflection
    /// metadata, so chain output stays stable across refactors.
    fn type_name(&self) -> &str;

    /// The error this one wraps, if any
    fn cause(&self) -> Option<&dyn ChainedError>;

    /// Structured diagnostic context carried by this error
    ///
    /// Plain errors keep the default `None`. A link in an extracted chain
    /// has context exactly when this returns `Some`.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }
}

/// One link in an extracted causal chain
///
/// Serializes to `{"exception": "...", "context": {...}}` with an explicit
/// `null` context for errors that carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    /// Type identity of the error at this link
    pub exception: String,

    /// The link's own diagnostic context, `None` for plain errors
    pub context: Option<ErrorContext>,
}

impl ChainLink {
    /// JSON object form of this link
    ///
    /// Built directly rather than through `serde_json::to_value` so the
    /// conversion is infallible.
    pub fn to_value(&self) -> Value {
        let mut obj = serde_json::Map::with_capacity(2);
        obj.insert(
            "exception".to_string(),
            Value::String(self.exception.clone()),
        );
        obj.insert(
            "context".to_string(),
            self.context.clone().map(Value::Object).unwrap_or(Value::Null),
        );
        Value::Object(obj)
    }
}

/// Extract the full causal chain of `error`, outermost first
///
/// Emits one [`ChainLink`] per error, starting with `error` itself and
/// following `cause()` down to the root cause. The result is never empty:
/// an error without a cause yields a single link. Order mirrors unwrapping,
/// so link `i` is the error reached after peeling `i` causes.
///
/// Traversal is capped at [`MAX_CHAIN_DEPTH`] links; a chain that long is
/// almost certainly a cycle in a foreign impl and gets truncated with a
/// warning.
pub fn exception_chain(error: &dyn ChainedError) -> Vec<ChainLink> {
    let mut chain = Vec::new();
    let mut current = Some(error);

    while let Some(err) = current {
        if chain.len() == MAX_CHAIN_DEPTH {
            tracing::warn!(depth = MAX_CHAIN_DEPTH, "exception chain truncated");
            break;
        }

        chain.push(ChainLink {
            exception: err.type_name().to_string(),
            context: err.context().cloned(),
        });

        current = ChainedError::cause(err);
    }

    chain
}
