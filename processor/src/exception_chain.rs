//! ExceptionChainProcessor - expand an attached error into its causal chain
//!
//! If a record carries an error under the reserved `exception` context key,
//! this processor attaches the full causal chain to the record's `extra`
//! data under `exception_chain_with_context`: one entry per error in the
//! chain, outermost first, each with that error's own context or `null` if
//! it carries none. The outermost error's context is additionally folded
//! into the record's context, without overwriting anything the caller put
//! there.
//!
//! Records without a usable attachment pass through untouched.

use crate::processor::Processor;
use async_trait::async_trait;
use ketju_core::{exception_chain, record_keys, ChainedError, ContextValue, Record};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Expands an attached error into its full causal chain
///
/// Stateless - a single instance can serve any number of concurrent
/// records.
///
/// # Example
///
/// ```ignore
/// let mut chain = ProcessorChain::new();
/// chain.add(ExceptionChainProcessor);
/// ```
pub struct ExceptionChainProcessor;

#[async_trait]
impl Processor for ExceptionChainProcessor {
    fn name(&self) -> &'static str {
        "exception-chain"
    }

    async fn process(&self, record: Record) -> Record {
        enrich(record)
    }
}

/// Enrich a record with the causal chain of its attached error
///
/// If the record has no context, no `exception` context key, or the value
/// under that key is not an error, the record is returned unchanged - no
/// side effects, nothing raised.
pub fn enrich(mut record: Record) -> Record {
    let Some(exception) = record.exception().map(Arc::clone) else {
        return record;
    };

    let chain = exception_chain(exception.as_ref());
    tracing::debug!(
        exception = exception.type_name(),
        links = chain.len(),
        "exception chain attached"
    );

    record.extra_mut().insert(
        record_keys::EXCEPTION_CHAIN.to_string(),
        Value::Array(chain.iter().map(|link| link.to_value()).collect()),
    );

    let merged = merge_context(record.context(), exception.as_ref());
    record.context = Some(Box::new(merged));

    record
}

/// Merge an error's own context under a record context
///
/// If the error carries no context, the record context comes back as-is.
/// Otherwise the result starts from the error's context and overlays every
/// record entry on top - a key already present in the record context always
/// wins, so callers can keep passing custom data.
///
/// Only the error attached directly to the record participates here;
/// context carried by deeper causes stays visible in the extracted chain
/// but never touches the record context.
pub fn merge_context(
    record_context: &HashMap<String, ContextValue>,
    error: &dyn ChainedError,
) -> HashMap<String, ContextValue> {
    let Some(error_context) = error.context() else {
        return record_context.clone();
    };

    let mut merged: HashMap<String, ContextValue> = error_context
        .iter()
        .map(|(key, value)| (key.clone(), ContextValue::Data(value.clone())))
        .collect();

    for (key, value) in record_context {
        merged.insert(key.clone(), value.clone());
    }

    merged
}
