//! Reserved record key constants for ketju records
//!
//! These keys are used by convention to carry error data through the
//! generic record shape. Callers attach an error under the `exception`
//! context key; the enrichment processor writes the extracted chain under
//! the `exception_chain_with_context` extra key.

/// Context key carrying the error attached to a record
pub const EXCEPTION: &str = "exception";

/// Extra key receiving the extracted causal chain
pub const EXCEPTION_CHAIN: &str = "exception_chain_with_context";
