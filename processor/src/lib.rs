//! ketju-processor - Record processors for ketju
//!
//! Processors transform records on their way to a sink:
//!
//! ```text
//! Logger call ──► Processor Chain ──► Sink
//!                    │
//!                    ├─► Enrich (exception chains, context)
//!                    └─► Rewrite (messages, extra data)
//! ```
//!
//! The flagship processor is [`ExceptionChainProcessor`], which expands an
//! error attached to a record into its full causal chain and folds the
//! error's own context into the record.

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod exception_chain;
pub mod processor;

pub use exception_chain::{enrich, merge_context, ExceptionChainProcessor};
pub use processor::{Callback, PassThrough, Processor, ProcessorChain};
