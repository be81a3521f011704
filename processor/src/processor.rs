//! Processor system for ketju
//!
//! Processors transform records before they reach a sink. Each processor
//! receives a record by value and returns the (possibly modified) record;
//! whether a record gets persisted at all is a sink concern, so processors
//! never drop.
//!
//! # Example
//!
//! ```ignore
//! struct HostnameProcessor;
//!
//! #[async_trait]
//! impl Processor for HostnameProcessor {
//!     fn name(&self) -> &'static str { "hostname" }
//!
//!     async fn process(&self, record: Record) -> Record {
//!         record.with_extra("hostname", "web-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use ketju_core::Record;

/// Processor trait for record transformation
///
/// Applied to every record before it reaches a sink. Chain multiple
/// processors for layered enrichment.
///
/// Processors hold no per-record state, so one instance can serve any
/// number of records concurrently.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Processor name for identification and logging
    fn name(&self) -> &'static str;

    /// Transform a record
    async fn process(&self, record: Record) -> Record;
}

/// A processor chain that runs records through multiple processors in order
pub struct ProcessorChain {
    processors: Vec<Box<dyn Processor>>,
}

impl ProcessorChain {
    /// Create an empty processor chain
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Add a processor to the chain
    pub fn add<P: Processor + 'static>(&mut self, processor: P) {
        self.processors.push(Box::new(processor));
    }

    /// Run a record through all processors in order
    pub async fn process(&self, mut record: Record) -> Record {
        for processor in &self.processors {
            record = processor.process(record).await;
        }
        record
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Get number of processors in the chain
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Get names of all processors in chain order
    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}

impl Default for ProcessorChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Pass-through processor that does nothing (useful for testing)
pub struct PassThrough;

#[async_trait]
impl Processor for PassThrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn process(&self, record: Record) -> Record {
        record
    }
}

/// Callback processor wrapping a plain function
///
/// # Example
///
/// ```ignore
/// let callback = Callback::new(|record: Record| record.with_extra("app", "api"));
/// ```
pub struct Callback<F>
where
    F: Fn(Record) -> Record + Send + Sync,
{
    callback: F,
}

impl<F> Callback<F>
where
    F: Fn(Record) -> Record + Send + Sync,
{
    /// Create a callback processor from the given function
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> Processor for Callback<F>
where
    F: Fn(Record) -> Record + Send + Sync,
{
    fn name(&self) -> &'static str {
        "callback"
    }

    async fn process(&self, record: Record) -> Record {
        (self.callback)(record)
    }
}
