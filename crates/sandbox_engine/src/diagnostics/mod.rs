//! Diagnostics sink - injected observability for pool and registry internals
//!
//! The core emits structured diagnostic events through an injected sink
//! instead of logging ad hoc, so hosts choose the destination and tests can
//! assert on emitted events rather than console text. [`LogSink`] is the
//! default and routes everything to the `log` crate.

use std::cell::RefCell;
use std::rc::Rc;

use crate::renderable::ResourceKey;
use crate::world::InstanceId;

/// Structured diagnostic event emitted by the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A pooled renderable was reused for this key
    PoolHit {
        /// Pool partition key
        key: ResourceKey,
    },
    /// No pooled renderable was available; one was constructed
    PoolMiss {
        /// Pool partition key
        key: ResourceKey,
    },
    /// Pre-warm was requested for a key whose resource is not resolved
    PrewarmSkipped {
        /// Pool partition key
        key: ResourceKey,
        /// Number of renderables that were requested
        requested: usize,
    },
    /// An operation referenced an instance id absent from the registry
    NotFound {
        /// The id that was looked up
        id: InstanceId,
        /// The operation that failed
        operation: &'static str,
    },
    /// A saved placement could not be restored because its resource is gone
    ImportSkipped {
        /// Pool partition key
        key: ResourceKey,
    },
    /// A programming error was detected and the operation aborted
    InvariantViolation {
        /// Human-readable description of the violated invariant
        detail: String,
    },
}

/// Destination for diagnostic events
pub trait DiagnosticsSink {
    /// Record a single diagnostic event
    fn record(&self, event: &DiagnosticEvent);
}

/// Shared sink handle
///
/// The core runs on the host's single frame/input thread, so a plain `Rc`
/// is the sharing primitive.
pub type SharedSink = Rc<dyn DiagnosticsSink>;

/// Sink routing events to the `log` crate by severity
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn record(&self, event: &DiagnosticEvent) {
        match event {
            DiagnosticEvent::PoolHit { key } => {
                log::trace!("pool hit for '{}'", key);
            }
            DiagnosticEvent::PoolMiss { key } => {
                log::debug!("pool miss for '{}', constructing renderable", key);
            }
            DiagnosticEvent::PrewarmSkipped { key, requested } => {
                log::warn!("skipped pre-warm of {} renderable(s): resource '{}' not resolved", requested, key);
            }
            DiagnosticEvent::NotFound { id, operation } => {
                log::warn!("{} failed: no placement with id {}", operation, id);
            }
            DiagnosticEvent::ImportSkipped { key } => {
                log::warn!("skipped saved placement: resource '{}' no longer resolves", key);
            }
            DiagnosticEvent::InvariantViolation { detail } => {
                log::error!("invariant violation: {}", detail);
            }
        }
    }
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _event: &DiagnosticEvent) {}
}

/// Sink that retains events in memory for later inspection
///
/// Intended for tests asserting on the diagnostic stream.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: RefCell<Vec<DiagnosticEvent>>,
}

impl CollectingSink {
    /// Create an empty collecting sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.borrow().clone()
    }

    /// Drain and return all recorded events
    pub fn take(&self) -> Vec<DiagnosticEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    /// Count recorded events matching a predicate
    pub fn count_matching(&self, predicate: impl Fn(&DiagnosticEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }
}

impl DiagnosticsSink for CollectingSink {
    fn record(&self, event: &DiagnosticEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
