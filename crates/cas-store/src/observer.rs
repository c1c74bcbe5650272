//! Optional observability hooks (low-cardinality counters and spans).
//!
//! By default these are no-ops. An integration crate may register a
//! global observer once, at startup, to mirror these events into
//! OpenTelemetry or another backend.

use std::any::Any;
use std::sync::OnceLock;

/// Hooks the store calls on every write, read, and delete. All methods
/// have no-op default bodies so implementors only override what they
/// care about.
pub trait StoreObserver: Send + Sync {
    /// Bytes accepted by a [`crate::Store::write`] call, counted after the
    /// stream has been fully consumed.
    fn write_bytes(&self, _n: u64) {}
    /// A write resolved to content already present (no new bytes placed
    /// on disk).
    fn dedup_hit(&self) {}
    /// Bytes returned by a read ([`crate::Store::try_open`] caller
    /// reading to completion is outside the store's visibility, so this
    /// fires on [`crate::Store::try_length`] and successful `try_open`
    /// calls using the reported object size).
    fn read_bytes(&self, _n: u64) {}
    /// Number of base-or-sibling files actually removed by a delete call.
    fn delete_count(&self, _n: u64) {}
    /// Start an optional span; dropping the returned guard ends it.
    fn span(&self, _name: &'static str) -> ObserverSpan {
        ObserverSpan::noop()
    }
}

/// Guard object for an optional span. Holds a type-erased guard that
/// exits on drop.
pub struct ObserverSpan {
    _guard: Option<Box<dyn Any>>,
}

impl ObserverSpan {
    /// A span guard that does nothing.
    pub fn noop() -> Self {
        Self { _guard: None }
    }

    /// Wrap an arbitrary guard (e.g. a `tracing::span::Entered`); dropping
    /// this drops the guard and so ends the underlying span.
    pub fn from_guard<G: 'static>(guard: G) -> Self {
        Self { _guard: Some(Box::new(guard)) }
    }
}

struct NoopObserver;
impl StoreObserver for NoopObserver {}

static NOOP: NoopObserver = NoopObserver;
static OBSERVER: OnceLock<&'static dyn StoreObserver> = OnceLock::new();

/// Register a global observer. Safe to call at most once; later calls are
/// ignored so the first integration to initialize wins.
pub fn set_observer(observer: &'static dyn StoreObserver) {
    let _ = OBSERVER.set(observer);
}

pub(crate) fn observer() -> &'static dyn StoreObserver {
    OBSERVER.get().copied().unwrap_or(&NOOP)
}
