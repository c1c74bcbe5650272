//! A minimal cancellation primitive for the writer's streaming loop.
//!
//! The full `tokio-util` crate ships a `CancellationToken` with child-token
//! trees and a `cancelled()` future; this store only ever needs "has
//! cancellation been requested", checked once per loop iteration, so a bare
//! `Arc<AtomicBool>` is the right-sized tool rather than pulling in the
//! extra dependency for one flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperatively-checked cancellation flag, cheap to clone and share.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self { flag: Arc::new(AtomicBool::new(false)) }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
