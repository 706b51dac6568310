//! Lifetime of the view that started an operation.
//!
//! In-flight requests cannot be aborted. When the view that issued them goes
//! away, the scope is closed and flows stop reporting late results. Batch
//! results are dropped entirely. Optimistic single changes are still settled
//! in the ledger, since it was already changed before the request went out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable liveness flag shared between a view and the flows it started
#[derive(Clone, Debug)]
pub struct ViewScope {
    open: Arc<AtomicBool>,
}

impl ViewScope {
    /// A new, open scope
    #[must_use]
    pub fn new() -> Self {
        Self { open: Arc::new(AtomicBool::new(true)) }
    }

    /// Mark the view as torn down
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Whether results should still be applied
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}
