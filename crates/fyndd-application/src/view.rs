//! Stale-response guard for views that load asynchronously.
//!
//! Each load takes a [`ViewTicket`]; navigating away or starting a newer load
//! bumps the generation, and results carrying an old ticket are dropped.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTicket(u64);

#[derive(Debug, Default)]
pub struct ViewTracker {
    generation: AtomicU64,
}

impl ViewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load, superseding any load still in flight.
    pub fn begin(&self) -> ViewTicket {
        ViewTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: ViewTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Marks every outstanding ticket stale (the view was left).
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Result of a load that may have been superseded.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// The result belongs to the current view and was applied.
    Applied(T),
    /// The view moved on before the response arrived; the result was dropped.
    Stale,
}

impl<T> Loaded<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Loaded::Applied(value) => Some(value),
            Loaded::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Loaded::Stale)
    }
}
