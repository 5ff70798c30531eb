//! Monotonic request tickets for latest-issued-wins response handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out increasing tickets; only the most recent ticket is current.
///
/// Clones share the same counter.
#[derive(Clone, Debug, Default)]
pub struct RequestSeq(Arc<AtomicU64>);

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier ones.
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently issued ticket (0 before the first request).
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Whether no request was issued after `ticket`.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.current() == ticket
    }

    /// Supersede every outstanding ticket without starting a request.
    pub fn invalidate(&self) {
        self.issue();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_is_current() {
        let seq = RequestSeq::new();
        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_invalidate_and_shared_clones() {
        let seq = RequestSeq::new();
        let shared = seq.clone();
        let ticket = seq.issue();
        shared.invalidate();
        assert!(!seq.is_current(ticket));
    }
}
