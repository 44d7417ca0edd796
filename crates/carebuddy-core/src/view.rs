use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a read-only view: the explicit `loading` / `data` /
/// `last_error` lifecycle every view model exposes.
///
/// `last_error` is diagnostic only. Presentation renders a missing `data`
/// the same way whether the load is pending or failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState<T> {
    pub loading: bool,
    pub data: Option<T>,
    pub last_error: Option<String>,
}

impl<T> ViewState<T> {
    /// State of a view that has been activated but has not loaded yet.
    pub fn pending() -> Self {
        Self {
            loading: true,
            data: None,
            last_error: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.loading && self.data.is_some()
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::pending()
    }
}

/// Ticket handed out by [`RequestGeneration::issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic request counter used to drop responses from superseded requests.
///
/// Each load issues a ticket before it suspends; when the response arrives
/// it is applied only if no newer ticket has been issued in the meantime.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidate every outstanding ticket.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
