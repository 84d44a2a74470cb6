use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Loading indicator and last-error slot shared by every operation of a store.
///
/// `loading` stays true while any request is outstanding. The error slot is
/// cleared when an operation starts and overwritten when one fails, so the
/// most recent failure wins.
#[derive(Debug, Default)]
pub struct StoreStatus {
    in_flight: AtomicUsize,
    error: RwLock<Option<String>>,
}

impl StoreStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an operation as started. Loading ends when the guard drops.
    pub fn begin(&self) -> InFlight<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.set_error(None);
        InFlight { status: self }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn error(&self) -> Option<String> {
        self.error.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_error(&self, message: Option<String>) {
        *self.error.write().unwrap_or_else(|e| e.into_inner()) = message;
    }
}

/// Guard returned by [`StoreStatus::begin`].
#[derive(Debug)]
pub struct InFlight<'a> {
    status: &'a StoreStatus,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.status.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
