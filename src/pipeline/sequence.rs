use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter used to drop out-of-order completions.
///
/// A request takes a number when it is dispatched; its completion is applied
/// only if no newer request was dispatched (or the counter invalidated) since.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// Retire every outstanding request
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// Tracks which recipe the modal is showing.
///
/// Opening hands out a fresh token; closing retires it. Late lookup or
/// generation results render only while their token is still current.
#[derive(Debug, Default)]
pub struct ModalGuard {
    generation: RequestSequence,
}

impl ModalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> u64 {
        self.generation.next()
    }

    pub fn close(&self) {
        self.generation.invalidate();
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.generation.is_latest(token)
    }
}
