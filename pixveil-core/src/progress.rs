//! Progress observation for long-running pixel loops.
//!
//! Codecs report `(done, total)` at row or block boundaries. Observers are
//! purely informational: there is no cancellation and no backpressure.

/// Receives progress notifications.
pub trait Progress {
    /// Called with the number of completed units and the total unit count.
    fn advance(&mut self, done: usize, total: usize);
}

impl<F> Progress for F
where
    F: FnMut(usize, usize),
{
    fn advance(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

/// Observer that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&mut self, _done: usize, _total: usize) {}
}
