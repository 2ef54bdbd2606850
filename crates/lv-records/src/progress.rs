//! Logarithmic progress logging for long record streams.

/// Logs at record 1, 4, 16, 64, … so a stream of any length produces a
/// handful of lines.
pub struct LogProgress {
    what:  &'static str,
    count: u64,
    next:  u64,
}

impl LogProgress {
    pub fn new(what: &'static str) -> Self {
        Self { what, count: 0, next: 1 }
    }

    /// Count one record; logs when a power of four is reached.
    pub fn tick(&mut self) {
        self.count += 1;
        if self.count == self.next {
            self.next = self.next.saturating_mul(4);
            log::info!(" {} # {}", self.what, self.count);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}
