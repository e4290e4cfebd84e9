//! Encoder pulse counter

use portable_atomic::{AtomicU32, Ordering};

/// Pulses counted since the last sample
///
/// Incremented from the encoder edge handler, drained by the speed control
/// loop. Draining is a single swap so no pulse is lost between read and reset.
pub struct EncoderCounter {
    pulses: AtomicU32,
}

impl Default for EncoderCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderCounter {
    pub const fn new() -> Self {
        Self {
            pulses: AtomicU32::new(0),
        }
    }

    /// Count one encoder edge
    pub fn on_edge(&self) {
        self.pulses.fetch_add(1, Ordering::Relaxed);
    }

    /// Read and reset the count
    pub fn take(&self) -> u32 {
        self.pulses.swap(0, Ordering::Relaxed)
    }

    /// Read without resetting
    pub fn peek(&self) -> u32 {
        self.pulses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_resets() {
        let counter = EncoderCounter::new();
        for _ in 0..5 {
            counter.on_edge();
        }
        assert_eq!(counter.peek(), 5);
        assert_eq!(counter.take(), 5);
        assert_eq!(counter.take(), 0);
    }
}
