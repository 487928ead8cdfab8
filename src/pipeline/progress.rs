// src/pipeline/progress.rs
//! Character-based progress accounting for a render task.
//!
//! The renderer yields pages lazily, so the page count is unknown up front
//! and cannot drive a percentage. Instead, each produced page advances a
//! character-consumed counter by a fixed step derived from the input length
//! divided into roughly 100 increments. Intermediate values are capped at
//! 95 so that 100 is only ever reported once completion is confirmed.

/// Upper bound for progress reported while pages are still being produced.
const INTERMEDIATE_CAP: u8 = 95;

#[derive(Debug)]
pub(crate) struct ProgressTracker {
    total_chars: usize,
    step: usize,
    consumed: usize,
    last: u8,
}

impl ProgressTracker {
    pub fn new(total_chars: usize) -> Self {
        let total_chars = total_chars.max(1);
        Self {
            total_chars,
            step: (total_chars / 100).max(1),
            consumed: 0,
            last: 0,
        }
    }

    /// Advances the counter by one page's worth of characters and returns
    /// the progress value to report. Non-decreasing, bounded to
    /// `[0, INTERMEDIATE_CAP]`.
    pub fn advance(&mut self) -> u8 {
        self.consumed = self.consumed.saturating_add(self.step);
        let pct = (self.consumed * 100 / self.total_chars).min(INTERMEDIATE_CAP as usize) as u8;
        self.last = self.last.max(pct);
        self.last
    }

    /// The final value, reported exactly once on full uncancelled completion.
    pub fn finish(&mut self) -> u8 {
        self.last = 100;
        self.last
    }
}
