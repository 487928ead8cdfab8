// src/preview.rs
//! Subscriber-side pagination cache and the resubmit throttle.
//!
//! [`PreviewState`] holds the pages of the last completed render plus the
//! index of the page on display. It is mutated only by the subscriber upon
//! receiving a page set; the pipeline never touches it. [`PreviewThrottle`]
//! is the caller-side debounce policy deciding whether an edit warrants a
//! new submission; the pipeline itself accepts any submission rate.

use crate::config::RenderConfig;
use crate::renderer::{PageImage, PageSet};
use std::time::{Duration, Instant};

/// Pages of the most recent completed render and the current position.
#[derive(Debug, Default)]
pub struct PreviewState {
    pages: PageSet,
    current: usize,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a delivered page set and resets to the first page.
    pub fn set_pages(&mut self, pages: PageSet) {
        self.pages = pages;
        self.current = 0;
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.current = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> Option<&PageImage> {
        self.pages.get(self.current)
    }

    /// Advances to the next page. Returns false at the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Steps back one page. Returns false at the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to a zero-based page index. Returns false when out of range.
    pub fn go_to_page(&mut self, index: usize) -> bool {
        if index < self.pages.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// One-based position label, e.g. "page 2 of 7".
    pub fn page_info(&self) -> String {
        format!("page {} of {}", self.current + 1, self.pages.len())
    }
}

/// Decides whether a text or configuration change warrants a resubmission.
///
/// Mirrors the interactive layer's policy: changes inside the throttle
/// window, or edits that leave both text and configuration identical to the
/// last accepted render, are suppressed.
#[derive(Debug)]
pub struct PreviewThrottle {
    window: Duration,
    last_accepted: Option<Instant>,
    last_text: String,
    last_config: Option<RenderConfig>,
}

impl PreviewThrottle {
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(200);

    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
            last_text: String::new(),
            last_config: None,
        }
    }

    /// True when the change should be rendered now; records the inputs as
    /// the new baseline when accepted.
    pub fn should_update(&mut self, text: &str, config: &RenderConfig) -> bool {
        let changed =
            self.last_text != text || self.last_config.as_ref() != Some(config);
        if !changed {
            return false;
        }
        if let Some(last) = self.last_accepted {
            if last.elapsed() < self.window {
                return false;
            }
        }
        self.last_accepted = Some(Instant::now());
        self.last_text = text.to_string();
        self.last_config = Some(config.clone());
        true
    }
}

impl Default for PreviewThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
