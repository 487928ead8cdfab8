//! Scripted renderer fixtures shared by the integration tests.

use scriven::{HandwritingRenderer, PageImage, PageIter, PipelineError, RenderConfig};
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

pub fn blank_page() -> PageImage {
    PageImage::new(8, 8)
}

/// What one `render` call should do. Each submitted request consumes the
/// next script in order.
pub enum Script {
    /// Yield this many pages, then finish.
    Pages(usize),
    /// Yield one page per permit received on the channel, up to the given
    /// count; finish early when the sender is dropped.
    Gated(Receiver<()>, usize),
    /// Yield this many pages, then fail with the message.
    FailAfter(usize, String),
    /// Reject the configuration before producing any page.
    ErrorUpfront(String),
}

/// Test double for the external handwriting renderer.
///
/// Records the text of every invocation so tests can assert on placeholder
/// substitution and invocation counts.
pub struct ScriptedRenderer {
    scripts: Mutex<VecDeque<Script>>,
    seen_text: Mutex<Vec<String>>,
}

impl ScriptedRenderer {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            seen_text: Mutex::new(Vec::new()),
        })
    }

    pub fn seen_text(&self) -> Vec<String> {
        self.seen_text.lock().unwrap().clone()
    }
}

impl HandwritingRenderer for ScriptedRenderer {
    fn render(&self, text: &str, _config: &RenderConfig) -> Result<PageIter, PipelineError> {
        self.seen_text.lock().unwrap().push(text.to_string());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("renderer invoked more times than scripted");

        match script {
            Script::Pages(n) => Ok(Box::new((0..n).map(|_| Ok(blank_page())))),
            Script::Gated(permits, n) => Ok(Box::new(GatedIter {
                permits,
                remaining: n,
            })),
            Script::FailAfter(n, message) => {
                let pages = (0..n).map(|_| Ok(blank_page()));
                let failure = std::iter::once(Err(PipelineError::Render(message)));
                Ok(Box::new(pages.chain(failure)))
            }
            Script::ErrorUpfront(message) => Err(PipelineError::Render(message)),
        }
    }
}

struct GatedIter {
    permits: Receiver<()>,
    remaining: usize,
}

impl Iterator for GatedIter {
    type Item = Result<PageImage, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Ends early when the test drops the permit sender.
        match self.permits.recv() {
            Ok(()) => {
                self.remaining -= 1;
                Some(Ok(blank_page()))
            }
            Err(_) => None,
        }
    }
}
