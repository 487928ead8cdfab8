// src/pipeline/worker.rs
//! The render task body, executed on a dedicated worker thread.

use crate::config::RenderConfig;
use crate::error::PipelineError;
use crate::pipeline::Notification;
use crate::pipeline::progress::ProgressTracker;
use crate::pipeline::task::{TaskHandle, TaskState};
use crate::renderer::{HandwritingRenderer, PageSet};
use log::{debug, info, warn};
use std::sync::Arc;

/// Substituted for empty input so the renderer is never invoked with
/// zero-length text.
pub(super) const PLACEHOLDER_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

/// Consumes the renderer's lazy page sequence for one task.
///
/// Exactly one of {Completed, Failed, silence-on-cancellation} is emitted.
/// The cancellation flag is re-checked before every emission, so a worker
/// abandoned after the grace period stays silent once its flag is set. All
/// renderer failures are caught here; none terminate the thread abnormally.
pub(super) fn run_render_task(
    handle: TaskHandle,
    text: String,
    config: RenderConfig,
    renderer: Arc<dyn HandwritingRenderer>,
    tx: async_channel::Sender<Notification>,
) {
    let task = handle.id();
    let cancel = handle.cancel_token();
    handle.set_state(TaskState::Running);
    debug!("[RENDER-{}] Started ({} chars)", task, text.chars().count());

    let text = if text.is_empty() {
        debug!("[RENDER-{}] Empty input, substituting placeholder text", task);
        PLACEHOLDER_TEXT.to_string()
    } else {
        text
    };

    let pages = match renderer.render(&text, &config) {
        Ok(pages) => pages,
        Err(err) => {
            deliver_failure(&handle, &tx, err);
            return;
        }
    };

    let mut tracker = ProgressTracker::new(text.chars().count());
    let mut result: PageSet = Vec::new();

    for page in pages {
        if cancel.is_cancelled() {
            info!("[RENDER-{}] Cancelled after {} page(s)", task, result.len());
            handle.set_state(TaskState::Cancelled);
            return;
        }
        match page {
            Ok(image) => {
                result.push(image);
                let percent = tracker.advance();
                if tx
                    .send_blocking(Notification::Progress { task, percent })
                    .is_err()
                {
                    warn!("[RENDER-{}] Subscriber channel closed, stopping", task);
                    handle.set_state(TaskState::Cancelled);
                    return;
                }
            }
            Err(err) => {
                deliver_failure(&handle, &tx, err);
                return;
            }
        }
    }

    // A cancel signalled between the last page and delivery still wins:
    // buffered pages are discarded, nothing is emitted.
    if cancel.is_cancelled() {
        info!("[RENDER-{}] Cancelled before delivery", task);
        handle.set_state(TaskState::Cancelled);
        return;
    }

    if result.is_empty() {
        deliver_failure(&handle, &tx, PipelineError::EmptyResult);
        return;
    }

    let percent = tracker.finish();
    if tx
        .send_blocking(Notification::Progress { task, percent })
        .is_err()
    {
        warn!("[RENDER-{}] Subscriber channel closed, stopping", task);
        handle.set_state(TaskState::Cancelled);
        return;
    }

    let page_count = result.len();
    if tx
        .send_blocking(Notification::Completed {
            task,
            pages: result,
        })
        .is_err()
    {
        warn!("[RENDER-{}] Subscriber channel closed, result dropped", task);
        handle.set_state(TaskState::Cancelled);
        return;
    }

    handle.set_state(TaskState::Completed);
    info!("[RENDER-{}] Completed with {} page(s)", task, page_count);
}

fn deliver_failure(
    handle: &TaskHandle,
    tx: &async_channel::Sender<Notification>,
    err: PipelineError,
) {
    let task = handle.id();
    let error = translate(err);
    warn!("[RENDER-{}] Failed: {}", task, error);
    handle.set_state(TaskState::Failed);
    if handle.is_cancelled() {
        // Superseded while failing: the subscriber no longer listens to us.
        return;
    }
    if tx.send_blocking(Notification::Failed { task, error }).is_err() {
        warn!("[RENDER-{}] Subscriber channel closed, error dropped", task);
    }
}

/// Re-interprets raw renderer failures so the known spacing/size pattern
/// surfaces with a clarified diagnostic. Typed errors pass through.
fn translate(err: PipelineError) -> PipelineError {
    match err {
        PipelineError::Render(message) => PipelineError::from_renderer(message),
        other => other,
    }
}
