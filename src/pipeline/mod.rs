// src/pipeline/mod.rs
//! The asynchronous render-and-preview pipeline.
//!
//! [`RenderPipeline`] owns a cancellable background render task that turns
//! (text, configuration) into an ordered sequence of page images, reports
//! incremental progress, and publishes either a completed page set or a
//! typed failure to a single subscriber.
//!
//! # Architecture
//!
//! ```text
//! Interactive thread            Worker thread (one per active task)
//!   submit(request) ──spawn──▶   renderer.render(text, config)
//!   cancel flag     ──read───▶   per page: cancel check, progress
//!   notifications   ◀──send───   terminal: Completed | Failed | silence
//! ```
//!
//! At most one task runs per pipeline instance: `submit` first signals
//! cancellation to the running task and waits a short bounded grace period
//! for its thread to stop; a thread that does not stop in time is abandoned
//! (it still honors the flag and emits nothing further). Every notification
//! carries its [`TaskId`] so the subscriber can discard output from a
//! superseded task regardless of delivery timing.

pub(crate) mod progress;
pub mod task;
pub(crate) mod worker;

pub use task::{CancelToken, TaskHandle, TaskId, TaskState};

use crate::config::RenderConfig;
use crate::error::PipelineError;
use crate::renderer::{HandwritingRenderer, PageSet};
use log::{info, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// One submission of text plus configuration for conversion to page images.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub text: String,
    pub config: RenderConfig,
}

impl RenderRequest {
    pub fn new(text: impl Into<String>, config: RenderConfig) -> Self {
        Self {
            text: text.into(),
            config,
        }
    }
}

/// Asynchronous event delivered to the pipeline's subscriber.
///
/// For a given task, `Progress` values are non-decreasing, intermediate
/// values are capped at 95, and 100 is emitted exactly once, last, on full
/// uncancelled completion. Exactly one of `Completed` or `Failed` follows
/// the final progress value; a cancelled task emits nothing further.
#[derive(Debug)]
pub enum Notification {
    Progress { task: TaskId, percent: u8 },
    Completed { task: TaskId, pages: PageSet },
    Failed { task: TaskId, error: PipelineError },
}

impl Notification {
    /// The task this notification belongs to, for stale-output filtering.
    pub fn task(&self) -> TaskId {
        match self {
            Notification::Progress { task, .. }
            | Notification::Completed { task, .. }
            | Notification::Failed { task, .. } => *task,
        }
    }
}

/// How long `submit` waits for a cancelled worker before abandoning it.
const CANCEL_GRACE: Duration = Duration::from_millis(100);
const JOIN_POLL: Duration = Duration::from_millis(2);

struct ActiveTask {
    handle: TaskHandle,
    join: thread::JoinHandle<()>,
}

/// Owns the background render task and the notification channel.
///
/// The interactive thread never blocks on render completion; it polls or
/// awaits the receiver returned by [`RenderPipeline::notifications`] and
/// marshals any resulting state mutation back onto its own event loop.
pub struct RenderPipeline {
    renderer: Arc<dyn HandwritingRenderer>,
    sender: async_channel::Sender<Notification>,
    receiver: async_channel::Receiver<Notification>,
    current: Option<ActiveTask>,
    next_id: u64,
}

impl RenderPipeline {
    pub fn new(renderer: Arc<dyn HandwritingRenderer>) -> Self {
        let (sender, receiver) = async_channel::unbounded();
        Self {
            renderer,
            sender,
            receiver,
            current: None,
            next_id: 1,
        }
    }

    /// The single-consumer notification stream. The worker side sends
    /// blocking; the subscriber may consume blocking or async.
    pub fn notifications(&self) -> async_channel::Receiver<Notification> {
        self.receiver.clone()
    }

    /// The most recently submitted task, i.e. the only one whose
    /// notifications are not stale.
    pub fn current_task(&self) -> Option<TaskId> {
        self.current.as_ref().map(|active| active.handle.id())
    }

    pub fn is_current(&self, task: TaskId) -> bool {
        self.current_task() == Some(task)
    }

    /// Starts rendering `request` on a dedicated worker thread.
    ///
    /// A task already running is signalled to cancel first; the pipeline
    /// never runs two tasks concurrently. Returns a handle usable for
    /// explicit cancellation. Does not block beyond the bounded grace wait
    /// for the superseded worker.
    pub fn submit(&mut self, request: RenderRequest) -> TaskHandle {
        self.cancel_current();

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let handle = TaskHandle::new(id);
        let worker_handle = handle.clone();
        let renderer = Arc::clone(&self.renderer);
        let sender = self.sender.clone();
        let RenderRequest { text, config } = request;

        let join = thread::spawn(move || {
            worker::run_render_task(worker_handle, text, config, renderer, sender);
        });

        self.current = Some(ActiveTask {
            handle: handle.clone(),
            join,
        });
        handle
    }

    /// Sets the task's cancellation flag. The task observes it between
    /// page-production steps and stops without emitting a result.
    pub fn cancel(&self, handle: &TaskHandle) {
        handle.cancel();
    }

    /// Blocks until the current worker thread exits, up to `timeout`.
    /// Returns true when the pipeline is idle. Intended for shutdown paths
    /// and tests; the interactive thread normally never waits.
    pub fn wait_for_completion(&self, timeout: Duration) -> bool {
        let Some(active) = &self.current else {
            return true;
        };
        let deadline = Instant::now() + timeout;
        while !active.join.is_finished() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(JOIN_POLL);
        }
        true
    }

    /// Cancels any running task and waits out the grace period before
    /// dropping the pipeline.
    pub fn shutdown(mut self) {
        self.cancel_current();
    }

    fn cancel_current(&mut self) {
        let Some(active) = self.current.take() else {
            return;
        };
        let id = active.handle.id();
        if active.join.is_finished() {
            let _ = active.join.join();
            return;
        }

        info!("[PIPELINE] Signalling cancellation to task {}", id);
        active.handle.cancel();

        let deadline = Instant::now() + CANCEL_GRACE;
        while !active.join.is_finished() && Instant::now() < deadline {
            thread::sleep(JOIN_POLL);
        }

        if active.join.is_finished() {
            let _ = active.join.join();
        } else {
            // Blocked inside a single page-generation step; it will observe
            // the flag when that step yields and then stay silent.
            warn!(
                "[PIPELINE] Task {} did not stop within {:?}, abandoning",
                id, CANCEL_GRACE
            );
        }
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        self.cancel_current();
    }
}
