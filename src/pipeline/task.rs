// src/pipeline/task.rs
//! Task identity, lifecycle state, and the cooperative cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Identifies one submitted render task. Monotonically increasing per
/// pipeline instance; notifications carry it so the subscriber can discard
/// output from superseded tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a render task.
///
/// `Pending -> Running -> {Completed | Cancelled | Failed}`. The terminal
/// state is written exactly once by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl TaskState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => TaskState::Pending,
            1 => TaskState::Running,
            2 => TaskState::Completed,
            3 => TaskState::Cancelled,
            _ => TaskState::Failed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            TaskState::Pending => 0,
            TaskState::Running => 1,
            TaskState::Completed => 2,
            TaskState::Cancelled => 3,
            TaskState::Failed => 4,
        }
    }
}

/// Advisory cancellation flag.
///
/// Single writer (the interactive thread), single reader (the worker). The
/// worker observes it between page-production steps; a step already blocked
/// inside the external renderer cannot be interrupted until it yields.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Shared view of one task, returned by [`crate::pipeline::RenderPipeline::submit`].
///
/// Cloneable and cheap; the pipeline keeps its own copy alongside the
/// worker's join handle.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel: CancelToken,
    state: Arc<AtomicU8>,
}

impl TaskHandle {
    pub(crate) fn new(id: TaskId) -> Self {
        Self {
            id,
            cancel: CancelToken::new(),
            state: Arc::new(AtomicU8::new(TaskState::Pending.as_u8())),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: TaskState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Signals cancellation. Non-blocking and advisory: the worker stops at
    /// the next page boundary and emits nothing further.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}
