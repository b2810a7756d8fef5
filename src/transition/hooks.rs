//! Progress reporting and cooperative cancellation.
//!
//! Both are explicit, optional parameters to a decode, never globals,
//! and are observed at well-defined points: the progress callback fires
//! once per completed time step, in step order; the cancellation token
//! is checked at the top of each step iteration, before any further
//! network queries are issued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Snapshot passed to the progress callback after a step completes.
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    /// The step (observation index) that just finished.
    pub step: usize,

    /// Total steps in this decode.
    pub total: usize,
}

/// Cooperative cancellation flag, cloneable across threads.
///
/// An observed cancellation aborts the decode cleanly with
/// [`MatchError::Cancelled`](crate::transition::MatchError::Cancelled);
/// no partial match is returned.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
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

/// Optional per-decode side channels.
#[derive(Clone, Copy, Default)]
pub struct Hooks<'a> {
    pub progress: Option<&'a (dyn Fn(Progress) + Send + Sync)>,
    pub cancel: Option<&'a CancellationToken>,
}

impl<'a> Hooks<'a> {
    pub fn with_progress(mut self, progress: &'a (dyn Fn(Progress) + Send + Sync)) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(callback) = self.progress {
            callback(progress);
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancellationToken::is_cancelled)
    }
}
