//! One-shot background worker for batch jobs.
//!
//! A job is moved onto a fresh thread, computes one result, and sends it
//! back over a single-shot channel. The caller waits with a deadline so a
//! worker that never replies surfaces as an error instead of leaving the
//! request pending forever. A cancel token suppresses late replies.

use crate::error::{PipelineError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cancellation flag shared between the caller and a dispatched job
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // cancellation is driven by embedding callers; the CLI never cancels
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Run `job` on a fresh worker thread and wait for its single result.
///
/// Returns `WorkerTimeout` if nothing arrives within `deadline`,
/// `WorkerCancelled` if the token was tripped before the job replied, and
/// `WorkerFailed` if the worker died (e.g. panicked) without replying.
pub fn run_job<T, F>(job: F, deadline: Duration, cancel: &CancelToken) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let token = cancel.clone();

    thread::spawn(move || {
        let result = job();
        if !token.is_cancelled() {
            let _ = tx.send(result);
        }
    });

    match rx.recv_timeout(deadline) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(PipelineError::WorkerTimeout(deadline)),
        Err(RecvTimeoutError::Disconnected) => {
            if cancel.is_cancelled() {
                Err(PipelineError::WorkerCancelled)
            } else {
                Err(PipelineError::WorkerFailed(
                    "worker exited without replying".into(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_job, CancelToken};
    use crate::error::PipelineError;
    use std::time::Duration;

    #[test]
    fn job_result_comes_back() {
        let cancel = CancelToken::new();
        let result = run_job(|| Ok(2 + 2), Duration::from_secs(1), &cancel);
        assert_eq!(result.unwrap(), 4);
    }

    #[test]
    fn job_error_comes_back() {
        let cancel = CancelToken::new();
        let result: crate::error::Result<u32> = run_job(
            || Err(PipelineError::InvalidConfig("bad".into())),
            Duration::from_secs(1),
            &cancel,
        );
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn slow_job_times_out() {
        let cancel = CancelToken::new();
        let result: crate::error::Result<()> = run_job(
            || {
                std::thread::sleep(Duration::from_secs(5));
                Ok(())
            },
            Duration::from_millis(50),
            &cancel,
        );
        assert!(matches!(result, Err(PipelineError::WorkerTimeout(_))));
    }

    #[test]
    fn panicking_job_surfaces_as_failure() {
        let cancel = CancelToken::new();
        let result: crate::error::Result<()> = run_job(
            || panic!("worker blew up"),
            Duration::from_secs(1),
            &cancel,
        );
        assert!(matches!(result, Err(PipelineError::WorkerFailed(_))));
    }

    #[test]
    fn cancelled_job_is_reported_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result: crate::error::Result<u32> =
            run_job(|| Ok(1), Duration::from_secs(1), &cancel);
        assert!(matches!(result, Err(PipelineError::WorkerCancelled)));
    }
}
