//! Bounded retry-with-timeout, the primitive behind every page assertion.
//!
//! A probe is called repeatedly until it reports [`Probe::Ready`] or the
//! timeout elapses. The probe is always called at least once, so a zero
//! timeout degrades to a single check. Errors returned by the probe are not
//! retried; they abort the poll immediately.

use crate::errors::Result;
use std::future::Future;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(4000),
            interval: Duration::from_millis(50),
        }
    }
}

/// Outcome of one probe call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Ready(T),
    /// Not there yet. Carries a description of what was observed, or `None`
    /// when there was nothing to observe at all.
    Pending(Option<String>),
}

/// The probe never became ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTimeout {
    pub last_observed: Option<String>,
    pub attempts: u32,
    pub elapsed: Duration,
}

pub async fn poll_until<T, F, Fut>(
    options: PollOptions,
    mut probe: F,
) -> Result<std::result::Result<T, PollTimeout>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe<T>>>,
{
    let start_time = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let last_observed = match probe().await? {
            Probe::Ready(value) => {
                if attempts > 1 {
                    tracing::debug!(attempts, "poll settled");
                }
                return Ok(Ok(value));
            }
            Probe::Pending(observed) => observed,
        };

        let elapsed = start_time.elapsed();
        if elapsed >= options.timeout {
            return Ok(Err(PollTimeout {
                last_observed,
                attempts,
                elapsed,
            }));
        }

        let remaining = options.timeout - elapsed;
        tokio::time::sleep(options.interval.min(remaining)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::E2eError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> PollOptions {
        PollOptions::new(Duration::from_millis(200), Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_ready_on_first_attempt() {
        let outcome = poll_until(fast(), || async { Ok(Probe::Ready(7)) })
            .await
            .unwrap();
        assert_eq!(outcome, Ok(7));
    }

    #[tokio::test]
    async fn test_settles_after_pending_attempts() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Ok(Probe::Pending(Some(format!("call {}", n))))
                } else {
                    Ok(Probe::Ready(n))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(outcome, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_timeout_keeps_last_observation() {
        let calls = AtomicU32::new(0);
        let outcome: std::result::Result<(), PollTimeout> = poll_until(fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Probe::Pending(Some(format!("call {}", n)))) }
        })
        .await
        .unwrap();

        let timeout = outcome.unwrap_err();
        assert!(timeout.attempts > 1);
        assert!(timeout.elapsed >= Duration::from_millis(200));
        assert_eq!(
            timeout.last_observed,
            Some(format!("call {}", timeout.attempts - 1))
        );
    }

    #[tokio::test]
    async fn test_zero_timeout_probes_once() {
        let calls = AtomicU32::new(0);
        let options = PollOptions::new(Duration::ZERO, Duration::from_millis(5));
        let outcome: std::result::Result<(), PollTimeout> = poll_until(options, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Probe::Pending(None)) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.unwrap_err().last_observed, None);
    }

    #[tokio::test]
    async fn test_probe_error_aborts_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<std::result::Result<(), PollTimeout>> = poll_until(fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(E2eError::JavaScriptFailed("tab gone".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(E2eError::JavaScriptFailed(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
