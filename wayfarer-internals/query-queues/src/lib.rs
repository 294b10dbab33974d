//! Wayfarer Query Queues
//! Copyright (c) 2026 Mamy Ratsimbazafy
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! wayfarer-internals/query-queues
//! A request queue for remote API calls: QPS limiting, plus opt-in
//! exponential backoff with jitter for failures the caller deems transient.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::{Mutex, Notify, Semaphore};
use tokio::time::{self, Instant};

/// Error returned by the queue.
///
/// `Failed` carries the error of the last attempt so callers can keep their
/// own error taxonomy intact.
#[derive(Debug, Error)]
pub enum QueryQueueError<E> {
    #[error("request failed after {attempts} attempt(s): {source}")]
    Failed {
        attempts: u32,
        #[source]
        source: E,
    },
    #[error("queue is closed")]
    QueueClosed,
}

impl<E> QueryQueueError<E> {
    /// The error of the last attempt, if the queue got as far as running one.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::Failed { source, .. } => Some(source),
            Self::QueueClosed => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
enum RateLimit {
    #[default]
    ConcurrencyOnly,
    Qps {
        limit: u64,
        tokens: Arc<AtomicU64>,
        last_refill: Arc<Mutex<Instant>>,
        refill_interval: Duration,
        notify: Arc<Notify>,
    },
}

/// Limits in-flight and per-second requests to a remote service.
///
/// Retries are off unless [`QueryQueue::max_retries`] is raised, and even then
/// only errors accepted by the caller's predicate are retried.
///
/// ```ignore
/// let queue = QueryQueue::with_qps_limit(10).max_retries(2);
/// let body = queue.with_retry(|| fetch(), |e| e.is_transient()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct QueryQueue {
    semaphore: Arc<Semaphore>,
    initial_delay: Duration,
    max_delay: Duration,
    jitter_factor: f64,
    max_retries: u32,
    rate_limit: RateLimit,
}

impl Default for QueryQueue {
    fn default() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(4)),
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.5,
            max_retries: 0,
            rate_limit: RateLimit::ConcurrencyOnly,
        }
    }
}

impl QueryQueue {
    /// At most `max_concurrent` requests in flight.
    pub fn with_concurrency_limit(max_concurrent: u64) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent as usize)),
            ..Default::default()
        }
    }

    /// At most `qps_limit` requests started per second (and in flight).
    pub fn with_qps_limit(qps_limit: u64) -> Self {
        let qps_limit = qps_limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(qps_limit as usize)),
            rate_limit: RateLimit::Qps {
                limit: qps_limit,
                tokens: Arc::new(AtomicU64::new(qps_limit)),
                last_refill: Arc::new(Mutex::new(Instant::now())),
                refill_interval: Duration::from_secs(1),
                notify: Arc::new(Notify::new()),
            },
            ..Default::default()
        }
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn retries_enabled(&self) -> bool {
        self.max_retries > 0
    }

    async fn refill_tokens(&self) {
        let RateLimit::Qps {
            limit,
            tokens,
            last_refill,
            refill_interval,
            notify,
        } = &self.rate_limit
        else {
            return;
        };

        let mut last = last_refill.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(*last);
        if elapsed < *refill_interval {
            return;
        }
        let new_tokens = (elapsed.as_secs_f64() * *limit as f64) as u64;
        if new_tokens > 0 {
            let _ = tokens.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(cur.saturating_add(new_tokens).min(*limit))
            });
            notify.notify_waiters();
        }
        *last = now;
    }

    async fn acquire_token(&self) {
        let RateLimit::Qps { tokens, notify, .. } = &self.rate_limit else {
            return;
        };
        loop {
            self.refill_tokens().await;
            let available = tokens.load(Ordering::SeqCst);
            if available > 0 {
                if tokens
                    .compare_exchange(available, available - 1, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    return;
                }
            } else {
                let _ = time::timeout(Duration::from_millis(100), notify.notified()).await;
            }
        }
    }

    /// Run `f` once under the rate limit. Never retries.
    pub async fn run<T, E, F, Fut>(&self, f: F) -> Result<T, QueryQueueError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| QueryQueueError::QueueClosed)?;
        self.acquire_token().await;

        f().await
            .map_err(|source| QueryQueueError::Failed { attempts: 1, source })
    }

    /// Run `f` under the rate limit, retrying with exponential backoff and
    /// jitter while `is_retryable` accepts the error and retries remain.
    ///
    /// Every attempt, retries included, takes its own rate-limit token.
    pub async fn with_retry<T, E, F, Fut, R>(
        &self,
        mut f: F,
        is_retryable: R,
    ) -> Result<T, QueryQueueError<E>>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| QueryQueueError::QueueClosed)?;

        let mut attempts = 0;
        let mut delay = self.initial_delay;

        loop {
            self.acquire_token().await;
            attempts += 1;
            match f().await {
                Ok(result) => return Ok(result),
                Err(source) => {
                    if attempts > self.max_retries || !is_retryable(&source) {
                        return Err(QueryQueueError::Failed { attempts, source });
                    }
                    let jittered = self.apply_jitter(delay);
                    tracing::debug!(
                        "attempt {} failed, retrying in {:?} ({} retries left)",
                        attempts,
                        jittered,
                        self.max_retries + 1 - attempts
                    );
                    time::sleep(jittered).await;
                    delay = std::cmp::min(delay * 2, self.max_delay);
                }
            }
        }
    }

    fn apply_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_factor == 0.0 {
            return delay;
        }

        let jitter_ms = (delay.as_millis() as f64 * self.jitter_factor) as u64;
        let rand_jitter = rand::thread_rng().gen_range(0..=jitter_ms);

        Duration::from_millis(delay.as_millis() as u64 + rand_jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[derive(Debug, PartialEq)]
    enum Failure {
        Transient,
        Permanent,
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_is_single_attempt() {
        let queue = QueryQueue::with_concurrency_limit(2).max_retries(5);
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = queue
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Failure::Transient)
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match result {
            Err(QueryQueueError::Failed { attempts, source }) => {
                assert_eq!(attempts, 1);
                assert_eq!(source, Failure::Transient);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_stops_on_permanent_error() {
        let queue = QueryQueue::with_concurrency_limit(1).max_retries(3);
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = queue
            .with_retry(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Failure::Permanent)
                },
                |e| *e == Failure::Transient,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(QueryQueueError::Failed { attempts: 1, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_max_retries() {
        let queue = QueryQueue::with_concurrency_limit(1).max_retries(2);
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = queue
            .with_retry(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Failure::Transient)
                },
                |e| *e == Failure::Transient,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(QueryQueueError::Failed { attempts: 3, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers() {
        let queue = QueryQueue::with_qps_limit(5).max_retries(2);
        let calls = &AtomicU32::new(0);

        let result = queue
            .with_retry(
                move || async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n == 0 {
                        Err(Failure::Transient)
                    } else {
                        Ok(n)
                    }
                },
                |e| *e == Failure::Transient,
            )
            .await;

        assert_eq!(result.ok(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_qps_limit_delays_excess_requests() {
        let queue = QueryQueue::with_qps_limit(2);
        let start = Instant::now();

        for _ in 0..3 {
            let _: Result<(), QueryQueueError<Failure>> = queue.run(move || async move { Ok(()) }).await;
        }

        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[test]
    fn test_retries_disabled_by_default() {
        assert!(!QueryQueue::default().retries_enabled());
        assert!(QueryQueue::with_qps_limit(10).max_retries(1).retries_enabled());
    }
}
