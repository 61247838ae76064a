// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Retry strategies
//!
//! All strategies stop as soon as an attempt returns [`Attempt::Stop`] and
//! hand back the error of the last attempt when they give up.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, sleep};

use crate::attempt::{Attempt, Retryable};

/// Drives a [`Retryable`] until it succeeds or the strategy gives up.
#[async_trait]
pub trait RetryStrategy: Send + Sync {
    async fn try_run<R>(&self, retryable: &mut R) -> Result<(), R::Error>
    where
        R: Retryable + ?Sized;
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

/// Retry up to a fixed number of attempts.
#[derive(Debug, Clone, Copy)]
pub struct AttemptRetryStrategy {
    max_attempts: u32,
    delay: Duration,
}

impl AttemptRetryStrategy {
    /// A `max_attempts` of zero still makes one attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[async_trait]
impl RetryStrategy for AttemptRetryStrategy {
    async fn try_run<R>(&self, retryable: &mut R) -> Result<(), R::Error>
    where
        R: Retryable + ?Sized,
    {
        let mut attempt = 1u32;
        loop {
            match retryable.attempt().await {
                Attempt::Success => return Ok(()),
                Attempt::Stop(err) => return Err(err),
                Attempt::Retry(err) => {
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Attempt failed"
                    );
                    if attempt >= self.max_attempts {
                        return Err(err);
                    }
                }
            }
            attempt += 1;
            pause(self.delay).await;
        }
    }
}

/// Retry until an overall time budget runs out.
///
/// Another attempt is only started if waiting `delay` would still leave the
/// strategy inside its timeout.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutRetryStrategy {
    timeout: Duration,
    delay: Duration,
}

impl TimeoutRetryStrategy {
    pub fn new(timeout: Duration, delay: Duration) -> Self {
        Self { timeout, delay }
    }
}

#[async_trait]
impl RetryStrategy for TimeoutRetryStrategy {
    async fn try_run<R>(&self, retryable: &mut R) -> Result<(), R::Error>
    where
        R: Retryable + ?Sized,
    {
        let start = Instant::now();
        let mut attempt = 1u32;
        loop {
            match retryable.attempt().await {
                Attempt::Success => return Ok(()),
                Attempt::Stop(err) => return Err(err),
                Attempt::Retry(err) => {
                    let elapsed = start.elapsed();
                    tracing::debug!(
                        attempt,
                        elapsed_ms = elapsed.as_millis() as u64,
                        timeout_ms = self.timeout.as_millis() as u64,
                        error = %err,
                        "Attempt failed"
                    );
                    if elapsed + self.delay > self.timeout {
                        return Err(err);
                    }
                }
            }
            attempt += 1;
            pause(self.delay).await;
        }
    }
}

/// Retry for as long as the retryable asks for it.
#[derive(Debug, Clone, Copy)]
pub struct UnlimitedRetryStrategy {
    delay: Duration,
}

impl UnlimitedRetryStrategy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RetryStrategy for UnlimitedRetryStrategy {
    async fn try_run<R>(&self, retryable: &mut R) -> Result<(), R::Error>
    where
        R: Retryable + ?Sized,
    {
        let mut attempt = 1u32;
        loop {
            match retryable.attempt().await {
                Attempt::Success => return Ok(()),
                Attempt::Stop(err) => return Err(err),
                Attempt::Retry(err) => {
                    tracing::debug!(attempt, error = %err, "Attempt failed");
                }
            }
            attempt = attempt.saturating_add(1);
            pause(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::attempt::retryable_fn;

    /// Retryable that retries `failures` times and then succeeds.
    fn flaky(
        failures: u32,
        counter: Arc<AtomicU32>,
    ) -> impl Retryable<Error = String> {
        retryable_fn(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= failures {
                    Attempt::Retry(format!("failure {}", n))
                } else {
                    Attempt::Success
                }
            }
        })
    }

    #[tokio::test]
    async fn attempt_strategy_succeeds_within_budget() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut op = flaky(2, Arc::clone(&counter));

        let result = AttemptRetryStrategy::new(3, Duration::ZERO)
            .try_run(&mut op)
            .await;

        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn attempt_strategy_returns_last_error_when_exhausted() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut op = flaky(10, Arc::clone(&counter));

        let err = AttemptRetryStrategy::new(3, Duration::ZERO)
            .try_run(&mut op)
            .await
            .unwrap_err();

        assert_eq!(err, "failure 3");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut op = flaky(10, Arc::clone(&counter));

        let strategy = AttemptRetryStrategy::new(0, Duration::ZERO);
        assert_eq!(strategy.max_attempts(), 1);
        assert!(strategy.try_run(&mut op).await.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_ends_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);
        let mut op = retryable_fn(move || {
            c.fetch_add(1, Ordering::SeqCst);
            async { Attempt::Stop("fatal".to_string()) }
        });

        let err = AttemptRetryStrategy::new(5, Duration::ZERO)
            .try_run(&mut op)
            .await
            .unwrap_err();

        assert_eq!(err, "fatal");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_strategy_gives_up_after_budget() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut op = flaky(u32::MAX, Arc::clone(&counter));

        let started = Instant::now();
        let err = TimeoutRetryStrategy::new(Duration::from_secs(10), Duration::from_secs(3))
            .try_run(&mut op)
            .await
            .unwrap_err();

        // Attempts at t=0, 3, 6, 9; a fifth would start past the timeout.
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert_eq!(err, "failure 4");
        assert!(started.elapsed() <= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_strategy_returns_on_success() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut op = flaky(1, Arc::clone(&counter));

        let result = TimeoutRetryStrategy::new(Duration::from_secs(10), Duration::from_secs(1))
            .try_run(&mut op)
            .await;

        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unlimited_strategy_runs_until_success() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut op = flaky(25, Arc::clone(&counter));

        UnlimitedRetryStrategy::new(Duration::ZERO)
            .try_run(&mut op)
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 26);
    }

    #[test]
    fn attempt_accessors() {
        let retry: Attempt<&str> = Attempt::Retry("again");
        assert!(retry.should_retry());
        assert_eq!(retry.error(), Some(&"again"));

        let stop: Attempt<&str> = Attempt::Stop("done");
        assert!(!stop.should_retry());
        assert_eq!(stop.into_result(), Err("done"));

        let success: Attempt<&str> = Attempt::Success;
        assert!(success.error().is_none());
        assert_eq!(success.into_result(), Ok(()));
    }
}
