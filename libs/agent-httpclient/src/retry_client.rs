// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Attempt-bounded request retries

use std::time::Duration;

use agent_retry::{AttemptRetryStrategy, RetryStrategy};
use async_trait::async_trait;

use crate::doer::RequestDoer;
use crate::error::ClientError;
use crate::request::{PreparedRequest, Request, Response};
use crate::retryable::RequestRetryable;

/// A [`RequestDoer`] that retries each request up to `max_attempts` times.
///
/// Retries cover transport failures and non-2xx responses. When the
/// attempts run out the last error is returned.
#[derive(Debug, Clone)]
pub struct RetryClient<D> {
    delegate: D,
    strategy: AttemptRetryStrategy,
}

impl<D: RequestDoer> RetryClient<D> {
    pub fn new(delegate: D, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            delegate,
            strategy: AttemptRetryStrategy::new(max_attempts, retry_delay),
        }
    }

    /// Send a request whose body may be a one-shot reader.
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let mut retryable = RequestRetryable::new(request, &self.delegate);

        match self.strategy.try_run(&mut retryable).await {
            Ok(()) => retryable.take_response().ok_or_else(|| {
                ClientError::Request("request succeeded without a response".into())
            }),
            Err(err) => {
                tracing::debug!(
                    request_id = ?retryable.request_id(),
                    attempts = retryable.attempts(),
                    error = %err,
                    "Giving up on request"
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<D: RequestDoer> RequestDoer for RetryClient<D> {
    async fn execute(&self, request: PreparedRequest) -> Result<Response, ClientError> {
        self.send(Request::from(request)).await
    }
}
