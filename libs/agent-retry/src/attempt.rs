// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Single attempts

use std::fmt::Display;
use std::future::Future;

use async_trait::async_trait;

/// Outcome of one attempt.
#[derive(Debug)]
#[must_use]
pub enum Attempt<E> {
    /// The operation finished; stop.
    Success,
    /// The attempt failed but another one may succeed.
    Retry(E),
    /// The attempt failed and retrying cannot help.
    Stop(E),
}

impl<E> Attempt<E> {
    pub fn should_retry(&self) -> bool {
        matches!(self, Attempt::Retry(_))
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Attempt::Success => None,
            Attempt::Retry(err) | Attempt::Stop(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<(), E> {
        match self {
            Attempt::Success => Ok(()),
            Attempt::Retry(err) | Attempt::Stop(err) => Err(err),
        }
    }
}

/// One attempt of an operation that a [`RetryStrategy`] may repeat.
///
/// [`RetryStrategy`]: crate::RetryStrategy
#[async_trait]
pub trait Retryable: Send {
    type Error: Display + Send;

    async fn attempt(&mut self) -> Attempt<Self::Error>;
}

/// A [`Retryable`] backed by a closure.
pub struct RetryableFn<F> {
    f: F,
}

pub fn retryable_fn<F>(f: F) -> RetryableFn<F> {
    RetryableFn { f }
}

#[async_trait]
impl<F, Fut, E> Retryable for RetryableFn<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Attempt<E>> + Send + 'static,
    E: Display + Send + 'static,
{
    type Error = E;

    async fn attempt(&mut self) -> Attempt<E> {
        (self.f)().await
    }
}
