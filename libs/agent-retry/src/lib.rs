// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Retryable attempts and retry strategies.
//!
//! A [`Retryable`] performs exactly one attempt of some operation and says
//! whether it is worth trying again. A [`RetryStrategy`] decides how many
//! times and how long to wait between attempts. Keeping the two apart lets
//! callers swap backoff policy without touching the operation itself.
//!
//! ```ignore
//! use std::time::Duration;
//! use agent_retry::{Attempt, AttemptRetryStrategy, RetryStrategy, retryable_fn};
//!
//! let mut op = retryable_fn(|| async { Attempt::<String>::Success });
//! AttemptRetryStrategy::new(3, Duration::from_millis(100))
//!     .try_run(&mut op)
//!     .await?;
//! ```

pub mod attempt;
pub mod strategy;

pub use attempt::{Attempt, Retryable, RetryableFn, retryable_fn};
pub use strategy::{
    AttemptRetryStrategy, RetryStrategy, TimeoutRetryStrategy, UnlimitedRetryStrategy,
};
