// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Long-running task polling
//!
//! An asynchronous agent method answers with a task handle. [`run_task`]
//! follows it with `get_task` calls until the value is no longer a running
//! handle:
//!
//! ```text
//! Sending --(running handle)--> Polling --(running handle)--> Polling
//!    |                             |
//!    +----(any other value)--------+--(any other value)--> Done
//! ```
//!
//! Each round trip may fail at the transport level up to the tolerated error
//! count in a row; a success resets the count. Exceptions and malformed
//! responses end the operation at once.

use std::time::Duration;

use agent_httpclient::HttpClient;
use agent_retry::{Attempt, RetryStrategy, Retryable, UnlimitedRetryStrategy};
use agent_types::{AgentCall, TaskValue};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentClientError;
use crate::request::AgentRequest;

/// Consecutive transport failures seen by one operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ErrorTolerance {
    tolerated: u32,
    consecutive: u32,
}

impl ErrorTolerance {
    pub(crate) fn new(tolerated: u32) -> Self {
        Self {
            tolerated,
            consecutive: 0,
        }
    }

    /// Count a failure; true while the operation may keep going.
    pub(crate) fn record_failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.consecutive <= self.tolerated
    }

    pub(crate) fn reset(&mut self) {
        self.consecutive = 0;
    }

    pub(crate) fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

#[derive(Debug)]
enum Phase {
    Sending,
    Polling { task_id: String },
    Done(Value),
}

/// One round trip of a task operation per attempt.
struct TaskPoll<'a, H> {
    request: &'a AgentRequest<H>,
    call: &'a AgentCall,
    poll: bool,
    phase: Phase,
    tolerance: ErrorTolerance,
}

impl<'a, H: HttpClient> TaskPoll<'a, H> {
    fn new(request: &'a AgentRequest<H>, call: &'a AgentCall, poll: bool, tolerated: u32) -> Self {
        Self {
            request,
            call,
            poll,
            phase: Phase::Sending,
            tolerance: ErrorTolerance::new(tolerated),
        }
    }

    fn into_value(self) -> Option<Value> {
        match self.phase {
            Phase::Done(value) => Some(value),
            _ => None,
        }
    }
}

#[async_trait]
impl<H: HttpClient> Retryable for TaskPoll<'_, H> {
    type Error = AgentClientError;

    async fn attempt(&mut self) -> Attempt<AgentClientError> {
        let result = match &self.phase {
            Phase::Sending => self.request.send_value(self.call).await,
            Phase::Polling { task_id } => {
                self.request.send_value(&AgentCall::get_task(task_id)).await
            }
            Phase::Done(_) => return Attempt::Success,
        };

        let value = match result {
            Ok(value) => value,
            Err(err) if err.is_transport() && self.tolerance.record_failure() => {
                tracing::debug!(
                    method = self.call.method(),
                    consecutive_failures = self.tolerance.consecutive(),
                    error = %err,
                    "Tolerating agent request failure"
                );
                return Attempt::Retry(err);
            }
            Err(err) => return Attempt::Stop(err),
        };
        self.tolerance.reset();

        if !self.poll {
            self.phase = Phase::Done(value);
            return Attempt::Success;
        }

        match TaskValue::classify(value) {
            TaskValue::Running(handle) => {
                tracing::debug!(
                    method = self.call.method(),
                    task_id = %handle.agent_task_id,
                    "Task still running"
                );
                let task_id = handle.agent_task_id;
                self.phase = Phase::Polling {
                    task_id: task_id.clone(),
                };
                Attempt::Retry(AgentClientError::TaskRunning { task_id })
            }
            TaskValue::Final(value) => {
                self.phase = Phase::Done(value);
                Attempt::Success
            }
        }
    }
}

/// Send `call` and poll its task until it produces a final value.
///
/// `delay` is waited between polls and between tolerated failures.
pub(crate) async fn run_task<H: HttpClient>(
    request: &AgentRequest<H>,
    call: &AgentCall,
    delay: Duration,
    tolerated: u32,
) -> Result<Value, AgentClientError> {
    drive(TaskPoll::new(request, call, true, tolerated), call, delay).await
}

/// Send `call` once, tolerating transport failures, without polling.
pub(crate) async fn send_tolerated<H: HttpClient>(
    request: &AgentRequest<H>,
    call: &AgentCall,
    delay: Duration,
    tolerated: u32,
) -> Result<Value, AgentClientError> {
    drive(TaskPoll::new(request, call, false, tolerated), call, delay).await
}

async fn drive<H: HttpClient>(
    mut poll: TaskPoll<'_, H>,
    call: &AgentCall,
    delay: Duration,
) -> Result<Value, AgentClientError> {
    UnlimitedRetryStrategy::new(delay).try_run(&mut poll).await?;
    let value = poll.into_value().unwrap_or(Value::Null);
    tracing::debug!(method = call.method(), "Agent task finished");
    Ok(value)
}
