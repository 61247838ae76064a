// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Agent client errors

use std::error::Error as StdError;

use agent_httpclient::{ClientError, is_certificate_message};
use thiserror::Error;

/// Errors returned by agent client operations.
#[derive(Debug, Error)]
pub enum AgentClientError {
    #[error("Marshaling agent request: {0}")]
    Marshal(#[source] serde_json::Error),

    #[error("Performing request to agent: {0}")]
    Request(#[source] ClientError),

    /// Any status other than 200 that the transport hands back. `RetryClient`
    /// turns non-2xx into `Request(UnexpectedStatus)`, so over the default
    /// stack this only carries other 2xx codes.
    #[error("Agent responded with non-successful status code: {0}")]
    Status(u16),

    #[error("Unmarshaling agent response: {0}")]
    Unmarshal(#[source] serde_json::Error),

    /// The agent answered with `{"exception": {"message": ...}}`.
    #[error("Agent responded with error: {0}")]
    Exception(String),

    /// The final value did not have the shape the operation expects.
    #[error("Decoding '{method}' result: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Task {task_id} is still running")]
    TaskRunning { task_id: String },

    #[error("Unable to {action} SSH account with the agent, status was: {status}")]
    Ssh { action: &'static str, status: String },

    #[error("Agent job state is '{job_state}'")]
    Pending { job_state: String },

    #[error("{0}")]
    Certificate(String),
}

impl AgentClientError {
    /// Failures of the round trip itself, as opposed to answers from the
    /// agent. Only these count against an operation's error tolerance.
    pub fn is_transport(&self) -> bool {
        matches!(self, AgentClientError::Request(_) | AgentClientError::Status(_))
    }

    /// The innermost certificate failure in this error's chain, if any.
    pub fn certificate_message(&self) -> Option<String> {
        let mut found = None;
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);

        while let Some(err) = current {
            if let Some(ClientError::Certificate(message)) = err.downcast_ref::<ClientError>() {
                found = Some(message.clone());
            } else if let Some(AgentClientError::Certificate(message)) =
                err.downcast_ref::<AgentClientError>()
            {
                found = Some(message.clone());
            } else {
                let rendered = err.to_string();
                if is_certificate_message(&rendered) {
                    found = Some(rendered);
                }
            }
            current = err.source();
        }

        found
    }
}
