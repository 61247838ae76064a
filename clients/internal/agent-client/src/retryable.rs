// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Whole-call retry adapters
//!
//! These decide whether an agent call is worth repeating. How often and for
//! how long is up to the [`RetryStrategy`](agent_retry::RetryStrategy) that
//! drives them.

use agent_retry::{Attempt, Retryable};
use agent_types::AgentState;
use async_trait::async_trait;

use crate::client::AgentClient;
use crate::error::AgentClientError;

/// Job state an agent reports while it is still being set up.
pub const JOB_STATE_PENDING: &str = "pending";

/// Pings the agent until it answers.
///
/// Certificate failures stop the retries at once.
pub struct PingRetryable<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: AgentClient + ?Sized> PingRetryable<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: AgentClient + ?Sized> Retryable for PingRetryable<'_, C> {
    type Error = AgentClientError;

    async fn attempt(&mut self) -> Attempt<AgentClientError> {
        match self.client.ping().await {
            Ok(_) => Attempt::Success,
            Err(err) => match err.certificate_message() {
                Some(message) => {
                    tracing::debug!(%message, "Agent certificate rejected, not retrying");
                    Attempt::Stop(AgentClientError::Certificate(message))
                }
                None => Attempt::Retry(err),
            },
        }
    }
}

/// Fetches the agent state until the job is no longer pending.
pub struct GetStateRetryable<'a, C: ?Sized> {
    client: &'a C,
    state: Option<AgentState>,
}

impl<'a, C: AgentClient + ?Sized> GetStateRetryable<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            state: None,
        }
    }

    /// The state from the successful attempt, if there was one.
    pub fn state(&self) -> Option<&AgentState> {
        self.state.as_ref()
    }

    pub fn into_state(self) -> Option<AgentState> {
        self.state
    }
}

#[async_trait]
impl<C: AgentClient + ?Sized> Retryable for GetStateRetryable<'_, C> {
    type Error = AgentClientError;

    async fn attempt(&mut self) -> Attempt<AgentClientError> {
        match self.client.get_state().await {
            Ok(state) if state.job_state == JOB_STATE_PENDING => {
                Attempt::Retry(AgentClientError::Pending {
                    job_state: state.job_state,
                })
            }
            Ok(state) => {
                self.state = Some(state);
                Attempt::Success
            }
            Err(err) => Attempt::Retry(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::time::Duration;

    use agent_httpclient::ClientError;
    use agent_retry::{AttemptRetryStrategy, RetryStrategy};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::client::HttpAgentClient;
    use crate::testing::{ScriptedHttp, disconnect, value};

    fn client(http: &Arc<ScriptedHttp>) -> HttpAgentClient<Arc<ScriptedHttp>> {
        HttpAgentClient::new(
            "http://10.0.0.6:6868/agent",
            "director-1",
            Duration::ZERO,
            0,
            Arc::clone(http),
        )
    }

    #[tokio::test]
    async fn ping_success() {
        let http = Arc::new(ScriptedHttp::new(vec![value(json!("pong"))]));
        let client = client(&http);

        let attempt = PingRetryable::new(&client).attempt().await;

        assert!(matches!(attempt, Attempt::Success));
    }

    #[tokio::test]
    async fn ping_failure_is_retried() {
        let http = Arc::new(ScriptedHttp::new(vec![disconnect(), value(json!("pong"))]));
        let client = client(&http);

        let attempt = PingRetryable::new(&client).attempt().await;

        assert!(attempt.should_retry());
        assert!(attempt.error().is_some_and(AgentClientError::is_transport));
    }

    #[tokio::test]
    async fn ping_certificate_error_stops() {
        let wrapped = io::Error::other(io::Error::other("some error with x509: stuff"));
        let http = Arc::new(ScriptedHttp::new(vec![
            Err(ClientError::Request(Box::new(wrapped))),
            value(json!("pong")),
        ]));
        let client = client(&http);
        let mut ping = PingRetryable::new(&client);

        let err = AttemptRetryStrategy::new(5, Duration::ZERO)
            .try_run(&mut ping)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "some error with x509: stuff");
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn ping_typed_certificate_error_stops() {
        let http = Arc::new(ScriptedHttp::new(vec![Err(ClientError::Certificate(
            "invalid peer certificate: UnknownIssuer".to_string(),
        ))]));
        let client = client(&http);

        let attempt = PingRetryable::new(&client).attempt().await;

        assert!(!attempt.should_retry());
        assert_eq!(
            attempt.error().map(ToString::to_string).as_deref(),
            Some("invalid peer certificate: UnknownIssuer")
        );
    }

    #[tokio::test]
    async fn pending_state_is_retried() {
        let http = Arc::new(ScriptedHttp::new(vec![value(json!({"job_state": "pending"}))]));
        let client = client(&http);
        let mut get_state = GetStateRetryable::new(&client);

        let attempt = get_state.attempt().await;

        assert!(attempt.should_retry());
        assert_eq!(
            attempt.error().map(ToString::to_string).as_deref(),
            Some("Agent job state is 'pending'")
        );
        assert!(get_state.state().is_none());
    }

    #[tokio::test]
    async fn running_state_succeeds() {
        let http = Arc::new(ScriptedHttp::new(vec![value(json!({"job_state": "running"}))]));
        let client = client(&http);
        let mut get_state = GetStateRetryable::new(&client);

        let attempt = get_state.attempt().await;

        assert!(matches!(attempt, Attempt::Success));
        assert_eq!(
            get_state.into_state().map(|s| s.job_state).as_deref(),
            Some("running")
        );
    }

    #[tokio::test]
    async fn get_state_error_is_retried() {
        let http = Arc::new(ScriptedHttp::new(vec![disconnect()]));
        let client = client(&http);

        let attempt = GetStateRetryable::new(&client).attempt().await;

        assert!(attempt.should_retry());
    }
}
