// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Time-bounded waits on an agent

use std::time::Duration;

use agent_retry::{RetryStrategy, TimeoutRetryStrategy};
use agent_types::AgentState;

use crate::client::AgentClient;
use crate::error::AgentClientError;
use crate::retryable::{GetStateRetryable, PingRetryable};

/// Ping the agent until it answers or `timeout` runs out.
pub async fn wait_until_ready<C: AgentClient + ?Sized>(
    client: &C,
    timeout: Duration,
    delay: Duration,
) -> Result<(), AgentClientError> {
    let mut ping = PingRetryable::new(client);
    TimeoutRetryStrategy::new(timeout, delay)
        .try_run(&mut ping)
        .await
}

/// Wait for the agent to leave the pending job state.
pub async fn wait_for_state<C: AgentClient + ?Sized>(
    client: &C,
    timeout: Duration,
    delay: Duration,
) -> Result<AgentState, AgentClientError> {
    let mut get_state = GetStateRetryable::new(client);
    TimeoutRetryStrategy::new(timeout, delay)
        .try_run(&mut get_state)
        .await?;
    Ok(get_state.into_state().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agent_httpclient::ClientError;
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

    #[tokio::test(start_paused = true)]
    async fn ready_after_failures() {
        let http = Arc::new(ScriptedHttp::new(vec![
            disconnect(),
            disconnect(),
            value(json!("pong")),
        ]));

        wait_until_ready(
            &client(&http),
            Duration::from_secs(10),
            Duration::from_millis(500),
        )
        .await
        .unwrap();

        assert_eq!(http.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_times_out() {
        let http = Arc::new(ScriptedHttp::new(vec![]));

        let err = wait_until_ready(
            &client(&http),
            Duration::from_secs(2),
            Duration::from_millis(500),
        )
        .await
        .unwrap_err();

        assert!(err.is_transport(), "{err}");
        assert_eq!(http.request_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_stops_on_certificate_error() {
        let http = Arc::new(ScriptedHttp::new(vec![Err(ClientError::Certificate(
            "invalid peer certificate: Expired".to_string(),
        ))]));

        let err = wait_until_ready(
            &client(&http),
            Duration::from_secs(10),
            Duration::from_millis(500),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AgentClientError::Certificate(_)), "{err}");
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn state_after_pending() {
        let http = Arc::new(ScriptedHttp::new(vec![
            value(json!({"job_state": "pending"})),
            value(json!({"job_state": "pending"})),
            value(json!({"job_state": "running", "networks": {}})),
        ]));

        let state = wait_for_state(
            &client(&http),
            Duration::from_secs(10),
            Duration::from_millis(100),
        )
        .await
        .unwrap();

        assert_eq!(state.job_state, "running");
        assert_eq!(http.request_count(), 3);
    }
}
