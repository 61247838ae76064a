// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Agent request envelope
//!
//! One logical call: marshal the envelope, POST it, check the status, decode
//! the response envelope, surface any exception, then decode the value.
//! Nothing here retries.

use agent_httpclient::HttpClient;
use agent_types::{AgentCall, ResponseEnvelope};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AgentClientError;

/// Sends [`AgentCall`]s to one agent endpoint.
#[derive(Debug, Clone)]
pub struct AgentRequest<H> {
    endpoint: String,
    reply_to: String,
    http: H,
}

impl<H: HttpClient> AgentRequest<H> {
    pub fn new(endpoint: impl Into<String>, reply_to: impl Into<String>, http: H) -> Self {
        Self {
            endpoint: endpoint.into(),
            reply_to: reply_to.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a call and decode its value into `T`.
    pub async fn send<T: DeserializeOwned>(&self, call: &AgentCall) -> Result<T, AgentClientError> {
        let value = self.send_value(call).await?;
        decode(call.method(), value)
    }

    /// Send a call and return its raw value.
    pub async fn send_value(&self, call: &AgentCall) -> Result<Value, AgentClientError> {
        let payload =
            serde_json::to_vec(&call.message(&self.reply_to)).map_err(AgentClientError::Marshal)?;
        tracing::debug!(method = call.method(), reply_to = %self.reply_to, "Sending agent request");

        let response = self
            .http
            .post_customized(
                &self.endpoint,
                payload,
                Box::new(|request| {
                    request
                        .headers
                        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }),
            )
            .await
            .map_err(AgentClientError::Request)?;

        if response.status != StatusCode::OK {
            tracing::debug!(
                method = call.method(),
                status = response.status.as_u16(),
                "Agent request failed"
            );
            return Err(AgentClientError::Status(response.status.as_u16()));
        }

        let envelope: ResponseEnvelope =
            serde_json::from_slice(&response.body).map_err(AgentClientError::Unmarshal)?;

        envelope
            .into_value()
            .map_err(|exception| AgentClientError::Exception(exception.message))
    }
}

/// Decode a final value into the type an operation expects.
pub(crate) fn decode<T: DeserializeOwned>(
    method: &'static str,
    value: Value,
) -> Result<T, AgentClientError> {
    serde_json::from_value(value).map_err(|source| AgentClientError::Decode { method, source })
}
