// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! One HTTP request attempt per call

use agent_retry::{Attempt, Retryable};
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::doer::RequestDoer;
use crate::error::ClientError;
use crate::request::{PreparedRequest, Request, Response};

/// Makes exactly one request attempt each time [`Retryable::attempt`] is
/// called.
///
/// On the first attempt a request id is generated for log correlation and
/// the body, if any, is read into memory. Every attempt sends the same
/// buffered bytes. Transport failures and non-2xx responses both ask for a
/// retry; only a 2xx response succeeds.
///
/// One instance serves one logical request.
pub struct RequestRetryable<'a, D: ?Sized> {
    request: Request,
    body: Option<Bytes>,
    delegate: &'a D,
    attempt: u32,
    request_id: Option<Uuid>,
    response: Option<Response>,
}

impl<'a, D: RequestDoer + ?Sized> RequestRetryable<'a, D> {
    pub fn new(request: Request, delegate: &'a D) -> Self {
        Self {
            request,
            body: None,
            delegate,
            attempt: 0,
            request_id: None,
            response: None,
        }
    }

    /// Correlation id, assigned on the first attempt.
    pub fn request_id(&self) -> Option<Uuid> {
        self.request_id
    }

    /// Number of attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Response from the most recent attempt, if the server answered.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }

    async fn prepare(&mut self) -> Result<(Uuid, PreparedRequest), ClientError> {
        let request_id = match self.request_id {
            Some(id) => id,
            None => {
                if let Some(body) = self.request.body.take() {
                    self.body = Some(body.into_bytes().await.map_err(ClientError::ReadBody)?);
                }
                let id = Uuid::new_v4();
                self.request_id = Some(id);
                id
            }
        };

        let prepared = PreparedRequest {
            method: self.request.method.clone(),
            url: self.request.url.clone(),
            headers: self.request.headers.clone(),
            body: self.body.clone(),
        };
        Ok((request_id, prepared))
    }
}

#[async_trait]
impl<D: RequestDoer + ?Sized> Retryable for RequestRetryable<'_, D> {
    type Error = ClientError;

    async fn attempt(&mut self) -> Attempt<ClientError> {
        let (request_id, prepared) = match self.prepare().await {
            Ok(prepared) => prepared,
            // The body is gone; another attempt has nothing to send.
            Err(err) => return Attempt::Stop(err),
        };
        self.attempt += 1;

        tracing::debug!(
            request_id = %request_id,
            attempt = self.attempt,
            method = %prepared.method,
            url = %prepared.url,
            "Sending request"
        );

        match self.delegate.execute(prepared).await {
            Ok(response) => {
                tracing::debug!(
                    request_id = %request_id,
                    attempt = self.attempt,
                    status = %response.status,
                    "Received response"
                );
                let status = response.status;
                self.response = Some(response);
                if status.is_success() {
                    Attempt::Success
                } else {
                    Attempt::Retry(ClientError::UnexpectedStatus { status })
                }
            }
            Err(err) => {
                tracing::debug!(
                    request_id = %request_id,
                    attempt = self.attempt,
                    error = %err,
                    "Request failed"
                );
                self.response = None;
                Attempt::Retry(err)
            }
        }
    }
}
