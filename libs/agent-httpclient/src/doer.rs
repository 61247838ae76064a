// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Request execution

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::request::{PreparedRequest, Response};

/// Default overall request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Executes a single prepared request.
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait RequestDoer: Send + Sync {
    async fn execute(&self, request: PreparedRequest) -> Result<Response, ClientError>;
}

#[async_trait]
impl<T: RequestDoer + ?Sized> RequestDoer for Arc<T> {
    async fn execute(&self, request: PreparedRequest) -> Result<Response, ClientError> {
        (**self).execute(request).await
    }
}

/// Options for building the reqwest-backed transport.
#[derive(Clone, Debug)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Extra trusted CA, PEM encoded.
    pub ca_cert: Option<String>,
    /// Skip certificate verification entirely.
    pub insecure: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            ca_cert: None,
            insecure: false,
        }
    }
}

/// [`RequestDoer`] over a `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestDoer {
    client: reqwest::Client,
}

impl ReqwestDoer {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_options(options: &TransportOptions) -> Result<Self, ClientError> {
        // reqwest is built without a default provider; the first caller
        // installs ring and later calls find it already in place.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut builder = reqwest::Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .danger_accept_invalid_certs(options.insecure);

        if let Some(pem) = &options.ca_cert {
            let cert = reqwest::Certificate::from_pem(pem.as_bytes())
                .map_err(|e| ClientError::Build(Box::new(e)))?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Build(Box::new(e)))?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl RequestDoer for ReqwestDoer {
    async fn execute(&self, request: PreparedRequest) -> Result<Response, ClientError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ClientError::from_reqwest)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(ClientError::from_reqwest)?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
