// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! HTTP transport for agent clients.
//!
//! The layering, bottom up:
//!
//! - [`RequestDoer`] executes one prepared request. [`ReqwestDoer`] is the
//!   real implementation; tests substitute their own.
//! - [`RequestRetryable`] makes one attempt per call, buffering the request
//!   body once so every retry sends the same bytes.
//! - [`RetryClient`] drives a [`RequestRetryable`] with an attempt-bounded
//!   strategy and is itself a [`RequestDoer`].
//! - [`HttpClient`] is the endpoint-level API (`post`, `post_customized`,
//!   `get`) consumed by the agent client.
//!
//! # Modules
//!
//! - [`client`] - [`HttpClient`] trait and [`DefaultHttpClient`]
//! - [`doer`] - [`RequestDoer`] seam and the reqwest implementation
//! - [`error`] - Transport error taxonomy
//! - [`request`] - Request and response model
//! - [`retry_client`] - [`RetryClient`]
//! - [`retryable`] - [`RequestRetryable`]

pub mod client;
pub mod doer;
pub mod error;
pub mod request;
pub mod retry_client;
pub mod retryable;

pub use client::{DefaultHttpClient, HttpClient, RequestCustomizer};
pub use doer::{ReqwestDoer, RequestDoer, TransportOptions};
pub use error::{BoxError, ClientError, certificate_failure, is_certificate_message};
pub use request::{PreparedRequest, Request, RequestBody, Response};
pub use retry_client::RetryClient;
pub use retryable::RequestRetryable;
