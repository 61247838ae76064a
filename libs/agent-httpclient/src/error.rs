// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Transport errors

use std::error::Error as StdError;

use http::StatusCode;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Substrings that identify a certificate failure when no typed TLS error is
/// available in the chain.
const CERTIFICATE_MARKERS: &[&str] = &["x509:", "invalid peer certificate"];

/// Errors produced by the HTTP transport.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The peer's certificate was rejected. Retrying cannot fix this.
    #[error("Certificate verification failed: {0}")]
    Certificate(String),

    #[error("Connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("Request timed out: {0}")]
    Timeout(#[source] BoxError),

    #[error("Request failed: {0}")]
    Request(#[source] BoxError),

    /// The server answered, but not with a 2xx status.
    #[error("Request failed with status code: {status}")]
    UnexpectedStatus { status: StatusCode },

    #[error("Reading request body: {0}")]
    ReadBody(#[source] std::io::Error),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Building HTTP client: {0}")]
    Build(#[source] BoxError),
}

impl ClientError {
    /// Classify a reqwest error, pulling certificate failures out first.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(message) = certificate_failure(&err) {
            return ClientError::Certificate(message);
        }
        if err.is_timeout() {
            ClientError::Timeout(Box::new(err))
        } else if err.is_connect() {
            ClientError::Connect(Box::new(err))
        } else {
            ClientError::Request(Box::new(err))
        }
    }

    pub fn is_certificate(&self) -> bool {
        matches!(self, ClientError::Certificate(_))
    }
}

pub fn is_certificate_message(message: &str) -> bool {
    CERTIFICATE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Find a certificate failure anywhere in an error chain.
///
/// A typed `rustls::Error::InvalidCertificate` wins; rustls errors usually
/// arrive wrapped in a `std::io::Error`, whose `source()` skips the payload,
/// so those are unwrapped explicitly. Otherwise the innermost error whose
/// message carries a certificate marker is used.
pub fn certificate_failure(err: &(dyn StdError + 'static)) -> Option<String> {
    let mut fallback = None;
    let mut current = Some(err);

    while let Some(e) = current {
        if let Some(tls) = e.downcast_ref::<rustls::Error>() {
            if matches!(tls, rustls::Error::InvalidCertificate(_)) {
                return Some(tls.to_string());
            }
        }
        if let Some(inner) = e
            .downcast_ref::<std::io::Error>()
            .and_then(|io| io.get_ref())
        {
            if let Some(tls @ rustls::Error::InvalidCertificate(_)) =
                inner.downcast_ref::<rustls::Error>()
            {
                return Some(tls.to_string());
            }
        }

        let rendered = e.to_string();
        if is_certificate_message(&rendered) {
            fallback = Some(rendered);
        }
        current = e.source();
    }

    fallback
}
