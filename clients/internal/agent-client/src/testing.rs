// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Scripted HTTP client for unit tests

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use agent_httpclient::{ClientError, HttpClient, PreparedRequest, RequestCustomizer, Response};
use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::{Value, json};
use url::Url;

type Scripted = Result<Response, ClientError>;

/// Answers requests from a fixed script and records every request body.
pub(crate) struct ScriptedHttp {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<Value>>,
    content_types: Mutex<Vec<Option<String>>>,
}

impl ScriptedHttp {
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            content_types: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn content_types(&self) -> Vec<Option<String>> {
        self.content_types.lock().unwrap().clone()
    }

    fn next(&self, payload: &[u8]) -> Scripted {
        let body = serde_json::from_slice(payload).unwrap_or(Value::Null);
        self.requests.lock().unwrap().push(body);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(connect_error("script exhausted")))
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn post(&self, _endpoint: &str, payload: Vec<u8>) -> Result<Response, ClientError> {
        self.content_types.lock().unwrap().push(None);
        self.next(&payload)
    }

    async fn post_customized(
        &self,
        endpoint: &str,
        payload: Vec<u8>,
        customize: RequestCustomizer,
    ) -> Result<Response, ClientError> {
        let mut request = PreparedRequest::new(Method::POST, Url::parse(endpoint).unwrap());
        customize(&mut request);
        let content_type = request
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.content_types.lock().unwrap().push(content_type);
        self.next(&payload)
    }

    async fn get(&self, _endpoint: &str) -> Result<Response, ClientError> {
        self.next(&[])
    }
}

fn connect_error(message: &str) -> ClientError {
    ClientError::Connect(Box::new(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        message.to_string(),
    )))
}

/// `{"value": ...}` with status 200.
pub(crate) fn value(value: Value) -> Scripted {
    Ok(Response::new(
        StatusCode::OK,
        json!({ "value": value }).to_string(),
    ))
}

/// `{"exception": {"message": ...}}` with status 200.
pub(crate) fn exception(message: &str) -> Scripted {
    Ok(Response::new(
        StatusCode::OK,
        json!({ "exception": { "message": message } }).to_string(),
    ))
}

pub(crate) fn status(code: u16) -> Scripted {
    Ok(Response::new(
        StatusCode::from_u16(code).unwrap(),
        "error",
    ))
}

pub(crate) fn disconnect() -> Scripted {
    Err(connect_error("connection reset by peer"))
}

pub(crate) fn raw(body: &str) -> Scripted {
    Ok(Response::new(StatusCode::OK, body.to_string()))
}
