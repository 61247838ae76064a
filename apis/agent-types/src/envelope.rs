// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Request and response envelopes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One positional argument of an agent request.
///
/// The agent protocol is positional and untyped, so each slot is one of a
/// small set of JSON shapes. Numbers stay numbers on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    String(String),
    Number(serde_json::Number),
    Object(Value),
}

impl Argument {
    /// Serialize a structured value (map or struct) into an argument slot.
    pub fn object<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Argument::Object)
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::String(s.to_string())
    }
}

impl From<String> for Argument {
    fn from(s: String) -> Self {
        Argument::String(s)
    }
}

impl From<u64> for Argument {
    fn from(n: u64) -> Self {
        Argument::Number(n.into())
    }
}

impl From<i64> for Argument {
    fn from(n: i64) -> Self {
        Argument::Number(n.into())
    }
}

/// The request envelope sent to the agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRequestMessage<'a> {
    pub method: &'a str,
    pub arguments: &'a [Argument],
    pub reply_to: &'a str,
}

/// Exception payload embedded in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentException {
    pub message: String,
}

/// The response envelope returned by the agent.
///
/// The `value` is kept as raw JSON so that the exception can be checked
/// before any operation-specific decoding happens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub exception: Option<AgentException>,
}

impl ResponseEnvelope {
    /// Server-reported exception, if any.
    pub fn server_error(&self) -> Option<&AgentException> {
        self.exception.as_ref()
    }

    /// Split into the value or the exception. An exception always wins over
    /// a value, even when both are present.
    pub fn into_value(self) -> Result<Value, AgentException> {
        match self.exception {
            Some(exception) => Err(exception),
            None => Ok(self.value.unwrap_or(Value::Null)),
        }
    }
}
