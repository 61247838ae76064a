// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Task handle discrimination
//!
//! The protocol does not tag results: a long-running method answers with a
//! value shaped like `{"agent_task_id": "...", "state": "..."}` and the final
//! result is "anything that is not a running task". [`TaskValue::classify`]
//! is the single place that decision is made.
//!
//! A final result that happens to be an object with string `agent_task_id`
//! and `state` keys (state `"running"`) is indistinguishable from a handle.
//! That is a property of the wire protocol and is deliberately kept.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State string an agent reports while a task is in progress.
pub const TASK_STATE_RUNNING: &str = "running";

/// Handle to a task running on the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub agent_task_id: String,
    pub state: String,
}

impl TaskHandle {
    /// Read a handle out of a value, if the value has the task shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let agent_task_id = value.get("agent_task_id")?.as_str()?;
        let state = value.get("state")?.as_str()?;
        Some(Self {
            agent_task_id: agent_task_id.to_string(),
            state: state.to_string(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.state == TASK_STATE_RUNNING
    }
}

/// A decoded `value` from an asynchronous method or from `get_task`.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskValue {
    /// The task is still in progress; poll again with its id.
    Running(TaskHandle),
    /// Terminal value, returned to the caller as-is.
    Final(Value),
}

impl TaskValue {
    pub fn classify(value: Value) -> Self {
        match TaskHandle::from_value(&value) {
            Some(handle) if handle.is_running() => TaskValue::Running(handle),
            _ => TaskValue::Final(value),
        }
    }
}
