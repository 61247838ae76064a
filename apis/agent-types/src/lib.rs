// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Wire types for the VM agent RPC protocol.
//!
//! Every request to an agent is a single JSON object POSTed to the agent's
//! `/agent` endpoint:
//!
//! ```text
//! {"method": "<name>", "arguments": [ ... ], "reply_to": "<id>"}
//! ```
//!
//! and every response is either `{"value": <any>}` or
//! `{"exception": {"message": "<string>"}}`. Long-running methods answer with
//! a task handle (`{"agent_task_id": "...", "state": "running"}`) that the
//! caller polls with `get_task` until a non-running value comes back.
//!
//! # Modules
//!
//! - [`envelope`] - Request/response envelopes and the positional [`Argument`]
//! - [`calls`] - One constructor per wire method, fixing argument order
//! - [`task`] - Task handle discrimination
//! - [`models`] - Values exchanged with the agent (blobs, state, apply spec)

pub mod calls;
pub mod envelope;
pub mod models;
pub mod task;

pub use calls::AgentCall;
pub use envelope::{AgentException, AgentRequestMessage, Argument, ResponseEnvelope};
pub use models::{
    AgentState, ApplySpec, BlobRef, BundleLogsRequest, BundleLogsResult, CompilePackageResult,
    CompiledPackage, DeleteArpEntriesParams, DiskAssociation, DrainType, JobSpec, NetworkSpec,
    RenderedTemplatesArchive, SshCleanupParams, SshResult, SshSetupParams, UpdateSettingsParams,
};
pub use task::{TaskHandle, TaskValue};
