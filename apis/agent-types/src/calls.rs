// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Wire method constructors
//!
//! The agent matches arguments by position, so the order and shape of each
//! method's argument list is part of the protocol. Each method has exactly one
//! constructor here; nothing else builds argument lists.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::envelope::{AgentRequestMessage, Argument};
use crate::models::{
    ApplySpec, BlobRef, BundleLogsRequest, DeleteArpEntriesParams, DrainType, SshCleanupParams,
    SshSetupParams, UpdateSettingsParams,
};

/// A method name together with its ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentCall {
    method: &'static str,
    arguments: Vec<Argument>,
}

impl AgentCall {
    fn new(method: &'static str, arguments: Vec<Argument>) -> Self {
        Self { method, arguments }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Borrow this call as a request envelope addressed from `reply_to`.
    pub fn message<'a>(&'a self, reply_to: &'a str) -> AgentRequestMessage<'a> {
        AgentRequestMessage {
            method: self.method,
            arguments: &self.arguments,
            reply_to,
        }
    }

    pub fn ping() -> Self {
        Self::new("ping", vec![])
    }

    pub fn get_task(task_id: &str) -> Self {
        Self::new("get_task", vec![task_id.into()])
    }

    pub fn stop() -> Self {
        Self::new("stop", vec![])
    }

    pub fn start() -> Self {
        Self::new("start", vec![])
    }

    pub fn apply(spec: &ApplySpec) -> Result<Self, serde_json::Error> {
        Ok(Self::new("apply", vec![Argument::object(spec)?]))
    }

    pub fn drain(drain_type: DrainType, params: &Map<String, Value>) -> Self {
        Self::new(
            "drain",
            vec![
                drain_type.to_string().into(),
                Argument::Object(Value::Object(params.clone())),
            ],
        )
    }

    pub fn get_state() -> Self {
        Self::new("get_state", vec![])
    }

    pub fn list_disk() -> Self {
        Self::new("list_disk", vec![])
    }

    pub fn mount_disk(disk_cid: &str) -> Self {
        Self::new("mount_disk", vec![disk_cid.into()])
    }

    pub fn unmount_disk(disk_cid: &str) -> Self {
        Self::new("unmount_disk", vec![disk_cid.into()])
    }

    pub fn migrate_disk() -> Self {
        Self::new("migrate_disk", vec![])
    }

    pub fn add_persistent_disk(disk_cid: &str, device_path: &str) -> Self {
        Self::new(
            "add_persistent_disk",
            vec![disk_cid.into(), device_path.into()],
        )
    }

    pub fn remove_persistent_disk(disk_cid: &str) -> Self {
        Self::new("remove_persistent_disk", vec![disk_cid.into()])
    }

    /// `[blobstore_id, sha1, name, version, dependencies]`, where each
    /// dependency is keyed by package name.
    pub fn compile_package(
        package_source: &BlobRef,
        dependencies: &HashMap<String, BlobRef>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            "compile_package",
            vec![
                package_source.blobstore_id.as_str().into(),
                package_source.sha1.as_str().into(),
                package_source.name.as_str().into(),
                package_source.version.as_str().into(),
                Argument::object(dependencies)?,
            ],
        ))
    }

    pub fn delete_arp_entries(ips: &[String]) -> Result<Self, serde_json::Error> {
        let params = DeleteArpEntriesParams { ips: ips.to_vec() };
        Ok(Self::new("delete_arp_entries", vec![Argument::object(&params)?]))
    }

    pub fn run_script(script_name: &str, options: &Map<String, Value>) -> Self {
        Self::new(
            "run_script",
            vec![
                script_name.into(),
                Argument::Object(Value::Object(options.clone())),
            ],
        )
    }

    /// The version goes out as a JSON number, never as a string.
    pub fn sync_dns(blobstore_id: &str, sha1: &str, version: u64) -> Self {
        Self::new(
            "sync_dns",
            vec![blobstore_id.into(), sha1.into(), version.into()],
        )
    }

    pub fn ssh_setup(user: &str, public_key: &str) -> Result<Self, serde_json::Error> {
        let params = SshSetupParams {
            user: user.to_string(),
            public_key: public_key.to_string(),
        };
        Ok(Self::new("ssh", vec!["setup".into(), Argument::object(&params)?]))
    }

    pub fn ssh_cleanup(user_regex: &str) -> Result<Self, serde_json::Error> {
        let params = SshCleanupParams {
            user_regex: user_regex.to_string(),
        };
        Ok(Self::new("ssh", vec!["cleanup".into(), Argument::object(&params)?]))
    }

    pub fn bundle_logs(request: &BundleLogsRequest) -> Result<Self, serde_json::Error> {
        Ok(Self::new("bundle_logs", vec![Argument::object(request)?]))
    }

    pub fn remove_file(path: &str) -> Self {
        Self::new("remove_file", vec![path.into()])
    }

    pub fn update_settings(settings: &UpdateSettingsParams) -> Result<Self, serde_json::Error> {
        Ok(Self::new("update_settings", vec![Argument::object(settings)?]))
    }
}
