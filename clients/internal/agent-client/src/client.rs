// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Agent client trait and HTTP implementation

use std::collections::HashMap;
use std::time::Duration;

use agent_httpclient::HttpClient;
use agent_types::{
    AgentCall, AgentState, ApplySpec, BlobRef, BundleLogsRequest, BundleLogsResult,
    CompilePackageResult, DrainType, SshResult, UpdateSettingsParams,
};
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AgentClientError;
use crate::request::{AgentRequest, decode};
use crate::task::{run_task, send_tolerated};

/// Operations a VM agent exposes.
///
/// Implementations must be safe to share between tasks; independent calls
/// may run concurrently against the same client.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn ping(&self) -> Result<String, AgentClientError>;

    async fn stop(&self) -> Result<(), AgentClientError>;

    async fn start(&self) -> Result<(), AgentClientError>;

    async fn apply(&self, spec: &ApplySpec) -> Result<(), AgentClientError>;

    async fn drain(
        &self,
        drain_type: DrainType,
        params: &Map<String, Value>,
    ) -> Result<i64, AgentClientError>;

    async fn get_state(&self) -> Result<AgentState, AgentClientError>;

    async fn list_disk(&self) -> Result<Vec<String>, AgentClientError>;

    async fn mount_disk(&self, disk_cid: &str) -> Result<(), AgentClientError>;

    async fn unmount_disk(&self, disk_cid: &str) -> Result<(), AgentClientError>;

    async fn migrate_disk(&self) -> Result<(), AgentClientError>;

    async fn add_persistent_disk(
        &self,
        disk_cid: &str,
        device_path: &str,
    ) -> Result<(), AgentClientError>;

    async fn remove_persistent_disk(&self, disk_cid: &str) -> Result<(), AgentClientError>;

    /// Compile `source` on the agent and return a reference to the result.
    async fn compile_package(
        &self,
        source: &BlobRef,
        dependencies: &HashMap<String, BlobRef>,
    ) -> Result<BlobRef, AgentClientError>;

    async fn delete_arp_entries(&self, ips: &[String]) -> Result<(), AgentClientError>;

    /// Agents that predate `run_script` are treated as having run it.
    async fn run_script(
        &self,
        script_name: &str,
        options: &Map<String, Value>,
    ) -> Result<(), AgentClientError>;

    async fn sync_dns(
        &self,
        blobstore_id: &str,
        sha1: &str,
        version: u64,
    ) -> Result<String, AgentClientError>;

    async fn set_up_ssh(&self, user: &str, public_key: &str)
    -> Result<SshResult, AgentClientError>;

    async fn clean_up_ssh(&self, user_regex: &str) -> Result<SshResult, AgentClientError>;

    async fn bundle_logs(
        &self,
        owning_user: &str,
        log_type: &str,
        filters: &[String],
    ) -> Result<BundleLogsResult, AgentClientError>;

    async fn remove_file(&self, path: &str) -> Result<(), AgentClientError>;

    async fn update_settings(
        &self,
        settings: &UpdateSettingsParams,
    ) -> Result<(), AgentClientError>;
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// [`AgentClient`] that talks to one agent's `/agent` endpoint.
///
/// Task operations and `get_state` tolerate `tolerated_error_count`
/// consecutive transport failures, waiting `get_task_delay` between round
/// trips. The count belongs to a single operation, so concurrent calls never
/// share it.
#[derive(Debug, Clone)]
pub struct HttpAgentClient<H> {
    request: AgentRequest<H>,
    get_task_delay: Duration,
    tolerated_error_count: u32,
}

impl<H: HttpClient> HttpAgentClient<H> {
    pub fn new(
        endpoint: impl Into<String>,
        director_id: impl Into<String>,
        get_task_delay: Duration,
        tolerated_error_count: u32,
        http: H,
    ) -> Self {
        Self {
            request: AgentRequest::new(endpoint, director_id, http),
            get_task_delay,
            tolerated_error_count,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.request.endpoint()
    }

    async fn task(&self, call: &AgentCall) -> Result<Value, AgentClientError> {
        run_task(
            &self.request,
            call,
            self.get_task_delay,
            self.tolerated_error_count,
        )
        .await
    }

    async fn ssh(&self, action: &'static str, call: &AgentCall) -> Result<SshResult, AgentClientError> {
        let result: SshResult = self.request.send(call).await?;
        if !result.is_success() {
            return Err(AgentClientError::Ssh {
                action,
                status: result.status,
            });
        }
        Ok(result)
    }
}

#[async_trait]
impl<H: HttpClient> AgentClient for HttpAgentClient<H> {
    async fn ping(&self) -> Result<String, AgentClientError> {
        self.request.send(&AgentCall::ping()).await
    }

    async fn stop(&self) -> Result<(), AgentClientError> {
        self.task(&AgentCall::stop()).await?;
        Ok(())
    }

    async fn start(&self) -> Result<(), AgentClientError> {
        let _: String = self.request.send(&AgentCall::start()).await?;
        Ok(())
    }

    async fn apply(&self, spec: &ApplySpec) -> Result<(), AgentClientError> {
        let call = AgentCall::apply(spec).map_err(AgentClientError::Marshal)?;
        self.task(&call).await?;
        Ok(())
    }

    async fn drain(
        &self,
        drain_type: DrainType,
        params: &Map<String, Value>,
    ) -> Result<i64, AgentClientError> {
        let call = AgentCall::drain(drain_type, params);
        let value = self.task(&call).await?;

        // Agents may report the wait time as a float.
        match (value.as_i64(), value.as_f64()) {
            (Some(seconds), _) => Ok(seconds),
            (None, Some(seconds)) => Ok(seconds as i64),
            _ => decode(call.method(), value),
        }
    }

    async fn get_state(&self) -> Result<AgentState, AgentClientError> {
        let call = AgentCall::get_state();
        let value = send_tolerated(
            &self.request,
            &call,
            self.get_task_delay,
            self.tolerated_error_count,
        )
        .await?;
        decode(call.method(), value)
    }

    async fn list_disk(&self) -> Result<Vec<String>, AgentClientError> {
        self.request.send(&AgentCall::list_disk()).await
    }

    async fn mount_disk(&self, disk_cid: &str) -> Result<(), AgentClientError> {
        self.task(&AgentCall::mount_disk(disk_cid)).await?;
        Ok(())
    }

    async fn unmount_disk(&self, disk_cid: &str) -> Result<(), AgentClientError> {
        self.task(&AgentCall::unmount_disk(disk_cid)).await?;
        Ok(())
    }

    async fn migrate_disk(&self) -> Result<(), AgentClientError> {
        self.task(&AgentCall::migrate_disk()).await?;
        Ok(())
    }

    async fn add_persistent_disk(
        &self,
        disk_cid: &str,
        device_path: &str,
    ) -> Result<(), AgentClientError> {
        self.task(&AgentCall::add_persistent_disk(disk_cid, device_path))
            .await?;
        Ok(())
    }

    async fn remove_persistent_disk(&self, disk_cid: &str) -> Result<(), AgentClientError> {
        self.task(&AgentCall::remove_persistent_disk(disk_cid))
            .await?;
        Ok(())
    }

    async fn compile_package(
        &self,
        source: &BlobRef,
        dependencies: &HashMap<String, BlobRef>,
    ) -> Result<BlobRef, AgentClientError> {
        let call =
            AgentCall::compile_package(source, dependencies).map_err(AgentClientError::Marshal)?;
        let value = self.task(&call).await?;
        let compiled: CompilePackageResult = decode(call.method(), value)?;

        Ok(BlobRef {
            name: source.name.clone(),
            version: source.version.clone(),
            sha1: compiled.result.sha1,
            blobstore_id: compiled.result.blobstore_id,
        })
    }

    async fn delete_arp_entries(&self, ips: &[String]) -> Result<(), AgentClientError> {
        let call = AgentCall::delete_arp_entries(ips).map_err(AgentClientError::Marshal)?;
        self.request.send_value(&call).await?;
        Ok(())
    }

    async fn run_script(
        &self,
        script_name: &str,
        options: &Map<String, Value>,
    ) -> Result<(), AgentClientError> {
        // Only the agent's rejection of run_script itself; a get_task
        // rejection while polling is a real failure.
        const UNKNOWN_RUN_SCRIPT: &str = "unknown message run_script";

        match self.task(&AgentCall::run_script(script_name, options)).await {
            Ok(_) => Ok(()),
            Err(AgentClientError::Exception(message)) if message.contains(UNKNOWN_RUN_SCRIPT) => {
                tracing::debug!(
                    script = script_name,
                    %message,
                    "Agent does not support run_script, skipping"
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn sync_dns(
        &self,
        blobstore_id: &str,
        sha1: &str,
        version: u64,
    ) -> Result<String, AgentClientError> {
        self.request
            .send(&AgentCall::sync_dns(blobstore_id, sha1, version))
            .await
    }

    async fn set_up_ssh(
        &self,
        user: &str,
        public_key: &str,
    ) -> Result<SshResult, AgentClientError> {
        let call = AgentCall::ssh_setup(user, public_key).map_err(AgentClientError::Marshal)?;
        self.ssh("setup", &call).await
    }

    async fn clean_up_ssh(&self, user_regex: &str) -> Result<SshResult, AgentClientError> {
        let call = AgentCall::ssh_cleanup(user_regex).map_err(AgentClientError::Marshal)?;
        self.ssh("cleanup", &call).await
    }

    async fn bundle_logs(
        &self,
        owning_user: &str,
        log_type: &str,
        filters: &[String],
    ) -> Result<BundleLogsResult, AgentClientError> {
        let request = BundleLogsRequest {
            owning_user: owning_user.to_string(),
            log_type: log_type.to_string(),
            filters: filters.to_vec(),
        };
        let call = AgentCall::bundle_logs(&request).map_err(AgentClientError::Marshal)?;
        self.request.send(&call).await
    }

    async fn remove_file(&self, path: &str) -> Result<(), AgentClientError> {
        self.request.send_value(&AgentCall::remove_file(path)).await?;
        Ok(())
    }

    async fn update_settings(
        &self,
        settings: &UpdateSettingsParams,
    ) -> Result<(), AgentClientError> {
        let call = AgentCall::update_settings(settings).map_err(AgentClientError::Marshal)?;
        self.task(&call).await?;
        Ok(())
    }
}
