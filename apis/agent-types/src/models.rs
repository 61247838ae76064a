// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Values exchanged with the agent

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

// ============================================================================
// Blobs and packages
// ============================================================================

/// A content-addressed artifact in the blobstore (source or compiled package).
///
/// Serializes as `{"name", "version", "sha1", "blobstore_id"}`, which is also
/// the shape of each entry in a `compile_package` dependency map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobRef {
    pub name: String,
    pub version: String,
    pub sha1: String,
    pub blobstore_id: String,
}

/// Blob produced by a package compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledPackage {
    pub sha1: String,
    pub blobstore_id: String,
}

/// Final value of a `compile_package` task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilePackageResult {
    pub result: CompiledPackage,
}

// ============================================================================
// Agent state
// ============================================================================

/// Snapshot returned by `get_state`.
///
/// `job_state` is an open set (`"running"`, `"pending"`, `"stopped"`, ...);
/// this crate does not interpret it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    pub job_state: String,
    #[serde(rename = "networks", default)]
    pub network_specs: HashMap<String, NetworkSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default)]
    pub ip: String,
}

// ============================================================================
// Apply
// ============================================================================

/// Desired state handed to the agent by `apply`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplySpec {
    pub deployment: String,
    pub name: String,
    pub index: u32,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub az: Option<String>,
    #[serde(default)]
    pub networks: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<JobSpec>,
    #[serde(default)]
    pub packages: HashMap<String, BlobRef>,
    #[serde(default)]
    pub configuration_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_templates_archive: Option<RenderedTemplatesArchive>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,
    #[serde(default)]
    pub templates: Vec<BlobRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTemplatesArchive {
    pub blobstore_id: String,
    pub sha1: String,
}

// ============================================================================
// Drain
// ============================================================================

/// Kind of drain requested from the agent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DrainType {
    Update,
    Shutdown,
    Status,
}

// ============================================================================
// SSH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshSetupParams {
    pub user: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshCleanupParams {
    pub user_regex: String,
}

/// Result of an `ssh` call. `status` is `"success"` when the agent did the work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshResult {
    #[serde(default)]
    pub command: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_public_key: Option<String>,
}

impl SshResult {
    pub const STATUS_SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::STATUS_SUCCESS
    }
}

// ============================================================================
// Logs, ARP, settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleLogsRequest {
    pub owning_user: String,
    pub log_type: String,
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleLogsResult {
    pub logs_tar_path: String,
    pub sha512: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteArpEntriesParams {
    pub ips: Vec<String>,
}

/// Settings pushed with `update_settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSettingsParams {
    #[serde(default)]
    pub trusted_certs: String,
    #[serde(default)]
    pub disk_associations: Vec<DiskAssociation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskAssociation {
    pub name: String,
    #[serde(rename = "cid")]
    pub disk_cid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn agent_state_reads_networks() {
        let state: AgentState = serde_json::from_value(json!({
            "job_state": "running",
            "networks": {"default": {"ip": "10.0.0.5", "netmask": "255.255.255.0"}},
        }))
        .unwrap();

        assert_eq!(state.job_state, "running");
        assert_eq!(state.network_specs["default"].ip, "10.0.0.5");
    }

    #[test]
    fn agent_state_without_networks() {
        let state: AgentState = serde_json::from_value(json!({"job_state": "pending"})).unwrap();
        assert!(state.network_specs.is_empty());
    }

    #[test]
    fn blob_ref_matches_dependency_shape() {
        let blob = BlobRef {
            name: "libyaml".to_string(),
            version: "1.2".to_string(),
            sha1: "abc".to_string(),
            blobstore_id: "blob-1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&blob).unwrap(),
            json!({"name": "libyaml", "version": "1.2", "sha1": "abc", "blobstore_id": "blob-1"})
        );
    }

    #[test]
    fn drain_type_strings() {
        let update: &str = DrainType::Update.as_ref();
        assert_eq!(update, "update");
        assert_eq!(DrainType::Shutdown.to_string(), "shutdown");
        assert_eq!("status".parse::<DrainType>().unwrap(), DrainType::Status);
    }

    #[test]
    fn apply_spec_omits_absent_optionals() {
        let spec = ApplySpec {
            deployment: "dep".to_string(),
            name: "web".to_string(),
            index: 0,
            id: "id-1".to_string(),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&spec).unwrap();
        assert!(encoded.get("job").is_none());
        assert!(encoded.get("az").is_none());
        assert_eq!(encoded["deployment"], "dep");
    }

    #[test]
    fn disk_association_uses_cid_key() {
        let assoc = DiskAssociation {
            name: "data".to_string(),
            disk_cid: "disk-1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&assoc).unwrap(),
            json!({"name": "data", "cid": "disk-1"})
        );
    }
}
