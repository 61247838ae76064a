// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Configuration for agent clients

use std::path::Path;
use std::time::Duration;

use agent_httpclient::TransportOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Agent client configuration loaded from a JSON file
///
/// Every field is optional in the file; missing fields take the values from
/// [`Default`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentClientConfig {
    /// Sent as `reply_to` on every request
    pub director_id: String,

    /// Wait between task polls, and between tolerated failures
    pub get_task_delay_ms: u64,

    /// Consecutive transport failures an operation survives
    pub tolerated_error_count: u32,

    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,

    pub connect_timeout_secs: u64,

    /// Attempts per HTTP request made by the transport itself
    pub transport_retry_attempts: u32,

    pub transport_retry_delay_ms: u64,

    /// Extra CA certificate (PEM) trusted when talking to agents
    pub ca_cert: Option<String>,

    /// Skip certificate verification entirely
    pub insecure: bool,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self {
            director_id: String::new(),
            get_task_delay_ms: 500,
            tolerated_error_count: 3,
            http_timeout_secs: 30,
            connect_timeout_secs: 10,
            transport_retry_attempts: 1,
            transport_retry_delay_ms: 500,
            ca_cert: None,
            insecure: false,
        }
    }
}

impl AgentClientConfig {
    /// Load configuration from a JSON file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn get_task_delay(&self) -> Duration {
        Duration::from_millis(self.get_task_delay_ms)
    }

    pub fn transport_retry_delay(&self) -> Duration {
        Duration::from_millis(self.transport_retry_delay_ms)
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: Duration::from_secs(self.http_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ca_cert: self.ca_cert.clone(),
            insecure: self.insecure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[tokio::test]
    async fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"director_id": "director-1", "get_task_delay_ms": 0, "insecure": true}}"#
        )
        .unwrap();

        let config = AgentClientConfig::from_file(file.path()).await.unwrap();

        assert_eq!(
            config,
            AgentClientConfig {
                director_id: "director-1".to_string(),
                get_task_delay_ms: 0,
                insecure: true,
                ..AgentClientConfig::default()
            }
        );
        assert_eq!(config.get_task_delay(), Duration::ZERO);
    }

    #[tokio::test]
    async fn invalid_file_names_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "tolerated_error_count = 3").unwrap();

        let err = AgentClientConfig::from_file(file.path()).await.unwrap_err();

        assert!(
            err.to_string().starts_with("Failed to parse config file"),
            "{err}"
        );
    }

    #[tokio::test]
    async fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AgentClientConfig::from_file(&dir.path().join("absent.json"))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to read config file"), "{err}");
    }

    #[test]
    fn transport_options_from_config() {
        let config = AgentClientConfig {
            http_timeout_secs: 5,
            connect_timeout_secs: 2,
            ca_cert: Some("-----BEGIN CERTIFICATE-----".to_string()),
            ..AgentClientConfig::default()
        };

        let options = config.transport_options();

        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.connect_timeout, Duration::from_secs(2));
        assert_eq!(options.ca_cert.as_deref(), Some("-----BEGIN CERTIFICATE-----"));
        assert!(!options.insecure);
    }
}
