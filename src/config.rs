//! Configuration Management
//!
//! Settings are layered: built-in defaults, then the JSON config file, then
//! `UCLOUD_*` environment variables. CLI flags are applied last by `main`.

use crate::ucloud::auth::Credentials;
use crate::ucloud::client::ClientOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.ucloud.cn";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8090";
pub const DEFAULT_USER_AGENT: &str = "UCloud-monitor-grafana";

/// Adapter configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UCloud API public key
    pub public_key: String,
    /// UCloud API private key
    pub private_key: String,
    /// Default project for requests that do not name one
    pub project_id: Option<String>,
    /// UCloud API endpoint
    pub base_url: String,
    /// Address the HTTP server binds to
    pub listen: String,
    pub timeout_secs: u64,
    /// Timeout for slow listing actions (hosts, databases)
    pub long_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            private_key: String::new(),
            project_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            listen: DEFAULT_LISTEN.to_string(),
            timeout_secs: 30,
            long_timeout_secs: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("credentials", &self.credentials())
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .field("listen", &self.listen)
            .field("timeout_secs", &self.timeout_secs)
            .field("long_timeout_secs", &self.long_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ucmon").join("config.json"))
    }

    /// Load configuration from `path` (or the default path) and the environment.
    ///
    /// Not validated yet: CLI overrides still apply on top, so callers run
    /// [`Config::validate`] once every layer is in.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env(path: Option<&Path>, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(var);
        Ok(config)
    }

    /// Read a JSON config file. A missing or unreadable file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No usable config file at {:?} ({}), using defaults", path, e);
                return Ok(Self::default());
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Override settings from `UCLOUD_*` variables
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("UCLOUD_PUBLIC_KEY") {
            self.public_key = v;
        }
        if let Some(v) = var("UCLOUD_PRIVATE_KEY") {
            self.private_key = v;
        }
        if let Some(v) = var("UCLOUD_PROJECT_ID") {
            self.project_id = Some(v);
        }
        if let Some(v) = var("UCLOUD_API_BASE_URL") {
            self.base_url = v;
        }
    }

    /// Apply command-line overrides, the last layer
    pub fn apply_overrides(
        &mut self,
        listen: Option<&str>,
        project_id: Option<&str>,
        base_url: Option<&str>,
    ) {
        if let Some(listen) = listen {
            self.listen = listen.to_string();
        }
        if let Some(project) = project_id {
            self.project_id = Some(project.to_string());
        }
        if let Some(base_url) = base_url {
            self.base_url = base_url.to_string();
        }
    }

    /// Check values that would only fail later at request time
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base_url {:?}", self.base_url))?;
        if self.timeout_secs == 0 || self.long_timeout_secs == 0 {
            anyhow::bail!("Timeouts must be at least one second");
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.public_key, &self.private_key)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            project_id: self.project_id.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            long_timeout: Duration::from_secs(self.long_timeout_secs),
        }
    }
}
