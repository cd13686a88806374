//! UCloud Client
//!
//! Main client for interacting with the UCloud API, combining credentials,
//! request signing and the HTTP transport.

use super::auth::Credentials;
use super::http::UCloudHttpClient;
use super::provider::{ApiRequest, Provider};
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Actions served by backends that routinely take longer than the default timeout
const SLOW_ACTIONS: &[&str] = &["DescribeUHostInstance", "DescribeUDBInstance"];

/// Settings needed to build a [`UCloudClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub user_agent: String,
    pub project_id: Option<String>,
    pub timeout: Duration,
    pub long_timeout: Duration,
}

/// Main UCloud client
#[derive(Clone)]
pub struct UCloudClient {
    pub credentials: Credentials,
    pub http: UCloudHttpClient,
    pub project_id: Option<String>,
    timeout: Duration,
    long_timeout: Duration,
}

impl UCloudClient {
    /// Create a new UCloud client
    pub fn new(credentials: Credentials, options: &ClientOptions) -> Result<Self, TransportError> {
        let http = UCloudHttpClient::new(&options.base_url, &options.user_agent)?;

        Ok(Self {
            credentials,
            http,
            project_id: options.project_id.clone().filter(|p| !p.is_empty()),
            timeout: options.timeout,
            long_timeout: options.long_timeout,
        })
    }

    /// Timeout applied to a given action
    pub fn timeout_for(&self, action: &str) -> Duration {
        if SLOW_ACTIONS.contains(&action) {
            self.long_timeout
        } else {
            self.timeout
        }
    }

    /// Build the signed form fields for a request
    pub fn signed_form(&self, request: &ApiRequest) -> Vec<(String, String)> {
        let mut form = request.to_form();

        // Fall back to the client's default project scope
        if !form.iter().any(|(k, _)| k == "ProjectId") {
            if let Some(project) = &self.project_id {
                form.push(("ProjectId".to_string(), project.clone()));
            }
        }

        form.push(("PublicKey".to_string(), self.credentials.public_key.clone()));
        let signature = self.credentials.sign(&form);
        form.push(("Signature".to_string(), signature));
        form
    }
}

#[async_trait]
impl Provider for UCloudClient {
    async fn invoke(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let form = self.signed_form(&request);
        self.http
            .post_form(&request.action, &form, self.timeout_for(&request.action))
            .await
    }
}
