//! UCloud account calls
//!
//! Typed bindings for listing the projects and regions visible to the
//! configured key pair.

use super::provider::{invoke_as, ApiRequest, Provider};
use crate::error::TransportError;
use serde::Deserialize;

/// Project information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
}

/// Region/zone pair as returned by `GetRegion`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionInfo {
    pub region: String,
    #[serde(default)]
    pub zone: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetProjectListResponse {
    #[serde(default)]
    project_set: Vec<Project>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetRegionResponse {
    #[serde(default)]
    regions: Vec<RegionInfo>,
}

/// List all accessible projects
pub async fn list_projects(provider: &dyn Provider) -> Result<Vec<Project>, TransportError> {
    let response: GetProjectListResponse =
        invoke_as(provider, ApiRequest::new("GetProjectList")).await?;
    Ok(response.project_set)
}

/// List region/zone pairs. A region appears once per zone it contains.
pub async fn list_regions(provider: &dyn Provider) -> Result<Vec<RegionInfo>, TransportError> {
    let response: GetRegionResponse = invoke_as(provider, ApiRequest::new("GetRegion")).await?;
    Ok(response.regions)
}
