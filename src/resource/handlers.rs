//! Resource handlers
//!
//! One listing per [`ResourceKind`]: build the request from normalized
//! parameters, invoke the provider once, then filter the returned records and
//! collect their identifiers in upstream order.

use super::generic;
use super::params::NormalizedListParams;
use super::registry::{RecordFilter, ResourceDef, ResourceKind};
use crate::error::Result;
use crate::ucloud::projects;
use crate::ucloud::provider::{ApiRequest, Provider};
use serde::Serialize;
use serde_json::Value;

/// Typed body shared by every `Describe*` listing action
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    limit: i64,
    offset: i64,
    #[serde(rename = "ULBId", skip_serializing_if = "Option::is_none")]
    ulb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_boot: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol_version: Option<i64>,
}

impl DescribeRequest {
    fn build(def: &ResourceDef, params: &NormalizedListParams) -> Self {
        let disk = def.disk;
        Self {
            project_id: params.project_id.clone(),
            region: params.region.clone().filter(|_| def.regional),
            tag: params.tag.clone().filter(|_| def.tag_upstream),
            limit: params.limit,
            offset: params.offset,
            ulb_id: params.ulb_id.clone(),
            class_type: params.class_type.clone(),
            disk_type: disk.and_then(|d| d.disk_type),
            is_boot: disk.and_then(|d| d.is_boot),
            protocol_version: disk.and_then(|d| d.protocol_version),
        }
    }
}

/// List the identifiers of every `kind` resource matching `params`.
pub async fn list_resource_ids(
    provider: &dyn Provider,
    kind: ResourceKind,
    params: &NormalizedListParams,
) -> Result<Vec<String>> {
    let def = kind.def();
    if def.raw {
        return generic::list_raw_ids(provider, def, params).await;
    }

    let request = ApiRequest::typed(def.action, &DescribeRequest::build(def, params))?;
    let response = provider.invoke(request).await.map_err(|e| {
        tracing::error!("{} listing failed: {}", kind, e);
        e
    })?;

    let ids = extract_ids(&response, def, params.tag.as_deref());
    tracing::debug!("{} ids: {:?}", kind, ids);
    Ok(ids)
}

/// Collect identifiers from a listing response, applying the kind's filter.
pub fn extract_ids(response: &Value, def: &ResourceDef, tag: Option<&str>) -> Vec<String> {
    let Some(records) = response.get(def.record_set).and_then(Value::as_array) else {
        return Vec::new();
    };

    records
        .iter()
        .filter(|record| keep_record(record, def.filter, tag))
        .filter_map(|record| record.get(def.id_field).and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn keep_record(record: &Value, filter: RecordFilter, tag: Option<&str>) -> bool {
    match filter {
        RecordFilter::None => true,
        RecordFilter::Tag => match tag {
            // A record without a tag has the empty tag
            Some(wanted) => record.get("Tag").and_then(Value::as_str).unwrap_or("") == wanted,
            None => true,
        },
        RecordFilter::BootDisk => record.get("IsBoot").and_then(Value::as_str) == Some("True"),
    }
}

/// List project ids visible to the client
pub async fn list_project_ids(provider: &dyn Provider) -> Result<Vec<String>> {
    let projects = projects::list_projects(provider).await?;
    Ok(projects.into_iter().map(|p| p.project_id).collect())
}

/// List region names, each once, in first-seen order
pub async fn list_region_names(provider: &dyn Provider) -> Result<Vec<String>> {
    let regions = projects::list_regions(provider).await?;
    Ok(dedup_first_seen(regions.into_iter().map(|r| r.region)))
}

/// Drop repeats, keeping the first occurrence of each value in order
pub fn dedup_first_seen(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
