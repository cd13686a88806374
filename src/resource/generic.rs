//! Raw-payload handlers
//!
//! A couple of actions have no typed binding. They are invoked with a
//! hand-built payload and decode only the fields we read.

use super::params::NormalizedListParams;
use super::registry::ResourceDef;
use crate::error::Result;
use crate::ucloud::provider::{invoke_as, ApiRequest, Provider};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ShareBandwidth {
    #[serde(rename = "ShareBandwidthId", default)]
    share_bandwidth_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescribeShareBandwidthResponse {
    #[serde(rename = "DataSet", default)]
    data_set: Vec<ShareBandwidth>,
}

#[derive(Debug, Deserialize)]
struct ResourceMetric {
    #[serde(rename = "MetricName", default)]
    metric_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescribeResourceMetricResponse {
    #[serde(rename = "DataSet", default)]
    data_set: Vec<ResourceMetric>,
}

/// List ids for a kind without typed bindings.
///
/// Only shared bandwidth goes through here. Its records carry no tag, so the
/// tag parameter is not applied.
pub async fn list_raw_ids(
    provider: &dyn Provider,
    def: &ResourceDef,
    params: &NormalizedListParams,
) -> Result<Vec<String>> {
    let mut request = ApiRequest::new(def.action)
        .with("Limit", params.limit)
        .with("Offset", params.offset);
    request.set_opt("Region", params.region.as_deref());
    request.set_opt("ProjectId", params.project_id.as_deref());

    let response: DescribeShareBandwidthResponse = invoke_as(provider, request)
        .await
        .map_err(|e| {
            tracing::error!("do {} got err: {}", def.action, e);
            e
        })?;

    let ids: Vec<String> = response
        .data_set
        .into_iter()
        .filter_map(|item| item.share_bandwidth_id)
        .collect();
    tracing::debug!("{} ids: {:?}", def.action, ids);
    Ok(ids)
}

/// List the metric names available for a resource type
pub async fn list_metric_names(provider: &dyn Provider, resource_type: &str) -> Result<Vec<String>> {
    let request = ApiRequest::new("DescribeResourceMetric").with("ResourceType", resource_type);

    let response: DescribeResourceMetricResponse = invoke_as(provider, request)
        .await
        .map_err(|e| {
            tracing::error!("DescribeResourceMetric failed: {}", e);
            e
        })?;

    Ok(response
        .data_set
        .into_iter()
        .filter_map(|item| item.metric_name)
        .collect())
}
