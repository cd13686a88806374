//! Metric query model
//!
//! Inbound batch entries, the per-query spec decoded from them, and the
//! per-query result sent back.

use crate::error::{Error, TransportError};
use crate::ucloud::provider::ApiRequest;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Inclusive query window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// One entry of an inbound batch, before its model fields are decoded
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    pub ref_id: String,
    pub time_range: TimeRange,
    #[serde(flatten)]
    pub model: Map<String, Value>,
}

/// Inbound metric batch
#[derive(Debug, Clone, Deserialize)]
pub struct QueryBatch {
    pub queries: Vec<DataQuery>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryModel {
    #[serde(default)]
    project_id: String,
    region: String,
    resource_type: String,
    metric_name: String,
    resource_id: String,
}

/// A single named-metric lookup
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuerySpec {
    pub correlation_id: String,
    /// `None` means the client's default project
    pub project_id: Option<String>,
    pub region: String,
    pub resource_type: String,
    pub resource_id: String,
    pub metric_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DataQuery {
    /// Decode the model fields of this entry.
    pub fn into_spec(self) -> Result<MetricQuerySpec, Error> {
        let model: QueryModel =
            serde_json::from_value(Value::Object(self.model)).map_err(Error::InvalidQuery)?;

        Ok(MetricQuerySpec {
            correlation_id: self.ref_id,
            project_id: Some(model.project_id).filter(|p| !p.is_empty()),
            region: model.region,
            resource_type: model.resource_type,
            resource_id: model.resource_id,
            metric_name: model.metric_name,
            start: self.time_range.from,
            end: self.time_range.to,
        })
    }
}

impl MetricQuerySpec {
    /// Build the `GetMetric` payload. One metric name per call.
    pub fn to_request(&self) -> ApiRequest {
        let mut request = ApiRequest::new("GetMetric")
            .with("Region", self.region.as_str())
            .with("ResourceType", self.resource_type.as_str())
            .with("MetricName", vec![self.metric_name.clone()])
            .with("ResourceId", self.resource_id.as_str())
            .with("BeginTime", self.start.timestamp())
            .with("EndTime", self.end.timestamp());
        request.set_opt("ProjectId", self.project_id.as_deref());
        request
    }
}

/// A single upstream sample
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MetricPoint {
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "Value")]
    pub value: f64,
}

/// `GetMetric` response: metric name to samples
#[derive(Debug, Deserialize)]
pub struct GetMetricResponse {
    #[serde(rename = "DataSets", default)]
    pub data_sets: BTreeMap<String, Vec<MetricPoint>>,
}

/// One named time series, as parallel time and value columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// The queried resource id
    pub name: String,
    pub metric: String,
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Convert upstream samples, keeping their order and values.
    pub fn from_points(
        name: &str,
        metric: &str,
        points: &[MetricPoint],
    ) -> Result<Self, TransportError> {
        let mut times = Vec::with_capacity(points.len());
        let mut values = Vec::with_capacity(points.len());

        for point in points {
            let time = DateTime::from_timestamp(point.timestamp, 0).ok_or_else(|| {
                TransportError::decode(
                    "GetMetric",
                    <serde_json::Error as serde::de::Error>::custom(format!(
                        "timestamp {} out of range",
                        point.timestamp
                    )),
                )
            })?;
            times.push(time);
            values.push(point.value);
        }

        Ok(Self {
            name: name.to_string(),
            metric: metric.to_string(),
            times,
            values,
        })
    }
}

/// Outcome of one query in a batch
#[derive(Debug)]
pub enum MetricQueryResult {
    Series(Vec<TimeSeries>),
    Failed(Error),
}

impl MetricQueryResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, MetricQueryResult::Series(_))
    }

    pub fn series(&self) -> Option<&[TimeSeries]> {
        match self {
            MetricQueryResult::Series(series) => Some(series),
            MetricQueryResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            MetricQueryResult::Series(_) => None,
            MetricQueryResult::Failed(err) => Some(err),
        }
    }
}

impl From<Result<Vec<TimeSeries>, Error>> for MetricQueryResult {
    fn from(result: Result<Vec<TimeSeries>, Error>) -> Self {
        match result {
            Ok(series) => MetricQueryResult::Series(series),
            Err(err) => MetricQueryResult::Failed(err),
        }
    }
}

impl Serialize for MetricQueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            MetricQueryResult::Series(series) => map.serialize_entry("frames", series)?,
            MetricQueryResult::Failed(err) => map.serialize_entry("error", &err.to_string())?,
        }
        map.end()
    }
}

/// Outbound metric batch response
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub results: BTreeMap<String, MetricQueryResult>,
}
