//! Metric query engine
//!
//! Runs every query of a batch as its own task, waits for all of them, and
//! merges the results by correlation id. A failing query only affects its own
//! entry.

use super::query::{DataQuery, GetMetricResponse, MetricQueryResult, TimeSeries};
use crate::error::{Error, Result};
use crate::ucloud::provider::{invoke_as, Provider};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Execute a batch of metric queries concurrently.
///
/// Returns one entry per query. Tasks are not cancelled once spawned; the
/// call returns only after every task has finished. Entries sharing a
/// correlation id are merged in batch order, so the later one wins.
pub async fn execute(
    provider: Arc<dyn Provider>,
    batch: Vec<DataQuery>,
) -> BTreeMap<String, MetricQueryResult> {
    tracing::info!("executing metric batch of {} queries", batch.len());

    let (ids, tasks): (Vec<String>, Vec<_>) = batch
        .into_iter()
        .map(|query| {
            let id = query.ref_id.clone();
            let provider = Arc::clone(&provider);
            let task = tokio::spawn(async move { run_query(provider.as_ref(), query).await });
            (id, task)
        })
        .unzip();

    let outcomes = join_all(tasks).await;

    let mut results = BTreeMap::new();
    for (id, outcome) in ids.into_iter().zip(outcomes) {
        let result = match outcome {
            Ok(result) => MetricQueryResult::from(result),
            Err(join_err) => {
                tracing::error!("metric query {} task failed: {}", id, join_err);
                MetricQueryResult::Failed(Error::QueryTask(join_err.to_string()))
            }
        };

        if let MetricQueryResult::Failed(err) = &result {
            tracing::warn!("metric query {} failed: {}", id, err);
        }
        if results.insert(id.clone(), result).is_some() {
            tracing::warn!("duplicate correlation id {} in batch, keeping the later query", id);
        }
    }

    results
}

async fn run_query(provider: &dyn Provider, query: DataQuery) -> Result<Vec<TimeSeries>> {
    let spec = query.into_spec()?;
    tracing::debug!(
        "GetMetric {} {} {} [{} .. {}]",
        spec.resource_type,
        spec.resource_id,
        spec.metric_name,
        spec.start,
        spec.end
    );

    let response: GetMetricResponse = invoke_as(provider, spec.to_request()).await?;

    let series = response
        .data_sets
        .iter()
        .map(|(metric, points)| TimeSeries::from_points(&spec.resource_id, metric, points))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{api_error, MockProvider};
    use serde_json::{json, Value};
    use std::time::{Duration, Instant};

    fn entry(ref_id: &str, resource_id: &str) -> DataQuery {
        serde_json::from_value(json!({
            "refId": ref_id,
            "timeRange": {"from": "2024-01-01T00:00:00Z", "to": "2024-01-01T00:05:00Z"},
            "region": "cn-bj2",
            "resourceType": "uhost",
            "metricName": "CPUUtilization",
            "resourceId": resource_id
        }))
        .unwrap()
    }

    fn metric_response(resource_id: &str) -> Value {
        let base = if resource_id == "uhost-3" { 3.0 } else { 1.0 };
        json!({
            "RetCode": 0,
            "DataSets": {
                "CPUUtilization": [
                    {"Timestamp": 1_704_067_200, "Value": base},
                    {"Timestamp": 1_704_067_260, "Value": base + 0.5}
                ]
            }
        })
    }

    fn provider_failing_for(bad: &'static str) -> MockProvider {
        MockProvider::new(move |req| {
            let resource = req.get_str("ResourceId").unwrap_or_default();
            if resource == bad {
                Err(api_error(&req.action, 8039, "resource not found"))
            } else {
                Ok(metric_response(resource))
            }
        })
    }

    #[tokio::test]
    async fn test_failure_isolated_to_one_entry() {
        let provider = Arc::new(provider_failing_for("uhost-2"));
        let batch = vec![
            entry("A", "uhost-1"),
            entry("B", "uhost-2"),
            entry("C", "uhost-3"),
        ];

        let results = execute(provider.clone(), batch).await;
        assert_eq!(results.len(), 3);
        assert!(results["A"].is_ok());
        assert!(results["C"].is_ok());
        assert!(matches!(results["B"].error(), Some(Error::Transport(_))));

        let series = results["C"].series().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "uhost-3");
        assert_eq!(series[0].metric, "CPUUtilization");
        assert_eq!(series[0].values, vec![3.0, 3.5]);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_queries_run_concurrently() {
        let delay = Duration::from_millis(200);
        let provider = Arc::new(provider_failing_for("uhost-2").with_delay(delay));
        let batch = vec![
            entry("A", "uhost-1"),
            entry("B", "uhost-2"),
            entry("C", "uhost-3"),
        ];

        let started = Instant::now();
        let results = execute(provider, batch).await;
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 3);
        // Bounded by the slowest call, not the sum of all three
        assert!(elapsed < delay * 2, "batch took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_malformed_entry_isolated() {
        let provider = Arc::new(MockProvider::new(|req| {
            Ok(metric_response(req.get_str("ResourceId").unwrap_or_default()))
        }));
        let broken: DataQuery = serde_json::from_value(json!({
            "refId": "B",
            "timeRange": {"from": "2024-01-01T00:00:00Z", "to": "2024-01-01T00:05:00Z"},
            "region": "cn-bj2"
        }))
        .unwrap();

        let results = execute(provider.clone(), vec![entry("A", "uhost-1"), broken]).await;
        assert!(results["A"].is_ok());
        assert!(matches!(results["B"].error(), Some(Error::InvalidQuery(_))));
        // The malformed entry never reaches the provider
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let provider = Arc::new(MockProvider::responding(json!({})));
        let results = execute(provider.clone(), Vec::new()).await;
        assert!(results.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_ids_later_entry_wins() {
        let provider = Arc::new(provider_failing_for("uhost-2"));
        let batch = vec![entry("A", "uhost-2"), entry("A", "uhost-1")];

        let results = execute(provider.clone(), batch).await;
        assert_eq!(results.len(), 1);
        assert!(results["A"].is_ok());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_data_sets_is_success() {
        let provider = Arc::new(MockProvider::responding(json!({"RetCode": 0})));
        let results = execute(provider, vec![entry("A", "uhost-1")]).await;
        assert_eq!(results["A"].series().map(<[TimeSeries]>::len), Some(0));
    }
}
