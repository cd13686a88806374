//! Action routing
//!
//! Maps the `Action` of a discovery request (and, for `GetResourceId`, its
//! `ResourceType`) to exactly one handler. Parameters are normalized once,
//! before any provider call.

use super::generic;
use super::handlers;
use super::params::{normalize, RawParameters};
use super::registry::{all_kind_names, ResourceKind};
use crate::error::{Error, Result};
use crate::ucloud::provider::Provider;
use std::fmt;
use std::str::FromStr;

/// Discovery actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetResourceId,
    GetMetricName,
    GetProjectId,
    GetRegion,
    GetResourceType,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::GetResourceId => "GetResourceId",
            Action::GetMetricName => "GetMetricName",
            Action::GetProjectId => "GetProjectId",
            Action::GetRegion => "GetRegion",
            Action::GetResourceType => "GetResourceType",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GetResourceId" => Ok(Action::GetResourceId),
            "GetMetricName" => Ok(Action::GetMetricName),
            "GetProjectId" => Ok(Action::GetProjectId),
            "GetRegion" => Ok(Action::GetRegion),
            "GetResourceType" => Ok(Action::GetResourceType),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

/// A discovery request resolved to its handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ResourceIds(ResourceKind),
    MetricNames(String),
    ProjectIds,
    Regions,
    ResourceTypes,
}

/// Resolve a request without calling the provider.
pub fn resolve(raw: &RawParameters) -> Result<Route> {
    let action: Action = raw.get("Action").ok_or(Error::MissingAction)?.parse()?;

    match action {
        Action::GetResourceId => {
            // An absent kind is reported like any other unknown kind
            let kind = raw.get("ResourceType").map(String::as_str).unwrap_or_default();
            kind.parse::<ResourceKind>()
                .map(Route::ResourceIds)
                .map_err(Error::UnknownResourceType)
        }
        Action::GetMetricName => raw
            .get("ResourceType")
            .cloned()
            .map(Route::MetricNames)
            .ok_or(Error::MissingResourceType),
        Action::GetProjectId => Ok(Route::ProjectIds),
        Action::GetRegion => Ok(Route::Regions),
        Action::GetResourceType => Ok(Route::ResourceTypes),
    }
}

/// Serve one discovery request.
pub async fn route(provider: &dyn Provider, raw: &RawParameters) -> Result<Vec<String>> {
    let route = resolve(raw)?;
    tracing::debug!("discovery route: {:?}", route);

    match route {
        Route::ResourceIds(kind) => {
            let params = normalize(raw, kind)?;
            handlers::list_resource_ids(provider, kind, &params).await
        }
        Route::MetricNames(resource_type) => {
            generic::list_metric_names(provider, &resource_type).await
        }
        Route::ProjectIds => handlers::list_project_ids(provider).await,
        Route::Regions => handlers::list_region_names(provider).await,
        Route::ResourceTypes => Ok(all_kind_names()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::MockProvider;
    use serde_json::json;

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_action_makes_no_call() {
        let provider = MockProvider::responding(json!({}));
        let err = route(&provider, &raw(&[("ResourceType", "uhost")]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingAction));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_action_rejected() {
        let provider = MockProvider::responding(json!({}));
        let err = route(&provider, &raw(&[("Action", "DeleteEverything")]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "got invalid Action DeleteEverything");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_resource_type_rejected() {
        let provider = MockProvider::responding(json!({}));
        let err = route(
            &provider,
            &raw(&[("Action", "GetResourceId"), ("ResourceType", "uhadoop")]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::UnknownResourceType(ref k) if k == "uhadoop"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resource_id_without_type_is_unknown_type() {
        let provider = MockProvider::responding(json!({}));
        let err = route(&provider, &raw(&[("Action", "GetResourceId")]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownResourceType(ref k) if k.is_empty()));
        assert_eq!(err.to_string(), "got invalid ResourceType ");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_limit_makes_no_call() {
        let provider = MockProvider::responding(json!({"EIPSet": []}));
        let err = route(
            &provider,
            &raw(&[
                ("Action", "GetResourceId"),
                ("ResourceType", "eip"),
                ("Limit", "lots"),
            ]),
        )
        .await
        .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resource_types_need_no_provider() {
        let provider = MockProvider::responding(json!({}));
        let kinds = route(&provider, &raw(&[("Action", "GetResourceType")]))
            .await
            .unwrap();
        assert_eq!(kinds.len(), 17);
        assert!(kinds.contains(&"ulb-vserver".to_string()));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_metric_names_require_resource_type() {
        let provider = MockProvider::responding(json!({"DataSet": []}));
        let err = route(&provider, &raw(&[("Action", "GetMetricName")]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "must set ResourceType");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_routes_to_kind_handler() {
        let provider = MockProvider::responding(json!({
            "DataSet": [{"DBId": "udb-1", "Tag": "x"}, {"DBId": "udb-2", "Tag": "y"}]
        }));
        let ids = route(
            &provider,
            &raw(&[
                ("Action", "GetResourceId"),
                ("ResourceType", "udb"),
                ("ClassType", "sql"),
                ("Tag", "y"),
            ]),
        )
        .await
        .unwrap();
        assert_eq!(ids, vec!["udb-2"]);

        let call = &provider.calls()[0];
        assert_eq!(call.action, "DescribeUDBInstance");
        assert_eq!(call.get_str("ClassType"), Some("sql"));
    }

    #[tokio::test]
    async fn test_repeated_request_is_identical() {
        let provider = MockProvider::responding(json!({
            "PHostSet": [{"PHostId": "p1"}, {"PHostId": "p2"}, {"PHostId": "p3"}]
        }));
        let request = raw(&[("Action", "GetResourceId"), ("ResourceType", "phost")]);

        let first = route(&provider, &request).await.unwrap();
        let second = route(&provider, &request).await.unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_action_round_trip() {
        for action in [
            Action::GetResourceId,
            Action::GetMetricName,
            Action::GetProjectId,
            Action::GetRegion,
            Action::GetResourceType,
        ] {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }
}
