//! Provider invocation primitive
//!
//! Every call to UCloud, typed or not, is an action-tagged key/value payload
//! handed to a [`Provider`]. Typed handlers build the payload by serializing a
//! request struct; the few actions without typed bindings build the map by
//! hand. Both end up at the same `invoke`.

use crate::error::TransportError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// An action-tagged request payload
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub action: String,
    pub params: Map<String, Value>,
}

impl ApiRequest {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            params: Map::new(),
        }
    }

    /// Build a request from a typed request body.
    ///
    /// The body must serialize to a JSON object; `None` fields should be
    /// skipped by the body's serde attributes.
    pub fn typed<T: Serialize>(action: &str, body: &T) -> Result<Self, TransportError> {
        let encode_err = |source: serde_json::Error| TransportError::Encode {
            action: action.to_string(),
            source,
        };

        match serde_json::to_value(body).map_err(encode_err)? {
            Value::Object(params) => Ok(Self {
                action: action.to_string(),
                params,
            }),
            Value::Null => Ok(Self::new(action)),
            other => Err(encode_err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "request body must be an object, got {other}"
            )))),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.params.insert(key.to_string(), value.into());
    }

    pub fn set_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.set(key, v);
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.params.get(key).and_then(Value::as_i64)
    }

    /// Flatten the payload into the form fields UCloud expects.
    ///
    /// Lists become `Key.0`, `Key.1`, ...; nested objects become
    /// `Key.N.Field`. `Action` is always included.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut fields = vec![("Action".to_string(), self.action.clone())];
        for (key, value) in &self.params {
            if key == "Action" {
                continue;
            }
            flatten_into(&mut fields, key, value);
        }
        fields
    }
}

fn flatten_into(fields: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => fields.push((key.to_string(), s.clone())),
        Value::Bool(b) => fields.push((key.to_string(), b.to_string())),
        Value::Number(n) => fields.push((key.to_string(), n.to_string())),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                flatten_into(fields, &format!("{key}.{idx}"), item);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten_into(fields, &format!("{key}.{sub}"), item);
            }
        }
    }
}

/// Something that can execute a UCloud API action.
///
/// Implementations must be safe to share across concurrent metric sub-tasks.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Invoke an action and return the decoded JSON response body.
    async fn invoke(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

/// Invoke an action and decode its response into `T`.
pub async fn invoke_as<T: DeserializeOwned>(
    provider: &dyn Provider,
    request: ApiRequest,
) -> Result<T, TransportError> {
    let action = request.action.clone();
    let response = provider.invoke(request).await?;
    serde_json::from_value(response).map_err(|e| TransportError::decode(&action, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Body {
        region: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        limit: i64,
    }

    #[test]
    fn test_typed_skips_absent_fields() {
        let body = Body {
            region: "cn-bj2".to_string(),
            tag: None,
            limit: 20,
        };
        let req = ApiRequest::typed("DescribeEIP", &body).unwrap();
        assert_eq!(req.action, "DescribeEIP");
        assert_eq!(req.get_str("Region"), Some("cn-bj2"));
        assert_eq!(req.get_i64("Limit"), Some(20));
        assert!(!req.params.contains_key("Tag"));
    }

    #[test]
    fn test_typed_rejects_non_object_body() {
        assert!(ApiRequest::typed("GetRegion", &vec![1, 2]).is_err());
    }

    #[test]
    fn test_to_form_flattens_lists() {
        let req = ApiRequest::new("GetMetric")
            .with("MetricName", json!(["cpu", "mem"]))
            .with("BeginTime", 100)
            .with("Skip", Value::Null);

        let form = req.to_form();
        assert!(form.contains(&("Action".to_string(), "GetMetric".to_string())));
        assert!(form.contains(&("MetricName.0".to_string(), "cpu".to_string())));
        assert!(form.contains(&("MetricName.1".to_string(), "mem".to_string())));
        assert!(form.contains(&("BeginTime".to_string(), "100".to_string())));
        assert!(!form.iter().any(|(k, _)| k == "Skip"));
    }
}
