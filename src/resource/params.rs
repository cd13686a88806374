//! Parameter normalization
//!
//! Turns the untyped query parameters of a discovery request into a validated,
//! defaulted [`NormalizedListParams`]. Pure: no provider call is made here, so
//! a bad `Limit` or `Offset` never reaches the transport.

use super::registry::ResourceKind;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Untyped discovery parameters, one value per key
pub type RawParameters = HashMap<String, String>;

pub const DEFAULT_LIMIT: i64 = 20;
pub const DEFAULT_OFFSET: i64 = 0;

/// Validated listing parameters for one handler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedListParams {
    /// `None` means the client's default project
    pub project_id: Option<String>,
    /// `None` means the client's default region
    pub region: Option<String>,
    /// `None` means no tag filtering; `Some("")` filters on the empty tag
    pub tag: Option<String>,
    pub limit: i64,
    pub offset: i64,
    /// Parent load balancer, only read for `ulb-vserver`
    pub ulb_id: Option<String>,
    /// Database class, only read for `udb`
    pub class_type: Option<String>,
}

impl Default for NormalizedListParams {
    fn default() -> Self {
        Self {
            project_id: None,
            region: None,
            tag: None,
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
            ulb_id: None,
            class_type: None,
        }
    }
}

/// Normalize raw parameters for a listing of `kind`.
pub fn normalize(raw: &RawParameters, kind: ResourceKind) -> Result<NormalizedListParams> {
    let (limit, offset) = pagination(raw)?;

    Ok(NormalizedListParams {
        project_id: raw.get("ProjectId").cloned(),
        region: raw.get("Region").cloned(),
        tag: raw.get("Tag").cloned(),
        limit,
        offset,
        ulb_id: match kind {
            ResourceKind::UlbVServer => raw.get("ULBId").cloned(),
            _ => None,
        },
        class_type: match kind {
            ResourceKind::Udb => raw.get("ClassType").cloned(),
            _ => None,
        },
    })
}

/// Parse `Limit` and `Offset`, applying defaults when absent.
pub fn pagination(raw: &RawParameters) -> Result<(i64, i64)> {
    let limit = parse_int(raw, "Limit", DEFAULT_LIMIT)?;
    let offset = parse_int(raw, "Offset", DEFAULT_OFFSET)?;
    Ok((limit, offset))
}

fn parse_int(raw: &RawParameters, field: &str, default: i64) -> Result<i64> {
    match raw.get(field) {
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| Error::not_an_integer(field)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let params = normalize(&raw(&[]), ResourceKind::Eip).unwrap();
        assert_eq!(params, NormalizedListParams::default());
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_passes_through_scope_and_tag() {
        let params = normalize(
            &raw(&[
                ("ProjectId", "org-1"),
                ("Region", "cn-bj2"),
                ("Tag", "web"),
                ("Limit", "50"),
                ("Offset", "100"),
            ]),
            ResourceKind::Uhost,
        )
        .unwrap();
        assert_eq!(params.project_id.as_deref(), Some("org-1"));
        assert_eq!(params.region.as_deref(), Some("cn-bj2"));
        assert_eq!(params.tag.as_deref(), Some("web"));
        assert_eq!((params.limit, params.offset), (50, 100));
    }

    #[test]
    fn test_empty_tag_is_distinct_from_absent() {
        let params = normalize(&raw(&[("Tag", "")]), ResourceKind::Eip).unwrap();
        assert_eq!(params.tag.as_deref(), Some(""));
    }

    #[test]
    fn test_non_integer_limit_rejected() {
        let err = normalize(&raw(&[("Limit", "ten")]), ResourceKind::Eip).unwrap_err();
        match err {
            Error::Validation { field, reason } => {
                assert_eq!(field, "Limit");
                assert_eq!(reason, "not an integer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_offset_rejected() {
        let err = normalize(&raw(&[("Offset", "1.5")]), ResourceKind::Udisk).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "Offset"));
    }

    #[test]
    fn test_kind_specific_extras_only_for_their_kind() {
        let input = raw(&[("ULBId", "ulb-1"), ("ClassType", "sql")]);

        let vserver = normalize(&input, ResourceKind::UlbVServer).unwrap();
        assert_eq!(vserver.ulb_id.as_deref(), Some("ulb-1"));
        assert_eq!(vserver.class_type, None);

        let udb = normalize(&input, ResourceKind::Udb).unwrap();
        assert_eq!(udb.class_type.as_deref(), Some("sql"));
        assert_eq!(udb.ulb_id, None);
    }
}
