//! Resource discovery layer
//!
//! This module answers discovery requests: which resources of a kind exist,
//! which metrics a kind exposes, which projects and regions are visible.
//!
//! # Architecture
//!
//! - [`registry`] - The closed set of resource kinds and how each is listed
//! - [`params`] - Validates and defaults the untyped query parameters
//! - [`handlers`] - Typed listings, record filtering and id extraction
//! - [`generic`] - Listings for actions without typed bindings
//! - [`router`] - Maps `Action`/`ResourceType` to exactly one handler
//!
//! # Example
//!
//! ```ignore
//! use ucmon::resource::{route, RawParameters};
//!
//! async fn list_hosts(provider: &dyn Provider) -> ucmon::error::Result<Vec<String>> {
//!     let mut raw = RawParameters::new();
//!     raw.insert("Action".into(), "GetResourceId".into());
//!     raw.insert("ResourceType".into(), "uhost".into());
//!     route(provider, &raw).await
//! }
//! ```

pub mod generic;
pub mod handlers;
pub mod params;
pub mod registry;
pub mod router;

pub use params::{normalize, NormalizedListParams, RawParameters};
pub use registry::{ResourceDef, ResourceKind};
pub use router::{resolve, route, Action, Route};
