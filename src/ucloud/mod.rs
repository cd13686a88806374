//! UCloud API interaction module
//!
//! This module provides the provider side of the adapter: credentials and
//! request signing, the HTTP transport, and the client handle every handler
//! invokes through.
//!
//! # Module Structure
//!
//! - [`auth`] - API key pair, request signing and the credential health check
//! - [`client`] - Main UCloud client implementing [`provider::Provider`]
//! - [`http`] - HTTP utilities for form-encoded API calls
//! - [`projects`] - Project and region listing
//! - [`provider`] - The action-tagged request payload and invocation trait
//!
//! # Example
//!
//! ```ignore
//! use ucmon::ucloud::{auth::Credentials, client::UCloudClient, provider::ApiRequest};
//!
//! async fn example(options: &ClientOptions) -> anyhow::Result<()> {
//!     let client = UCloudClient::new(Credentials::new("pub", "priv"), options)?;
//!     let regions = client.invoke(ApiRequest::new("GetRegion")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
pub mod provider;

pub use provider::{ApiRequest, Provider};
