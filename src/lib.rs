//! ucmon - UCloud monitor adapter
//!
//! Resource discovery and metric queries against the UCloud API, served over
//! HTTP for dashboard front-ends.

pub mod config;
pub mod error;
pub mod metric;
pub mod resource;
pub mod server;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
pub mod ucloud;

pub use error::{Error, Result, TransportError};

/// Version injected at compile time via UCMON_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("UCMON_VERSION") {
    Some(v) => v,
    None => "dev",
};
