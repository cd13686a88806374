//! Metric queries
//!
//! - [`query`] - Batch entries, per-query specs and results
//! - [`engine`] - Concurrent execution of a batch

pub mod engine;
pub mod query;

pub use engine::execute;
pub use query::{
    DataQuery, MetricQueryResult, MetricQuerySpec, QueryBatch, QueryResponse, TimeRange,
    TimeSeries,
};
