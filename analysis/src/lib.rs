//! Aggregated views over a merged benchmark table.
//!
//! Every view is computed on demand from the rows; nothing is persisted.
//! Grouping keys are the `<engine>_<configuration>` label and the query type
//! category, the same axes the charts are drawn over.

pub mod group;
pub mod improvement;
pub mod stats;

pub use group::QueryDistribution;
pub use improvement::{configuration_impact, Improvement};
pub use stats::{quantile, rolling_mean, Quartiles, Summary};
