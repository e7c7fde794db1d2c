//! Ambient temperature aggregation

pub mod aggregator;

pub use aggregator::AmbientAggregator;
