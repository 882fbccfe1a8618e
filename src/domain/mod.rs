// Domain layer - Pipeline data, derived metrics and dashboard state
pub mod dashboard;
pub mod metrics;
pub mod metro;
pub mod pipeline;
