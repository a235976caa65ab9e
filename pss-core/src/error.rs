/// Error types for the dashboard pipeline.
///
/// Every variant is locally recoverable: callers render a placeholder,
/// an "unavailable" indicator, or a zero-state instead of failing.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// Unknown slug or id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network, status or payload failure from a proxy endpoint
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// No records match the current filters
    #[error("No records match the current filters")]
    EmptyAggregation,
}

impl DashboardError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        DashboardError::DataUnavailable(reason.into())
    }
}

/// Type alias for Results using DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;
