use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ServiceError;

/// Export error types
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ExportError {
    fn from(error: std::io::Error) -> Self {
        ExportError::Io(error.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(error: csv::Error) -> Self {
        ExportError::Serialization(error.to_string())
    }
}

impl From<ExportError> for ServiceError {
    fn from(error: ExportError) -> Self {
        ServiceError::Export(error.to_string())
    }
}

/// Which dataset an export file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    Donations,
    Donors,
    Summary,
    MonthlyTrends,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Donations => "donations",
            ExportKind::Donors => "donors",
            ExportKind::Summary => "donation-summary",
            ExportKind::MonthlyTrends => "monthly-trends",
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
