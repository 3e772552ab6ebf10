use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("Degenerate range: min ({min}) equals max ({max})")]
    DegenerateRange { min: f64, max: f64 },

    #[error("Invalid point ID: {0}")]
    InvalidPointId(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Point not found: {0}")]
    PointNotFound(String),

    #[error("Invalid point value: {0}")]
    InvalidPointValue(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl DomainError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor(reason.into())
    }

    /// True for errors raised while validating a capability descriptor
    pub fn is_malformed_descriptor(&self) -> bool {
        matches!(self, Self::MalformedDescriptor(_))
    }

    pub fn is_degenerate_range(&self) -> bool {
        matches!(self, Self::DegenerateRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
