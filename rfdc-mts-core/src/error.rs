use thiserror::Error;

use crate::{backend::BackendError, status::MtsStatus};

/// A interface for error handling in rfdc-mts.
#[derive(Error, Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum MtsError {
    /// The operation failed with one or more status flags.
    #[error("{0}")]
    Status(MtsStatus),
    /// Tile id is out of range.
    #[error("Tile id ({0}) is out of range")]
    InvalidTile(u32),
    /// Converter type is neither ADC nor DAC.
    #[error("Converter type ({0}) is invalid")]
    InvalidConverterType(u32),
    /// The instance is closed.
    #[error("Instance is closed")]
    Closed,
    /// Error in the backend.
    #[error("{0}")]
    Backend(#[from] BackendError),
}

impl MtsError {
    /// Projects the error onto the status bitmask.
    #[must_use]
    pub const fn status(&self) -> MtsStatus {
        match self {
            MtsError::Status(status) => *status,
            MtsError::InvalidTile(_) | MtsError::InvalidConverterType(_) => {
                MtsStatus::NOT_ENABLED
            }
            MtsError::Closed | MtsError::Backend(_) => MtsStatus::IP_NOT_READY,
        }
    }
}

impl From<MtsStatus> for MtsError {
    fn from(status: MtsStatus) -> Self {
        MtsError::Status(status)
    }
}
