//! Error taxonomy for the ordering core
//!
//! Only the validation errors (`EmptyOrder`, `MissingLocation`) are ever
//! shown to the customer; they block progression to the payment stage.
//! Everything else is absorbed internally and the screens render a
//! usable, possibly empty, state instead of crashing.

use thiserror::Error;

/// Unified error type for the ordering core
#[derive(Debug, Error)]
pub enum OrderError {
    /// Submission attempted with an empty item list
    #[error("order has no items")]
    EmptyOrder,

    /// Delivery order submitted without a delivery location
    #[error("delivery order is missing a location")]
    MissingLocation,

    /// Handoff token could not be decoded (recovered to an empty draft)
    #[error("handoff token could not be decoded")]
    DecodeFailure,

    /// Durable store read/write failed (in-memory state stays authoritative)
    #[error("durable store unavailable: {0}")]
    StorageUnavailable(String),

    /// Collaborator network call failed (recovered to an empty collection)
    #[error("fetch failed: {0}")]
    FetchFailure(String),
}

impl OrderError {
    /// Whether this error is surfaced to the customer as a blocking notice
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::EmptyOrder | Self::MissingLocation)
    }
}

/// Result type for ordering operations
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_errors_are_user_facing() {
        assert!(OrderError::EmptyOrder.is_user_facing());
        assert!(OrderError::MissingLocation.is_user_facing());
        assert!(!OrderError::DecodeFailure.is_user_facing());
        assert!(!OrderError::StorageUnavailable("quota".into()).is_user_facing());
        assert!(!OrderError::FetchFailure("timeout".into()).is_user_facing());
    }
}
