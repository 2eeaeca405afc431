use crate::types::Status;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result type alias for scheduling operations.
pub type BookingResult<T> = std::result::Result<T, BookingError>;

/// Failures of the booking coordinator and its backends. All of these are
/// recoverable and surfaced to the caller for user display.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    /// No active client session was supplied with the request.
    #[error("no active client session")]
    Unauthenticated,

    /// The requested slot lies outside the bookable range.
    #[error("slot {slot} is not bookable: {reason}")]
    OutOfRange { slot: DateTime<Utc>, reason: String },

    /// The slot already holds a non-canceled booking.
    #[error("slot {slot} is already booked")]
    Conflict { slot: DateTime<Utc> },

    #[error("unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("employee {0} already exists")]
    DuplicateEmployee(String),

    #[error("unknown haircut: {0}")]
    UnknownHaircut(Uuid),

    #[error("unknown booking: {0}")]
    UnknownBooking(Uuid),

    /// The requested status change is not part of the booking lifecycle.
    #[error("cannot transition a {from} booking to {to}")]
    InvalidTransition { from: Status, to: Status },

    /// A request field failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The persistence backend failed; wraps the underlying cause.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl BookingError {
    pub fn out_of_range(slot: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            slot,
            reason: reason.into(),
        }
    }

    pub fn backend(cause: impl ToString) -> Self {
        Self::BackendUnavailable(cause.to_string())
    }
}
