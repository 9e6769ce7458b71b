use crate::types::AppointmentStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid time range on {day}: {start} must end after it starts ({end})")]
    InvalidRange {
        day: &'static str,
        start: String,
        end: String,
    },
    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),
    #[error("slot no longer available, please pick another")]
    SlotConflict,
    #[error("appointment cannot move from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error("appointment was changed by someone else, reload and retry")]
    StaleVersion,
    #[error("appointment not found")]
    AppointmentNotFound,
    #[error("store unavailable: {0}")]
    Store(String),
}

impl From<diesel::result::Error> for BookingError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            // The partial unique index on (provider_id, date, time) closes the
            // check-then-insert race between two concurrent bookings.
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                BookingError::SlotConflict
            }
            other => BookingError::Store(other.to_string()),
        }
    }
}
