use crate::error::BookingError;
use crate::types::{Appointment, AppointmentStatus};
use chrono::NaiveDateTime;

/// Allowed next states. `completed` and `cancelled` are terminal.
pub fn valid_transitions(from: AppointmentStatus) -> &'static [AppointmentStatus] {
    use AppointmentStatus::*;

    match from {
        Pending => &[Confirmed, Cancelled],
        Confirmed => &[Completed, Cancelled],
        Completed | Cancelled => &[],
    }
}

pub fn validate_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> Result<(), BookingError> {
    if valid_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(BookingError::InvalidTransition { from, to })
    }
}

/// Display status for listing views. A confirmed appointment whose start has
/// passed reads as completed; nothing is written back to the store.
pub fn effective_status(appointment: &Appointment, now: NaiveDateTime) -> AppointmentStatus {
    if appointment.status == AppointmentStatus::Confirmed && appointment.starts_at() < now {
        AppointmentStatus::Completed
    } else {
        appointment.status
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::SLOT_DURATION_MINUTES;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;
    use AppointmentStatus::*;

    #[test_case::test_case (Pending, Confirmed, true)]
    #[test_case::test_case (Pending, Cancelled, true)]
    #[test_case::test_case (Confirmed, Cancelled, true)]
    #[test_case::test_case (Confirmed, Completed, true)]
    #[test_case::test_case (Pending, Completed, false)]
    #[test_case::test_case (Confirmed, Pending, false)]
    #[test_case::test_case (Completed, Cancelled, false)]
    #[test_case::test_case (Cancelled, Pending, false)]
    #[test_case::test_case (Cancelled, Confirmed, false)]
    fn transition_matrix(from: AppointmentStatus, to: AppointmentStatus, allowed: bool) {
        assert_eq!(validate_transition(from, to).is_ok(), allowed);
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(valid_transitions(Completed).is_empty());
        assert!(valid_transitions(Cancelled).is_empty());
    }

    fn appointment(status: AppointmentStatus, date: NaiveDate) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            date,
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: SLOT_DURATION_MINUTES,
            status,
            service: None,
            price: None,
            version: 1,
            created_at: Utc::now(),
        }
    }

    fn past_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, 1).unwrap()
    }

    fn future_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2031, 6, 1).unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn confirmed_in_the_past_reads_as_completed() {
        let stored = appointment(Confirmed, past_date());
        assert_eq!(effective_status(&stored, now()), Completed);
        // Derived view only; the stored status is untouched.
        assert_eq!(stored.status, Confirmed);
    }

    #[test_case::test_case (Pending; "pending stays pending even in the past")]
    #[test_case::test_case (Cancelled; "cancelled is unchanged")]
    #[test_case::test_case (Completed; "completed is unchanged")]
    fn only_confirmed_is_reclassified(status: AppointmentStatus) {
        let stored = appointment(status, past_date());
        assert_eq!(effective_status(&stored, now()), status);
    }

    #[test]
    fn confirmed_in_the_future_stays_confirmed() {
        let stored = appointment(Confirmed, future_date());
        assert_eq!(effective_status(&stored, now()), Confirmed);
    }
}
