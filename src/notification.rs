use crate::types::{Appointment, AppointmentStatus};
use tracing::info;

/// What the messaging layer would deliver. Delivery itself (SMS/WhatsApp)
/// lives outside this service; we only record that it should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationIntent {
    BookingRequested,
    AppointmentConfirmed,
    AppointmentCancelled,
}

impl NotificationIntent {
    pub fn for_status(status: AppointmentStatus) -> Option<Self> {
        match status {
            AppointmentStatus::Confirmed => Some(NotificationIntent::AppointmentConfirmed),
            AppointmentStatus::Cancelled => Some(NotificationIntent::AppointmentCancelled),
            AppointmentStatus::Pending | AppointmentStatus::Completed => None,
        }
    }
}

pub fn signal(intent: NotificationIntent, appointment: &Appointment) {
    info!(
        intent = ?intent,
        appointment_id = %appointment.id,
        provider_id = %appointment.provider_id,
        client_id = %appointment.client_id,
        date = %appointment.date,
        time = %appointment.time.format("%H:%M"),
        "notification intent signaled"
    );
}
