use crate::error::BookingError;
use crate::schedule::WeeklySchedule;
use crate::types::{Appointment, AppointmentStatus, NewAppointment};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use uuid::Uuid;

/// One weekly schedule document per provider. Documents are overwritten,
/// never deleted; `schedule` returning `None` means "no availability" on
/// read paths while the editor materializes a default on first touch.
pub trait ScheduleStore: Clone + Send + Sync + 'static {
    fn schedule(&self, provider_id: Uuid) -> Result<Option<WeeklySchedule>, BookingError>;
    fn save_schedule(
        &self,
        provider_id: Uuid,
        schedule: WeeklySchedule,
    ) -> Result<(), BookingError>;
    fn subscribe(&self, provider_id: Uuid) -> watch::Receiver<Option<WeeklySchedule>>;
}

/// Appointment persistence. `create_appointment` must refuse a second
/// non-cancelled booking for the same (provider, date, time) — this is the
/// one invariant the store enforces itself rather than trusting callers.
pub trait AppointmentStore: Clone + Send + Sync + 'static {
    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>, BookingError>;
    fn appointments_by_provider(&self, provider_id: Uuid)
        -> Result<Vec<Appointment>, BookingError>;
    fn appointments_by_client(&self, client_id: Uuid) -> Result<Vec<Appointment>, BookingError>;
    fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, BookingError>;
    fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        expected_version: i32,
    ) -> Result<Appointment, BookingError>;
    fn delete_appointment(&self, id: Uuid) -> Result<(), BookingError>;
}

/// Per-provider schedule change notification shared by the store backends.
#[derive(Clone, Default)]
pub struct ScheduleWatchers {
    senders: Arc<Mutex<HashMap<Uuid, watch::Sender<Option<WeeklySchedule>>>>>,
}

impl std::fmt::Debug for ScheduleWatchers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScheduleWatchers")
    }
}

impl ScheduleWatchers {
    pub fn subscribe(
        &self,
        provider_id: Uuid,
        current: Option<WeeklySchedule>,
    ) -> watch::Receiver<Option<WeeklySchedule>> {
        let mut senders = self.senders.lock().unwrap();
        senders
            .entry(provider_id)
            .or_insert_with(|| watch::channel(current).0)
            .subscribe()
    }

    pub fn notify(&self, provider_id: Uuid, schedule: &WeeklySchedule) {
        let mut senders = self.senders.lock().unwrap();
        senders
            .entry(provider_id)
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(schedule.clone()));
    }
}
