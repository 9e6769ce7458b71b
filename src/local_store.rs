use crate::backend::{AppointmentStore, ScheduleStore, ScheduleWatchers};
use crate::error::BookingError;
use crate::schedule::WeeklySchedule;
use crate::types::{Appointment, AppointmentStatus, NewAppointment, SLOT_DURATION_MINUTES};
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// In-memory backend for running without a database. Everything is gone on
/// restart; the single mutex doubles as the booking serialization point.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    schedules: Arc<Mutex<HashMap<Uuid, WeeklySchedule>>>,
    appointments: Arc<Mutex<HashMap<Uuid, Appointment>>>,
    watchers: ScheduleWatchers,
}

impl ScheduleStore for LocalStore {
    fn schedule(&self, provider_id: Uuid) -> Result<Option<WeeklySchedule>, BookingError> {
        Ok(self.schedules.lock().unwrap().get(&provider_id).cloned())
    }

    fn save_schedule(
        &self,
        provider_id: Uuid,
        schedule: WeeklySchedule,
    ) -> Result<(), BookingError> {
        schedule.validate()?;
        self.schedules
            .lock()
            .unwrap()
            .insert(provider_id, schedule.clone());
        self.watchers.notify(provider_id, &schedule);
        debug!(%provider_id, "schedule saved");
        Ok(())
    }

    fn subscribe(&self, provider_id: Uuid) -> watch::Receiver<Option<WeeklySchedule>> {
        let current = self.schedules.lock().unwrap().get(&provider_id).cloned();
        self.watchers.subscribe(provider_id, current)
    }
}

impl AppointmentStore for LocalStore {
    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>, BookingError> {
        Ok(self.appointments.lock().unwrap().get(&id).cloned())
    }

    fn appointments_by_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Appointment>, BookingError> {
        let appointments = self.appointments.lock().unwrap();
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|appointment| appointment.provider_id == provider_id)
            .cloned()
            .collect();
        result.sort_by_key(|appointment| (appointment.date, appointment.time));
        Ok(result)
    }

    fn appointments_by_client(&self, client_id: Uuid) -> Result<Vec<Appointment>, BookingError> {
        let appointments = self.appointments.lock().unwrap();
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|appointment| appointment.client_id == client_id)
            .cloned()
            .collect();
        result.sort_by_key(|appointment| (appointment.date, appointment.time));
        Ok(result)
    }

    fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, BookingError> {
        let mut appointments = self.appointments.lock().unwrap();

        // Check-then-insert under the lock keeps at most one non-cancelled
        // booking per (provider, date, time).
        let taken = appointments.values().any(|existing| {
            existing.provider_id == new.provider_id
                && existing.date == new.date
                && existing.time == new.time
                && existing.status.blocks_slot()
        });
        if taken {
            warn!(provider_id = %new.provider_id, date = %new.date, "booking rejected, slot taken");
            return Err(BookingError::SlotConflict);
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            provider_id: new.provider_id,
            client_id: new.client_id,
            date: new.date,
            time: new.time,
            duration_minutes: SLOT_DURATION_MINUTES,
            status: AppointmentStatus::Pending,
            service: new.service,
            price: new.price,
            version: 1,
            created_at: Utc::now(),
        };
        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        expected_version: i32,
    ) -> Result<Appointment, BookingError> {
        let mut appointments = self.appointments.lock().unwrap();
        let Some(appointment) = appointments.get_mut(&id) else {
            return Err(BookingError::AppointmentNotFound);
        };
        if appointment.version != expected_version {
            warn!(%id, expected_version, actual = appointment.version, "stale status update");
            return Err(BookingError::StaleVersion);
        }
        appointment.status = status;
        appointment.version += 1;
        Ok(appointment.clone())
    }

    fn delete_appointment(&self, id: Uuid) -> Result<(), BookingError> {
        if self.appointments.lock().unwrap().remove(&id).is_none() {
            return Err(BookingError::AppointmentNotFound);
        }
        Ok(())
    }
}
