use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::backend::{AppointmentStore, ScheduleStore, ScheduleWatchers};
use crate::configuration::Configuration;
use crate::error::BookingError;
use crate::schedule::WeeklySchedule;
use crate::types::{Appointment, AppointmentStatus, NewAppointment, SLOT_DURATION_MINUTES};

pub struct MockBackendInner {
    pub success: AtomicBool,
    pub calls_to_schedule: AtomicU64,
    pub calls_to_save_schedule: AtomicU64,
    pub calls_to_subscribe: AtomicU64,
    pub calls_to_appointment: AtomicU64,
    pub calls_to_appointments_by_provider: AtomicU64,
    pub calls_to_appointments_by_client: AtomicU64,
    pub calls_to_create_appointment: AtomicU64,
    pub calls_to_update_status: AtomicU64,
    pub calls_to_delete_appointment: AtomicU64,
    pub schedule: Mutex<Option<WeeklySchedule>>,
    pub appointments: Mutex<Vec<Appointment>>,
    pub watchers: ScheduleWatchers,
}

#[derive(Clone)]
pub struct MockBackend(pub Arc<MockBackendInner>);

impl MockBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBackendInner {
            success: AtomicBool::new(true),
            calls_to_schedule: AtomicU64::default(),
            calls_to_save_schedule: AtomicU64::default(),
            calls_to_subscribe: AtomicU64::default(),
            calls_to_appointment: AtomicU64::default(),
            calls_to_appointments_by_provider: AtomicU64::default(),
            calls_to_appointments_by_client: AtomicU64::default(),
            calls_to_create_appointment: AtomicU64::default(),
            calls_to_update_status: AtomicU64::default(),
            calls_to_delete_appointment: AtomicU64::default(),
            schedule: Mutex::default(),
            appointments: Mutex::default(),
            watchers: ScheduleWatchers::default(),
        }))
    }

    fn succeeding(&self) -> bool {
        self.0.success.load(Ordering::SeqCst)
    }
}

impl ScheduleStore for MockBackend {
    fn schedule(&self, _provider_id: Uuid) -> Result<Option<WeeklySchedule>, BookingError> {
        self.0.calls_to_schedule.fetch_add(1, Ordering::SeqCst);
        if !self.succeeding() {
            return Err(BookingError::Store("Supposed to fail".into()));
        }
        Ok(self.0.schedule.lock().unwrap().clone())
    }

    fn save_schedule(
        &self,
        _provider_id: Uuid,
        schedule: WeeklySchedule,
    ) -> Result<(), BookingError> {
        self.0.calls_to_save_schedule.fetch_add(1, Ordering::SeqCst);
        if !self.succeeding() {
            return Err(BookingError::Store("Supposed to fail".into()));
        }
        *self.0.schedule.lock().unwrap() = Some(schedule);
        Ok(())
    }

    fn subscribe(&self, provider_id: Uuid) -> watch::Receiver<Option<WeeklySchedule>> {
        self.0.calls_to_subscribe.fetch_add(1, Ordering::SeqCst);
        let current = self.0.schedule.lock().unwrap().clone();
        self.0.watchers.subscribe(provider_id, current)
    }
}

impl AppointmentStore for MockBackend {
    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>, BookingError> {
        self.0.calls_to_appointment.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .0
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|appointment| appointment.id == id)
            .cloned())
    }

    fn appointments_by_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Appointment>, BookingError> {
        self.0
            .calls_to_appointments_by_provider
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .0
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|appointment| appointment.provider_id == provider_id)
            .cloned()
            .collect())
    }

    fn appointments_by_client(&self, client_id: Uuid) -> Result<Vec<Appointment>, BookingError> {
        self.0
            .calls_to_appointments_by_client
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .0
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|appointment| appointment.client_id == client_id)
            .cloned()
            .collect())
    }

    fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, BookingError> {
        self.0
            .calls_to_create_appointment
            .fetch_add(1, Ordering::SeqCst);
        if !self.succeeding() {
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
        self.0
            .appointments
            .lock()
            .unwrap()
            .push(appointment.clone());
        Ok(appointment)
    }

    fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        expected_version: i32,
    ) -> Result<Appointment, BookingError> {
        self.0.calls_to_update_status.fetch_add(1, Ordering::SeqCst);
        if !self.succeeding() {
            return Err(BookingError::StaleVersion);
        }
        let mut appointments = self.0.appointments.lock().unwrap();
        let Some(appointment) = appointments
            .iter_mut()
            .find(|appointment| appointment.id == id)
        else {
            return Err(BookingError::AppointmentNotFound);
        };
        if appointment.version != expected_version {
            return Err(BookingError::StaleVersion);
        }
        appointment.status = status;
        appointment.version += 1;
        Ok(appointment.clone())
    }

    fn delete_appointment(&self, id: Uuid) -> Result<(), BookingError> {
        self.0
            .calls_to_delete_appointment
            .fetch_add(1, Ordering::SeqCst);
        if !self.succeeding() {
            return Err(BookingError::AppointmentNotFound);
        }
        self.0
            .appointments
            .lock()
            .unwrap()
            .retain(|appointment| appointment.id != id);
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub struct MockConfiguration;

impl Configuration for MockConfiguration {
    fn provider_key(&self) -> String {
        "123".into()
    }

    fn port(&self) -> String {
        "0".into()
    }

    fn database_url(&self) -> Option<String> {
        None
    }
}
