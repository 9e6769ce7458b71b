use crate::backend::{AppointmentStore, ScheduleStore};
use crate::conflicts::{partition, BookedSlot, ConflictPolicy};
use crate::error::BookingError;
use crate::slots::generate_slots;
use crate::types::{Slot, SLOT_DURATION_MINUTES};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Turns a provider's weekly schedule plus their booked appointments into
/// the concrete slot list for one calendar date.
///
/// The schedule is read from the store on every call so edits are visible
/// immediately. Dates before `today` and weekdays that are disabled yield an
/// empty list, as does a provider without a schedule document — none of
/// these are errors. Eligibility is a date-only check: times already past on
/// the current day are still offered, matching the legacy booking screen.
pub fn availability<B>(
    backend: &B,
    provider_id: Uuid,
    date: NaiveDate,
    today: NaiveDate,
    policy: ConflictPolicy,
) -> Result<Vec<Slot>, BookingError>
where
    B: ScheduleStore + AppointmentStore,
{
    if date < today {
        return Ok(Vec::new());
    }

    let Some(schedule) = backend.schedule(provider_id)? else {
        return Ok(Vec::new());
    };

    let day = schedule.day(date.weekday());
    if !day.enabled {
        return Ok(Vec::new());
    }

    let candidates = generate_slots(day, SLOT_DURATION_MINUTES);
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let booked: Vec<BookedSlot> = backend
        .appointments_by_provider(provider_id)?
        .into_iter()
        .filter(|appointment| appointment.date == date && appointment.status.blocks_slot())
        .map(|appointment| BookedSlot {
            start: appointment.time,
            duration_minutes: appointment.duration_minutes,
        })
        .collect();

    let (_, occupied) = partition(&candidates, SLOT_DURATION_MINUTES, &booked, policy);

    Ok(candidates
        .into_iter()
        .map(|time| Slot {
            start: date.and_time(time),
            duration_minutes: SLOT_DURATION_MINUTES,
            is_available: !occupied.contains(&time),
        })
        .collect())
}
