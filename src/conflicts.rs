use crate::types::minutes_since_midnight;
use chrono::NaiveTime;

/// How a candidate is matched against existing bookings.
///
/// `ExactStart` mirrors the legacy behavior: only a booking at exactly the
/// same minute blocks a candidate, so off-grid bookings of other durations
/// do not. `IntervalOverlap` blocks any candidate whose half-open interval
/// intersects a booking. Which one is the intended product behavior is an
/// open product question, so both stay selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    #[default]
    ExactStart,
    IntervalOverlap,
}

/// Projection of one non-cancelled appointment onto the queried date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookedSlot {
    pub start: NaiveTime,
    pub duration_minutes: u32,
}

pub fn is_occupied(
    candidate: NaiveTime,
    duration_minutes: u32,
    booked: &[BookedSlot],
    policy: ConflictPolicy,
) -> bool {
    match policy {
        ConflictPolicy::ExactStart => booked.iter().any(|slot| slot.start == candidate),
        ConflictPolicy::IntervalOverlap => {
            let start = minutes_since_midnight(candidate);
            let end = start + duration_minutes;
            booked.iter().any(|slot| {
                let booked_start = minutes_since_midnight(slot.start);
                let booked_end = booked_start + slot.duration_minutes;
                start < booked_end && booked_start < end
            })
        }
    }
}

/// Splits candidates into bookable and taken, preserving candidate order.
pub fn partition(
    candidates: &[NaiveTime],
    duration_minutes: u32,
    booked: &[BookedSlot],
    policy: ConflictPolicy,
) -> (Vec<NaiveTime>, Vec<NaiveTime>) {
    let mut available = Vec::new();
    let mut occupied = Vec::new();
    for &candidate in candidates {
        if is_occupied(candidate, duration_minutes, booked, policy) {
            occupied.push(candidate);
        } else {
            available.push(candidate);
        }
    }
    (available, occupied)
}
