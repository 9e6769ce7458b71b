use crate::schedule::DaySchedule;
use crate::types::minutes_since_midnight;
use chrono::NaiveTime;

/// Expands a day's open ranges into candidate start times on a fixed grid.
///
/// Ranges are walked in start order, in whole minutes; a candidate is kept
/// while the full slot still fits inside the range, so a trailing partial
/// slot is dropped. Candidates from overlapping ranges are de-duplicated by
/// start time. Disabled days and empty range lists yield nothing.
pub fn generate_slots(day: &DaySchedule, duration_minutes: u32) -> Vec<NaiveTime> {
    if !day.enabled || day.ranges.is_empty() || duration_minutes == 0 {
        return Vec::new();
    }

    let mut ranges = day.ranges.clone();
    ranges.sort_by_key(|time_range| time_range.start);

    let mut candidates = Vec::new();
    for time_range in &ranges {
        let end = minutes_since_midnight(time_range.end);
        let mut current = minutes_since_midnight(time_range.start);
        while current + duration_minutes <= end {
            candidates.push(current);
            current += duration_minutes;
        }
    }

    candidates.sort_unstable();
    candidates.dedup();
    candidates
        .into_iter()
        .map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap())
        .collect()
}
