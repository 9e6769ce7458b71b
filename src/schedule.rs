use crate::error::BookingError;
use crate::types::hhmm;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub enabled: bool,
    #[serde(default)]
    pub ranges: Vec<TimeRange>,
}

impl DaySchedule {
    pub fn open(ranges: Vec<TimeRange>) -> Self {
        Self {
            enabled: true,
            ranges,
        }
    }

    pub fn closed() -> Self {
        Self {
            enabled: false,
            ranges: Vec::new(),
        }
    }
}

/// One recurring open-hours document per provider, keyed by weekday.
/// Range order is display order; consumers sort before doing time math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

fn range(start: (u32, u32), end: (u32, u32)) -> TimeRange {
    TimeRange {
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        let weekday = DaySchedule::open(vec![range((9, 0), (18, 0))]);
        Self {
            monday: weekday.clone(),
            tuesday: weekday.clone(),
            wednesday: weekday.clone(),
            thursday: weekday.clone(),
            friday: weekday,
            saturday: DaySchedule::open(vec![range((10, 0), (15, 0))]),
            sunday: DaySchedule::closed(),
        }
    }
}

impl WeeklySchedule {
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn days(&self) -> [(&'static str, &DaySchedule); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }

    /// Save-time check: every range of every enabled day must start before it
    /// ends. Disabled days may carry stale ranges; they are never surfaced.
    pub fn validate(&self) -> Result<(), BookingError> {
        for (name, day) in self.days() {
            if !day.enabled {
                continue;
            }
            for time_range in &day.ranges {
                if !time_range.is_valid() {
                    return Err(BookingError::InvalidRange {
                        day: name,
                        start: time_range.start.format(hhmm::FORMAT).to_string(),
                        end: time_range.end.format(hhmm::FORMAT).to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
