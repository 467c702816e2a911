use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::TimeWindowError;

/// A half-open time window `[from, to)`.
///
/// Used both for conflict search and for day-bounded event lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// Creates a new window, validating that `from < to`.
    pub fn new(
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> Result<Self, TimeWindowError> {
        if from >= to {
            return Err(TimeWindowError::InvalidRange);
        }
        Ok(Self { from, to })
    }

    /// Creates a window covering whole calendar days.
    ///
    /// Starts at midnight of `start`'s day (in `start`'s offset) and ends at
    /// the midnight that closes `end`'s day (in `end`'s offset).
    pub fn day_bounded(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, TimeWindowError> {
        let from = start_of_day(start.date_naive(), start.offset())?;
        let next_day = end
            .date_naive()
            .succ_opt()
            .ok_or(TimeWindowError::OutOfRange)?;
        let to = start_of_day(next_day, end.offset())?;
        Self::new(from, to)
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        self.to - self.from
    }

    /// Returns a window of the same length starting at `from`.
    pub fn shifted_to(&self, from: DateTime<FixedOffset>) -> Result<Self, TimeWindowError> {
        let to = from
            .checked_add_signed(self.duration())
            .ok_or(TimeWindowError::OutOfRange)?;
        Self::new(from, to)
    }
}

fn start_of_day(
    date: NaiveDate,
    offset: &FixedOffset,
) -> Result<DateTime<FixedOffset>, TimeWindowError> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or(TimeWindowError::OutOfRange)?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .ok_or(TimeWindowError::OutOfRange)
}
