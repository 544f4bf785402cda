use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Which kind of budgeting window a [`PeriodWindow`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Month,
    Biweekly,
}

/// An inclusive `[start, end]` span of wall-clock time.
///
/// Windows always cover whole days: `start` is midnight of the first day and
/// `end` is the last representable instant of the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub kind: PeriodKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    /// Builds a window covering `first` through `last`, both days inclusive.
    pub fn from_days(
        kind: PeriodKind,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Self {
        Self {
            kind,
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(end_of_day()),
        }
    }

    pub fn contains(
        &self,
        timestamp: NaiveDateTime,
    ) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Number of calendar days in the window.
    pub fn len_days(&self) -> u32 {
        let days = (self.last_day() - self.first_day()).num_days() + 1;
        u32::try_from(days).unwrap_or(0)
    }

    /// Days left in the window counting `today`, never less than 1.
    ///
    /// Callers divide by this figure, so a `today` past the window end still
    /// yields 1 rather than zero.
    pub fn remaining_days(
        &self,
        today: NaiveDate,
    ) -> u32 {
        let remaining = i64::from(self.last_day().day()) - i64::from(today.day()) + 1;
        u32::try_from(remaining.max(1)).unwrap_or(1)
    }

    /// Short human label such as `"01 Oct - 15 Oct"`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.first_day().format("%d %b"),
            self.last_day().format("%d %b")
        )
    }
}

/// 23:59:59.999999999, the inclusive end of a calendar day.
fn end_of_day() -> NaiveTime {
    NaiveTime::MIN - Duration::nanoseconds(1)
}
