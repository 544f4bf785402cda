//! Calendar-month and biweekly window resolution.
//!
//! A month is split into exactly two biweekly windows: days 1–15 and day 16
//! through the last day. The first half is always 15 days long; the second
//! absorbs the remainder (13 to 16 days).

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{PeriodKind, PeriodWindow};

/// Last day of the first biweekly window.
pub const FIRST_HALF_LAST_DAY: u32 = 15;

/// Windows containing a given instant, plus the day they were resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPeriods {
    pub today: NaiveDate,
    pub month: PeriodWindow,
    pub biweekly: PeriodWindow,
}

impl ResolvedPeriods {
    pub fn window(
        &self,
        kind: PeriodKind,
    ) -> &PeriodWindow {
        match kind {
            PeriodKind::Month => &self.month,
            PeriodKind::Biweekly => &self.biweekly,
        }
    }

    /// Days left in the `kind` window counting today, at least 1.
    pub fn remaining_days(
        &self,
        kind: PeriodKind,
    ) -> u32 {
        self.window(kind).remaining_days(self.today)
    }
}

/// Number of the last day of `month` (1-based) in `year`.
///
/// Out-of-range input falls back to 31.
///
/// ```
/// use budget_core::calculations::last_day_of_month;
///
/// assert_eq!(last_day_of_month(2024, 2), 29);
/// assert_eq!(last_day_of_month(2025, 2), 28);
/// assert_eq!(last_day_of_month(2025, 4), 30);
/// assert_eq!(last_day_of_month(2025, 12), 31);
/// ```
pub fn last_day_of_month(
    year: i32,
    month: u32,
) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(31, |last| last.day())
}

// `day` always comes from the same month's calendar, so `with_day` cannot miss.
fn on_day(
    date: NaiveDate,
    day: u32,
) -> NaiveDate {
    date.with_day(day).unwrap_or(date)
}

/// The calendar month containing `date`.
pub fn month_window(date: NaiveDate) -> PeriodWindow {
    let last_day = last_day_of_month(date.year(), date.month());
    PeriodWindow::from_days(PeriodKind::Month, on_day(date, 1), on_day(date, last_day))
}

/// Both biweekly windows of the month containing `date`, first half first.
pub fn biweekly_windows(date: NaiveDate) -> (PeriodWindow, PeriodWindow) {
    let last_day = last_day_of_month(date.year(), date.month());

    let first_half = PeriodWindow::from_days(
        PeriodKind::Biweekly,
        on_day(date, 1),
        on_day(date, FIRST_HALF_LAST_DAY),
    );
    let second_half = PeriodWindow::from_days(
        PeriodKind::Biweekly,
        on_day(date, FIRST_HALF_LAST_DAY + 1),
        on_day(date, last_day),
    );
    (first_half, second_half)
}

/// The biweekly window containing `date`.
pub fn biweekly_window(date: NaiveDate) -> PeriodWindow {
    let (first_half, second_half) = biweekly_windows(date);
    if date.day() <= FIRST_HALF_LAST_DAY {
        first_half
    } else {
        second_half
    }
}

/// Resolves the month and biweekly windows containing `now`.
///
/// `now` is supplied by the caller; this never reads a clock.
///
/// ```
/// use chrono::NaiveDate;
/// use budget_core::resolve_periods;
///
/// let now = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let periods = resolve_periods(now);
///
/// assert_eq!(periods.month.last_day().to_string(), "2024-02-29");
/// assert_eq!(periods.biweekly.first_day().to_string(), "2024-02-16");
/// assert_eq!(periods.biweekly.last_day().to_string(), "2024-02-29");
/// ```
pub fn resolve_periods(now: NaiveDateTime) -> ResolvedPeriods {
    let today = now.date();
    ResolvedPeriods {
        today,
        month: month_window(today),
        biweekly: biweekly_window(today),
    }
}
