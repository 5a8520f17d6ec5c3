//! Business-hours accounting
//!
//! Elapsed stage time is counted in business minutes: 09:00-17:00 UTC,
//! Monday through Friday, excluding calendar holidays. An interval whose
//! business-minute total rounds to zero (it fell entirely outside the
//! business window) falls back to raw calendar minutes floored at one, so a
//! stage that visibly took real time never reports zero.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use review_types::{StageOwner, StageWindow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Business day opens at 09:00 UTC
pub const BUSINESS_DAY_START: u32 = 9;
/// Business day closes at 17:00 UTC
pub const BUSINESS_DAY_END: u32 = 17;

/// Calendar of non-working dates, loadable from configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_holidays(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: dates.into_iter().collect(),
        }
    }

    /// Fixed-date US federal holidays for the given years
    pub fn us_federal_fixed(years: impl IntoIterator<Item = i32>) -> Self {
        let mut holidays = BTreeSet::new();
        for year in years {
            for (month, day) in [(1, 1), (6, 19), (7, 4), (11, 11), (12, 25)] {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    holidays.insert(date);
                }
            }
        }
        Self { holidays }
    }

    pub fn add(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }
}

/// Whole business minutes between `start` and `end`, clipping each business
/// day to the 09:00-17:00 window
pub fn business_minutes_between(
    calendar: &HolidayCalendar,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> i64 {
    if end <= start {
        return 0;
    }

    let mut total = 0;
    let mut day = start.date_naive();
    let last = end.date_naive();

    while day <= last {
        if calendar.is_business_day(day) {
            if let (Some(open), Some(close)) = (
                day.and_hms_opt(BUSINESS_DAY_START, 0, 0),
                day.and_hms_opt(BUSINESS_DAY_END, 0, 0),
            ) {
                let lo = open.and_utc().max(start);
                let hi = close.and_utc().min(end);
                if hi > lo {
                    total += (hi - lo).num_minutes();
                }
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    total
}

/// Elapsed minutes to charge for a closed sub-interval: business minutes,
/// or raw calendar minutes floored at one when the business total is zero
pub fn elapsed_stage_minutes(
    calendar: &HolidayCalendar,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> i64 {
    if end <= start {
        return 0;
    }
    let business = business_minutes_between(calendar, start, end);
    if business > 0 {
        business
    } else {
        (end - start).num_minutes().max(1)
    }
}

/// Close a stage window, charging the elapsed minutes to its current owner
pub fn close_window(calendar: &HolidayCalendar, window: &mut StageWindow, now: DateTime<Utc>) {
    if let Some(opened) = window.take_opened_at() {
        window.charge(elapsed_stage_minutes(calendar, opened, now));
    }
}

/// Flip ownership of an open stage window: charge the closing sub-interval
/// to the old owner, then reopen for the new owner at `now`
pub fn flip_window(
    calendar: &HolidayCalendar,
    window: &mut StageWindow,
    new_owner: StageOwner,
    now: DateTime<Utc>,
) {
    close_window(calendar, window, now);
    window.open(new_owner, now);
}
