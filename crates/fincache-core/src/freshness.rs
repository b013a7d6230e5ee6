//! Freshness policy for cached company profiles.
//!
//! A stored profile may be served without contacting the provider when it was
//! written today, or when it was written on the most recent Saturday and today
//! is Sunday or Monday. The provider publishes nothing new over that window,
//! so Saturday's snapshot stays authoritative until Tuesday.
//!
//! Dates are UTC calendar dates; no timezone adjustment is applied.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};

/// Returns `true` if a record last modified on `modified_on` may be served
/// as-is on `today`.
///
/// `None` means no stored record (or no recorded modification time) and is
/// never fresh.
#[must_use]
pub fn is_fresh(modified_on: Option<NaiveDate>, today: NaiveDate) -> bool {
    let Some(modified_on) = modified_on else {
        return false;
    };

    if modified_on == today {
        return true;
    }

    match last_saturday(today) {
        Some(saturday) => modified_on == saturday,
        None => false,
    }
}

/// Convenience wrapper over [`is_fresh`] taking the stored timestamp.
#[must_use]
pub fn is_fresh_at(modified_at: Option<DateTime<Utc>>, today: NaiveDate) -> bool {
    is_fresh(modified_at.map(|ts| ts.date_naive()), today)
}

/// The Saturday whose snapshot still counts as current on `today`, if any.
///
/// Only defined for Sunday (the day before) and Monday (two days before).
fn last_saturday(today: NaiveDate) -> Option<NaiveDate> {
    match today.weekday() {
        Weekday::Sun => today.checked_sub_days(Days::new(1)),
        Weekday::Mon => today.checked_sub_days(Days::new(2)),
        _ => None,
    }
}
