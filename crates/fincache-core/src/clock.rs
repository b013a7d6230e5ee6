//! Server clock abstraction.
//!
//! Every `modified_at` stamp and every freshness decision reads the time
//! through a [`Clock`], so the store and the orchestrator agree on "now" and
//! tests can pin the calendar.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use std::fmt::Debug;
use std::sync::Mutex;

/// Source of the current UTC time.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant, truncated to microsecond precision so it
    /// survives a round trip through the store unchanged.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now.trunc_subsecs(6)),
        }
    }

    /// Create a clock frozen at noon UTC on `date`.
    #[must_use]
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
        Self::new(noon)
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = now.trunc_subsecs(6);
    }

    /// Move the clock to noon UTC on `date`.
    pub fn set_date(&self, date: NaiveDate) {
        self.set(date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc());
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
