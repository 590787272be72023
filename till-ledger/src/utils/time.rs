//! Business calendar helpers
//!
//! The store and reporter only see `i64` Unix millis; every date → millis
//! conversion goes through here using the configured zone.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Granularity used to walk out of a DST gap; every zone transition
/// lands on a quarter hour
const GAP_STEP_MINUTES: i64 = 15;

/// Local wall time → Unix millis
///
/// A wall time inside a DST gap resolves to the first local instant after
/// the gap, so a day whose midnight is skipped starts when its clocks do.
fn local_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    let step = Duration::minutes(GAP_STEP_MINUTES);
    let mut wall = naive;
    for _ in 0..(24 * 60 / GAP_STEP_MINUTES) {
        if let Some(dt) = wall.and_local_timezone(tz).earliest() {
            return dt.timestamp_millis();
        }
        wall += step;
    }
    naive.and_utc().timestamp_millis()
}

/// Local midnight starting `date`
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    local_to_millis(date.and_time(NaiveTime::MIN), tz)
}

/// Local midnight ending `date` (start of the next day); use with `< end`
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Local calendar date of an instant
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// `[start, end)` of the local day containing `now`
pub fn day_window(now: DateTime<Utc>, tz: Tz) -> (i64, i64) {
    let date = local_date(now, tz);
    (day_start_millis(date, tz), day_end_millis(date, tz))
}

/// `[start of first, end of last)`, both dates inclusive
pub fn dates_window(first: NaiveDate, last: NaiveDate, tz: Tz) -> (i64, i64) {
    (day_start_millis(first, tz), day_end_millis(last, tz))
}
