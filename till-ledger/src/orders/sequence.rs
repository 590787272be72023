//! Daily display number
//!
//! The number printed on a ticket: `MAX + 1` over the orders created in the
//! current local day, starting at 1. Above the ceiling it wraps back to 1,
//! so a busy day can repeat numbers. Only the order id is unique.

use super::error::LedgerResult;
use crate::utils::time;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::SqliteConnection;

/// Default wrap point
pub const DEFAULT_CEILING: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySequence {
    ceiling: i32,
}

impl DisplaySequence {
    pub fn new(ceiling: i32) -> Self {
        Self {
            ceiling: ceiling.max(1),
        }
    }

    pub fn ceiling(&self) -> i32 {
        self.ceiling
    }

    /// Next number given the day's current maximum (`None` when no orders yet)
    pub fn next_after(&self, max: Option<i32>) -> i32 {
        match max {
            Some(m) if m >= self.ceiling => 1,
            Some(m) if m >= 1 => m + 1,
            _ => 1,
        }
    }

    /// Compute the next number for the local day containing `now`
    ///
    /// Runs on the caller's connection so the MAX read and the insert that
    /// follows share one transaction.
    pub async fn next_display_number(
        &self,
        conn: &mut SqliteConnection,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> LedgerResult<i32> {
        let (start, end) = time::day_window(now, tz);

        let max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(order_number) FROM orders WHERE created_at >= ? AND created_at < ?",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&mut *conn)
        .await?;

        let next = self.next_after(max);
        if max.is_some_and(|m| m >= self.ceiling) {
            tracing::warn!(ceiling = self.ceiling, "Display number wrapped to 1");
        }
        tracing::debug!(day_start = start, ?max, next, "Display number computed");
        Ok(next)
    }
}

impl Default for DisplaySequence {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING)
    }
}
