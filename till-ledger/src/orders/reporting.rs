//! Sales reporting
//!
//! One aggregate statement over the order headers plus a subquery over the
//! applied discounts of the same window. No aggregates are reconstructed.

use super::clock::{Clock, SystemClock};
use super::error::LedgerResult;
use super::money::from_cents;
use super::validation::validate_date_range;
use crate::core::Config;
use crate::utils::time;
use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::order::SalesSummary;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Every optional column is a `SUM` that is NULL over zero rows
const SUMMARY_SQL: &str = "SELECT \
        COUNT(*) AS total_orders, \
        SUM(o.total_cents) AS gross_cents, \
        SUM(o.subtotal_cents) AS net_cents, \
        SUM(o.tax_cents) AS tax_cents, \
        SUM(o.tip_cents) AS tip_cents, \
        SUM(CASE WHEN o.tender = 'cash' THEN o.total_cents END) AS cash_cents, \
        SUM(CASE WHEN o.tender != 'cash' THEN o.total_cents END) AS card_cents, \
        SUM(CASE WHEN o.tender = 'cash' THEN 1 ELSE 0 END) AS cash_orders, \
        SUM(CASE WHEN o.tender != 'cash' THEN 1 ELSE 0 END) AS card_orders, \
        SUM(CASE WHEN o.status = 'refunded' THEN 1 ELSE 0 END) AS refunded_orders, \
        SUM(CASE WHEN o.status = 'refunded' THEN o.total_cents END) AS refunded_cents, \
        (SELECT SUM(d.amount_cents) FROM order_discounts d \
            JOIN orders od ON od.order_id = d.order_id \
            WHERE od.created_at >= ? AND od.created_at < ?) AS discount_cents \
    FROM orders o \
    WHERE o.created_at >= ? AND o.created_at < ?";

#[derive(Debug, Default, sqlx::FromRow)]
struct SummaryRow {
    total_orders: i64,
    gross_cents: Option<i64>,
    net_cents: Option<i64>,
    tax_cents: Option<i64>,
    tip_cents: Option<i64>,
    cash_cents: Option<i64>,
    card_cents: Option<i64>,
    cash_orders: Option<i64>,
    card_orders: Option<i64>,
    refunded_orders: Option<i64>,
    refunded_cents: Option<i64>,
    discount_cents: Option<i64>,
}

impl From<SummaryRow> for SalesSummary {
    /// NULL aggregates become zero here and nowhere else
    fn from(row: SummaryRow) -> Self {
        let money = |cents: Option<i64>| from_cents(cents.unwrap_or(0));
        SalesSummary {
            total_orders: row.total_orders,
            gross_sales: money(row.gross_cents),
            net_sales: money(row.net_cents),
            total_tax: money(row.tax_cents),
            total_tips: money(row.tip_cents),
            cash_sales: money(row.cash_cents),
            card_sales: money(row.card_cents),
            cash_orders: row.cash_orders.unwrap_or(0),
            card_orders: row.card_orders.unwrap_or(0),
            total_discounts: money(row.discount_cents),
            refunded_orders: row.refunded_orders.unwrap_or(0),
            refunded_sales: money(row.refunded_cents),
        }
    }
}

/// Aggregated reads over the order tables
#[derive(Clone)]
pub struct SalesReporter {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl SalesReporter {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            clock: Arc::new(SystemClock),
            tz: config.timezone,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Summary of orders created in `[start_ms, end_ms)`
    pub async fn summarize(&self, start_ms: i64, end_ms: i64) -> LedgerResult<SalesSummary> {
        let row: SummaryRow = sqlx::query_as(SUMMARY_SQL)
            .bind(start_ms)
            .bind(end_ms)
            .bind(start_ms)
            .bind(end_ms)
            .fetch_one(&self.pool)
            .await?;

        let summary = SalesSummary::from(row);
        tracing::debug!(
            start_ms,
            end_ms,
            total_orders = summary.total_orders,
            gross_sales = %summary.gross_sales,
            "Sales summarized"
        );
        Ok(summary)
    }

    pub async fn summarize_day(&self, date: NaiveDate) -> LedgerResult<SalesSummary> {
        let (start, end) = time::dates_window(date, date, self.tz);
        self.summarize(start, end).await
    }

    /// Inclusive calendar dates; a reversed range is a validation error
    pub async fn summarize_dates(&self, first: NaiveDate, last: NaiveDate) -> LedgerResult<SalesSummary> {
        validate_date_range(first, last)?;
        let (start, end) = time::dates_window(first, last, self.tz);
        self.summarize(start, end).await
    }

    pub async fn summarize_today(&self) -> LedgerResult<SalesSummary> {
        let today = time::local_date(self.clock.now(), self.tz);
        self.summarize_day(today).await
    }
}
