//! Order store
//!
//! Owns atomic persistence of the order aggregate and its reconstruction.
//!
//! # Writes
//!
//! `create` opens a `BEGIN IMMEDIATE` transaction, so concurrent registers
//! queue on the SQLite write lock (bounded by the busy timeout) instead of
//! failing a read→write upgrade. Inside it:
//!
//! ```text
//! display number (MAX over today) → order id → header row
//!   → per line: line id → line row → per option: option id → option row
//!   → per discount: discount id → discount row
//!   → read back → COMMIT
//! ```
//!
//! Any error drops the transaction, which rolls everything back.
//!
//! # Reads
//!
//! A read runs four windowed queries (headers, lines, options, discounts)
//! in one transaction and assembles the aggregates in memory. Children keep
//! insertion (`rowid`) order; orders are newest first.

use super::clock::{Clock, SystemClock};
use super::error::{LedgerError, LedgerResult};
use super::ids::{IdGenerator, IdKind};
use super::money::{to_cents, to_cents_opt};
use super::rows::{
    ChildRow, DISCOUNT_COLUMNS, DiscountRow, LINE_COLUMNS, LINE_OPTION_COLUMNS, LineOptionRow,
    LineRow, ORDER_COLUMNS, OrderRow,
};
use super::sequence::DisplaySequence;
use super::validation::{validate_date_range, validate_draft};
use crate::core::{Config, RefundPolicy};
use crate::utils::time;
use chrono::NaiveDate;
use chrono_tz::Tz;
use futures::TryStreamExt;
use shared::order::{AppliedDiscount, LineOption, Order, OrderDraft, OrderLine, OrderStatus};
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Query scope
// ============================================================================

/// Which orders a read covers
#[derive(Debug, Clone, Copy)]
enum Scope<'q> {
    /// `created_at` in `[start, end)`
    Window { start: i64, end: i64 },
    Order(&'q str),
}

impl<'q> Scope<'q> {
    /// Filter on the `orders o` alias
    fn filter(&self) -> &'static str {
        match self {
            Scope::Window { .. } => "o.created_at >= ? AND o.created_at < ?",
            Scope::Order(_) => "o.order_id = ?",
        }
    }

    fn bind<O>(
        self,
        query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        match self {
            Scope::Window { start, end } => query.bind(start).bind(end),
            Scope::Order(order_id) => query.bind(order_id),
        }
    }
}

/// Run a child query and group its rows by parent id, preserving row order
async fn fetch_grouped<'q, O>(
    conn: &mut SqliteConnection,
    query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
) -> LedgerResult<HashMap<String, Vec<O>>>
where
    O: ChildRow + for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut groups: HashMap<String, Vec<O>> = HashMap::new();
    let mut rows = query.fetch(&mut *conn);
    while let Some(row) = rows.try_next().await? {
        groups.entry(row.parent_id().to_string()).or_default().push(row);
    }
    Ok(groups)
}

/// Load and assemble every order in `scope`, newest first
async fn load_orders(conn: &mut SqliteConnection, scope: Scope<'_>) -> LedgerResult<Vec<Order>> {
    let filter = scope.filter();

    let header_sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders o WHERE {filter} \
         ORDER BY o.created_at DESC, o.order_id DESC"
    );
    let headers: Vec<OrderRow> = scope
        .bind(sqlx::query_as(&header_sql))
        .fetch_all(&mut *conn)
        .await?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let line_sql = format!(
        "SELECT {LINE_COLUMNS} FROM order_lines l \
         JOIN orders o ON o.order_id = l.order_id \
         LEFT JOIN items i ON i.item_id = l.item_id \
         WHERE {filter} ORDER BY l.rowid"
    );
    let mut lines =
        fetch_grouped(&mut *conn, scope.bind(sqlx::query_as::<_, LineRow>(&line_sql))).await?;

    let option_sql = format!(
        "SELECT {LINE_OPTION_COLUMNS} FROM order_line_options lo \
         JOIN order_lines l ON l.line_id = lo.line_id \
         JOIN orders o ON o.order_id = l.order_id \
         LEFT JOIN options op ON op.option_id = lo.option_id \
         WHERE {filter} ORDER BY lo.rowid"
    );
    let mut options = fetch_grouped(
        &mut *conn,
        scope.bind(sqlx::query_as::<_, LineOptionRow>(&option_sql)),
    )
    .await?;

    let discount_sql = format!(
        "SELECT {DISCOUNT_COLUMNS} FROM order_discounts d \
         JOIN orders o ON o.order_id = d.order_id \
         LEFT JOIN discounts cd ON cd.discount_id = d.discount_id \
         WHERE {filter} ORDER BY d.rowid"
    );
    let mut discounts = fetch_grouped(
        &mut *conn,
        scope.bind(sqlx::query_as::<_, DiscountRow>(&discount_sql)),
    )
    .await?;

    let orders = headers
        .into_iter()
        .map(|header| {
            let order_lines: Vec<OrderLine> = lines
                .remove(&header.order_id)
                .unwrap_or_default()
                .into_iter()
                .map(|line| {
                    let line_options: Vec<LineOption> = options
                        .remove(&line.line_id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(LineOption::from)
                        .collect();
                    line.into_line(line_options)
                })
                .collect();
            let order_discounts: Vec<AppliedDiscount> = discounts
                .remove(&header.order_id)
                .unwrap_or_default()
                .into_iter()
                .map(AppliedDiscount::from)
                .collect();
            header.into_order(order_lines, order_discounts)
        })
        .collect();

    Ok(orders)
}

// ============================================================================
// OrderStore
// ============================================================================

/// Persistence for order aggregates
///
/// Cheap to clone; clones share the pool, identifier generator and clock.
#[derive(Clone)]
pub struct OrderStore {
    pool: SqlitePool,
    ids: Arc<IdGenerator>,
    sequence: DisplaySequence,
    clock: Arc<dyn Clock>,
    tz: Tz,
    refund_policy: RefundPolicy,
}

impl OrderStore {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            ids: Arc::new(IdGenerator::new(config.id_max_attempts)),
            sequence: DisplaySequence::new(config.display_number_ceiling),
            clock: Arc::new(SystemClock),
            tz: config.timezone,
            refund_policy: config.refund_policy,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn with_refund_policy(mut self, policy: RefundPolicy) -> Self {
        self.refund_policy = policy;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn refund_policy(&self) -> RefundPolicy {
        self.refund_policy
    }

    // ========== Create ==========

    /// Persist a new order atomically
    ///
    /// Returns the stored aggregate with identifiers, display number,
    /// timestamp and joined catalog data. On any error nothing is written.
    pub async fn create(&self, draft: OrderDraft) -> LedgerResult<Order> {
        validate_draft(&draft)?;

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let now = self.clock.now();
        let created_at = now.timestamp_millis();
        let order_number = self.sequence.next_display_number(&mut tx, now, self.tz).await?;
        let order_id = self.ids.generate(&mut *tx, IdKind::Order).await?;

        sqlx::query(
            "INSERT INTO orders (order_id, staff_id, order_number, tender, subtotal_cents, \
             tax_cents, tip_cents, card_fee_cents, total_cents, tendered_cents, change_cents, \
             status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&order_id)
        .bind(&draft.staff_id)
        .bind(order_number)
        .bind(draft.tender)
        .bind(to_cents(draft.subtotal, "subtotal")?)
        .bind(to_cents(draft.tax, "tax")?)
        .bind(to_cents(draft.tip, "tip")?)
        .bind(to_cents(draft.card_fee, "card_fee")?)
        .bind(to_cents(draft.total, "total")?)
        .bind(to_cents_opt(draft.tendered, "tendered")?)
        .bind(to_cents_opt(draft.change, "change")?)
        .bind(OrderStatus::Created)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        for line in &draft.lines {
            let line_id = self.ids.generate(&mut *tx, IdKind::OrderLine).await?;
            sqlx::query(
                "INSERT INTO order_lines (line_id, order_id, item_id, quantity, \
                 unit_price_cents, line_total_cents) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&line_id)
            .bind(&order_id)
            .bind(&line.item_id)
            .bind(line.quantity)
            .bind(to_cents(line.unit_price, "unit_price")?)
            .bind(to_cents(line.line_total, "line_total")?)
            .execute(&mut *tx)
            .await?;

            for option in &line.options {
                let line_option_id = self.ids.generate(&mut *tx, IdKind::LineOption).await?;
                sqlx::query(
                    "INSERT INTO order_line_options (line_option_id, line_id, option_id, price_cents) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(&line_option_id)
                .bind(&line_id)
                .bind(&option.option_id)
                .bind(to_cents(option.price, "option price")?)
                .execute(&mut *tx)
                .await?;
            }
        }

        for discount in &draft.discounts {
            let applied_discount_id = self.ids.generate(&mut *tx, IdKind::AppliedDiscount).await?;
            sqlx::query(
                "INSERT INTO order_discounts (applied_discount_id, order_id, discount_id, amount_cents) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&applied_discount_id)
            .bind(&order_id)
            .bind(&discount.discount_id)
            .bind(to_cents(discount.amount, "discount amount")?)
            .execute(&mut *tx)
            .await?;
        }

        let order = load_orders(&mut tx, Scope::Order(&order_id))
            .await?
            .pop()
            .ok_or_else(|| LedgerError::NotFound(order_id.clone()))?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.order_id,
            order_number = order.order_number,
            tender = %order.tender,
            total = %order.total,
            lines = order.lines.len(),
            "Order recorded"
        );
        Ok(order)
    }

    // ========== Read ==========

    /// Orders created in `[start_ms, end_ms)`, newest first
    pub async fn find_by_date_range(&self, start_ms: i64, end_ms: i64) -> LedgerResult<Vec<Order>> {
        if start_ms >= end_ms {
            return Ok(Vec::new());
        }
        let mut tx = self.pool.begin().await?;
        let orders = load_orders(
            &mut tx,
            Scope::Window {
                start: start_ms,
                end: end_ms,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(start_ms, end_ms, count = orders.len(), "Orders loaded");
        Ok(orders)
    }

    pub async fn find_by_id(&self, order_id: &str) -> LedgerResult<Order> {
        let mut tx = self.pool.begin().await?;
        let order = load_orders(&mut tx, Scope::Order(order_id)).await?.pop();
        tx.commit().await?;
        order.ok_or_else(|| LedgerError::NotFound(order_id.to_string()))
    }

    /// Orders of one local calendar day
    pub async fn find_for_day(&self, date: NaiveDate) -> LedgerResult<Vec<Order>> {
        let (start, end) = time::dates_window(date, date, self.tz);
        self.find_by_date_range(start, end).await
    }

    pub async fn find_today(&self) -> LedgerResult<Vec<Order>> {
        let today = time::local_date(self.clock.now(), self.tz);
        self.find_for_day(today).await
    }

    /// Orders from the start of `first` to the end of `last`, both inclusive
    pub async fn find_for_dates(&self, first: NaiveDate, last: NaiveDate) -> LedgerResult<Vec<Order>> {
        validate_date_range(first, last)?;
        let (start, end) = time::dates_window(first, last, self.tz);
        self.find_by_date_range(start, end).await
    }

    // ========== Refund ==========

    /// Mark an order refunded
    ///
    /// Under [`RefundPolicy::Strict`] a missing order fails with `NotFound`
    /// and an already refunded one with `Conflict`. Under
    /// [`RefundPolicy::Permissive`] the update is issued unconditionally.
    pub async fn refund(&self, order_id: &str) -> LedgerResult<()> {
        match self.refund_policy {
            RefundPolicy::Permissive => {
                let result = sqlx::query("UPDATE orders SET status = ? WHERE order_id = ?")
                    .bind(OrderStatus::Refunded)
                    .bind(order_id)
                    .execute(&self.pool)
                    .await?;
                if result.rows_affected() == 0 {
                    tracing::warn!(order_id, "Refund matched no order");
                } else {
                    tracing::info!(order_id, "Order refunded");
                }
                Ok(())
            }
            RefundPolicy::Strict => {
                let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

                let status: Option<OrderStatus> =
                    sqlx::query_scalar("SELECT status FROM orders WHERE order_id = ?")
                        .bind(order_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                match status {
                    None => {
                        tracing::warn!(order_id, "Refund refused: order not found");
                        Err(LedgerError::NotFound(order_id.to_string()))
                    }
                    Some(status) if !status.can_refund() => {
                        tracing::warn!(order_id, %status, "Refund refused: order already refunded");
                        Err(LedgerError::Conflict {
                            order_id: order_id.to_string(),
                            status: status.to_string(),
                        })
                    }
                    Some(_) => {
                        sqlx::query("UPDATE orders SET status = ? WHERE order_id = ?")
                            .bind(OrderStatus::Refunded)
                            .bind(order_id)
                            .execute(&mut *tx)
                            .await?;
                        tx.commit().await?;
                        tracing::info!(order_id, "Order refunded");
                        Ok(())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::orders::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use shared::order::{LineDraft, TenderMethod};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn card_draft(total: &str) -> OrderDraft {
        OrderDraft {
            staff_id: "staff000001".into(),
            tender: TenderMethod::Card,
            subtotal: dec(total),
            tax: Decimal::ZERO,
            tip: Decimal::ZERO,
            card_fee: Decimal::ZERO,
            total: dec(total),
            tendered: None,
            change: None,
            lines: vec![LineDraft::new("item000001", 1, dec(total))],
            discounts: vec![],
        }
    }

    async fn store_at(clock: Arc<ManualClock>) -> OrderStore {
        let db = DbService::in_memory().await.unwrap();
        OrderStore::new(db.pool, &Config::default()).with_clock(clock)
    }

    #[tokio::test]
    async fn test_create_then_find_by_id() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()));
        let store = store_at(clock.clone()).await;

        let order = store.create(card_draft("4.50")).await.unwrap();
        assert!(order.order_id.starts_with("sale"));
        assert_eq!(order.order_number, 1);
        assert_eq!(order.created_at, clock.now_millis());
        assert_eq!(order.status, OrderStatus::Created);
        assert!(order.lines[0].line_id.starts_with("line"));

        let found = store.find_by_id(&order.order_id).await.unwrap();
        assert_eq!(found, order);
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = store_at(clock).await;
        let err = store.find_by_id("sale000000").await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(id) if id == "sale000000"));
    }

    #[tokio::test]
    async fn test_range_is_half_open() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(at));
        let store = store_at(clock).await;
        let order = store.create(card_draft("1.00")).await.unwrap();

        let t = order.created_at;
        assert_eq!(store.find_by_date_range(t, t + 1).await.unwrap().len(), 1);
        assert!(store.find_by_date_range(t - 1000, t).await.unwrap().is_empty());
        assert!(store.find_by_date_range(t + 1, t).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_draft_writes_nothing() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = store_at(clock).await;

        let mut draft = card_draft("2.00");
        draft.lines[0].quantity = 0;
        let err = store.create(draft).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_find_for_dates_rejects_reversed_range() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = store_at(clock).await;
        let first = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = store.find_for_dates(first, last).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));
    }
}
