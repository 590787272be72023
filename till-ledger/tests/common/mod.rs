#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use shared::order::{DiscountDraft, LineDraft, OrderDraft, TenderMethod};
use sqlx::SqlitePool;
use std::sync::Arc;
use till_ledger::{Config, DbService, ManualClock, OrderStore, SalesReporter};

pub const STAFF: &str = "staff000001";
pub const BURGER: &str = "item000001";
pub const FRIES: &str = "item000002";
pub const CHEESE: &str = "option000001";
pub const STAFF_DISCOUNT: &str = "discount000001";

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Catalog rows referenced by the sample drafts
pub async fn seed_catalog(pool: &SqlitePool) {
    let statements = [
        "INSERT INTO staff (staff_id, pin, first_name, last_name, hourly_wage_cents, is_admin) \
         VALUES ('staff000001', '1234', 'Ada', 'Till', 1500, 1)",
        "INSERT INTO categories (category_id, name, sort_order) VALUES ('category000001', 'Mains', 1)",
        "INSERT INTO items (item_id, category_id, name, regular_price_cents, event_price_cents, sort_order, available) \
         VALUES ('item000001', 'category000001', 'Burger', 850, 900, 1, 1)",
        "INSERT INTO items (item_id, category_id, name, regular_price_cents, event_price_cents, sort_order, available) \
         VALUES ('item000002', 'category000001', 'Fries', 300, 350, 2, 1)",
        "INSERT INTO modifiers (modifier_id, item_id, name, single_selection, sort_order) \
         VALUES ('modifier000001', 'item000001', 'Extras', 0, 1)",
        "INSERT INTO options (option_id, modifier_id, name, price_cents, available, sort_order) \
         VALUES ('option000001', 'modifier000001', 'Cheese', 75, 1, 1)",
        "INSERT INTO discounts (discount_id, name, is_percentage, amount_cents, available, sort_order) \
         VALUES ('discount000001', 'Staff', 1, 1000, 1, 1)",
    ];
    for sql in statements {
        sqlx::query(sql).execute(pool).await.unwrap();
    }
}

pub struct Ledger {
    pub db: DbService,
    pub clock: Arc<ManualClock>,
    pub store: OrderStore,
    pub reporter: SalesReporter,
}

pub async fn ledger_with(config: Config, now: DateTime<Utc>) -> Ledger {
    let db = DbService::in_memory().await.unwrap();
    seed_catalog(&db.pool).await;
    let clock = Arc::new(ManualClock::new(now));
    let store = OrderStore::new(db.pool.clone(), &config).with_clock(clock.clone());
    let reporter = SalesReporter::new(db.pool.clone(), &config).with_clock(clock.clone());
    Ledger {
        db,
        clock,
        store,
        reporter,
    }
}

pub async fn ledger(now: DateTime<Utc>) -> Ledger {
    ledger_with(Config::default(), now).await
}

/// Two burgers (one with cheese), one fries, a staff discount, paid cash
pub fn sample_draft() -> OrderDraft {
    let burger = LineDraft::new(BURGER, 2, dec("8.50")).with_option(CHEESE, dec("0.75"));
    let fries = LineDraft::new(FRIES, 1, dec("3.00"));
    OrderDraft {
        staff_id: STAFF.into(),
        tender: TenderMethod::Cash,
        subtotal: dec("21.50"),
        tax: dec("1.72"),
        tip: Decimal::ZERO,
        card_fee: Decimal::ZERO,
        total: dec("21.07"),
        tendered: Some(dec("25.00")),
        change: Some(dec("3.93")),
        lines: vec![burger, fries],
        discounts: vec![DiscountDraft::new(STAFF_DISCOUNT, dec("2.15"))],
    }
}

/// Single fries line settled with `tender` for `total`
pub fn simple_draft(tender: TenderMethod, total: &str) -> OrderDraft {
    OrderDraft {
        staff_id: STAFF.into(),
        tender,
        subtotal: dec(total),
        tax: Decimal::ZERO,
        tip: Decimal::ZERO,
        card_fee: Decimal::ZERO,
        total: dec(total),
        tendered: None,
        change: None,
        lines: vec![LineDraft::new(FRIES, 1, dec(total))],
        discounts: vec![],
    }
}
