//! Database row shapes for the order tables
//!
//! Catalog columns come from LEFT JOINs wrapped in `COALESCE`, so a deleted
//! catalog row decodes as empty/zero values instead of failing the read.

use super::money::from_cents;
use shared::models::{CatalogDiscount, CatalogItem, CatalogOption};
use shared::order::{AppliedDiscount, LineOption, Order, OrderLine, OrderStatus, TenderMethod};

#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub order_id: String,
    pub staff_id: String,
    pub order_number: i32,
    pub tender: TenderMethod,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tip_cents: i64,
    pub card_fee_cents: i64,
    pub total_cents: i64,
    pub tendered_cents: Option<i64>,
    pub change_cents: Option<i64>,
    pub status: OrderStatus,
    pub created_at: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LineRow {
    pub line_id: String,
    pub order_id: String,
    pub item_id: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub item_name: String,
    pub item_category_id: String,
    pub item_regular_price_cents: i64,
    pub item_event_price_cents: i64,
    pub item_sort_order: i32,
    pub item_available: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LineOptionRow {
    pub line_option_id: String,
    pub line_id: String,
    pub option_id: String,
    pub price_cents: i64,
    pub option_modifier_id: String,
    pub option_name: String,
    pub option_price_cents: i64,
    pub option_available: bool,
    pub option_sort_order: i32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct DiscountRow {
    pub applied_discount_id: String,
    pub order_id: String,
    pub discount_id: String,
    pub amount_cents: i64,
    pub discount_name: String,
    pub discount_is_percentage: bool,
    pub discount_amount_cents: i64,
    pub discount_available: bool,
    pub discount_sort_order: i32,
}

/// Child row keyed by the id of the record that owns it
pub trait ChildRow {
    fn parent_id(&self) -> &str;
}

impl ChildRow for LineRow {
    fn parent_id(&self) -> &str {
        &self.order_id
    }
}

impl ChildRow for LineOptionRow {
    fn parent_id(&self) -> &str {
        &self.line_id
    }
}

impl ChildRow for DiscountRow {
    fn parent_id(&self) -> &str {
        &self.order_id
    }
}

// ========== Column lists ==========

pub const ORDER_COLUMNS: &str = "o.order_id, o.staff_id, o.order_number, o.tender, \
    o.subtotal_cents, o.tax_cents, o.tip_cents, o.card_fee_cents, o.total_cents, \
    o.tendered_cents, o.change_cents, o.status, o.created_at";

pub const LINE_COLUMNS: &str = "l.line_id, l.order_id, l.item_id, l.quantity, \
    l.unit_price_cents, l.line_total_cents, \
    COALESCE(i.name, '') AS item_name, \
    COALESCE(i.category_id, '') AS item_category_id, \
    COALESCE(i.regular_price_cents, 0) AS item_regular_price_cents, \
    COALESCE(i.event_price_cents, 0) AS item_event_price_cents, \
    COALESCE(i.sort_order, 0) AS item_sort_order, \
    COALESCE(i.available, 0) AS item_available";

pub const LINE_OPTION_COLUMNS: &str = "lo.line_option_id, lo.line_id, lo.option_id, lo.price_cents, \
    COALESCE(op.modifier_id, '') AS option_modifier_id, \
    COALESCE(op.name, '') AS option_name, \
    COALESCE(op.price_cents, 0) AS option_price_cents, \
    COALESCE(op.available, 0) AS option_available, \
    COALESCE(op.sort_order, 0) AS option_sort_order";

pub const DISCOUNT_COLUMNS: &str = "d.applied_discount_id, d.order_id, d.discount_id, d.amount_cents, \
    COALESCE(cd.name, '') AS discount_name, \
    COALESCE(cd.is_percentage, 0) AS discount_is_percentage, \
    COALESCE(cd.amount_cents, 0) AS discount_amount_cents, \
    COALESCE(cd.available, 0) AS discount_available, \
    COALESCE(cd.sort_order, 0) AS discount_sort_order";

// ========== Row → domain ==========

impl OrderRow {
    pub fn into_order(self, lines: Vec<OrderLine>, discounts: Vec<AppliedDiscount>) -> Order {
        Order {
            order_id: self.order_id,
            staff_id: self.staff_id,
            order_number: self.order_number,
            tender: self.tender,
            subtotal: from_cents(self.subtotal_cents),
            tax: from_cents(self.tax_cents),
            tip: from_cents(self.tip_cents),
            card_fee: from_cents(self.card_fee_cents),
            total: from_cents(self.total_cents),
            tendered: self.tendered_cents.map(from_cents),
            change: self.change_cents.map(from_cents),
            status: self.status,
            created_at: self.created_at,
            lines,
            discounts,
        }
    }
}

impl LineRow {
    pub fn into_line(self, options: Vec<LineOption>) -> OrderLine {
        OrderLine {
            line_id: self.line_id,
            order_id: self.order_id,
            item_id: self.item_id,
            item: CatalogItem {
                name: self.item_name,
                category_id: self.item_category_id,
                regular_price: from_cents(self.item_regular_price_cents),
                event_price: from_cents(self.item_event_price_cents),
                sort_order: self.item_sort_order,
                available: self.item_available,
            },
            quantity: self.quantity,
            unit_price: from_cents(self.unit_price_cents),
            line_total: from_cents(self.line_total_cents),
            options,
        }
    }
}

impl From<LineOptionRow> for LineOption {
    fn from(row: LineOptionRow) -> Self {
        LineOption {
            line_option_id: row.line_option_id,
            line_id: row.line_id,
            option_id: row.option_id,
            option: CatalogOption {
                modifier_id: row.option_modifier_id,
                name: row.option_name,
                price: from_cents(row.option_price_cents),
                available: row.option_available,
                sort_order: row.option_sort_order,
            },
            price: from_cents(row.price_cents),
        }
    }
}

impl From<DiscountRow> for AppliedDiscount {
    fn from(row: DiscountRow) -> Self {
        AppliedDiscount {
            applied_discount_id: row.applied_discount_id,
            order_id: row.order_id,
            discount_id: row.discount_id,
            discount: CatalogDiscount {
                name: row.discount_name,
                is_percentage: row.discount_is_percentage,
                amount: from_cents(row.discount_amount_cents),
                available: row.discount_available,
                sort_order: row.discount_sort_order,
            },
            amount: from_cents(row.amount_cents),
        }
    }
}
