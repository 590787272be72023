//! Persisted order aggregate
//!
//! An [`Order`] is what the store returns: the submitted draft plus every
//! generated field (identifiers, display number, timestamp) and the catalog
//! rows joined at read time. Captured prices live on the aggregate itself;
//! the catalog snapshots only describe what the referenced row looks like now.

use super::{DiscountDraft, LineDraft, LineOptionDraft, OrderDraft, OrderStatus, TenderMethod};
use crate::models::{CatalogDiscount, CatalogItem, CatalogOption};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order header with its owned lines and applied discounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub staff_id: String,
    /// Daily display number printed on the ticket (not unique across days)
    pub order_number: i32,
    pub tender: TenderMethod,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    pub card_fee: Decimal,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tendered: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    pub status: OrderStatus,
    /// Unix millis, stamped by the store
    pub created_at: i64,
    pub lines: Vec<OrderLine>,
    pub discounts: Vec<AppliedDiscount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_id: String,
    pub order_id: String,
    pub item_id: String,
    /// Current catalog row, `Default` when the item was deleted
    pub item: CatalogItem,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub options: Vec<LineOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOption {
    pub line_option_id: String,
    pub line_id: String,
    pub option_id: String,
    pub option: CatalogOption,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub applied_discount_id: String,
    pub order_id: String,
    pub discount_id: String,
    pub discount: CatalogDiscount,
    pub amount: Decimal,
}

impl Order {
    pub fn is_refunded(&self) -> bool {
        self.status == OrderStatus::Refunded
    }

    pub fn discount_total(&self) -> Decimal {
        self.discounts.iter().map(|d| d.amount).sum()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    /// Strip generated fields and catalog snapshots, giving back the draft
    /// this order was created from
    pub fn to_draft(&self) -> OrderDraft {
        OrderDraft {
            staff_id: self.staff_id.clone(),
            tender: self.tender,
            subtotal: self.subtotal,
            tax: self.tax,
            tip: self.tip,
            card_fee: self.card_fee,
            total: self.total,
            tendered: self.tendered,
            change: self.change,
            lines: self.lines.iter().map(OrderLine::to_draft).collect(),
            discounts: self
                .discounts
                .iter()
                .map(|d| DiscountDraft {
                    discount_id: d.discount_id.clone(),
                    amount: d.amount,
                })
                .collect(),
        }
    }
}

impl OrderLine {
    pub fn to_draft(&self) -> LineDraft {
        LineDraft {
            item_id: self.item_id.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            line_total: self.line_total,
            options: self
                .options
                .iter()
                .map(|o| LineOptionDraft {
                    option_id: o.option_id.clone(),
                    price: o.price,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_order() -> Order {
        Order {
            order_id: "sale000042".into(),
            staff_id: "staff000001".into(),
            order_number: 3,
            tender: TenderMethod::Cash,
            subtotal: money("9.00"),
            tax: money("0.72"),
            tip: Decimal::ZERO,
            card_fee: Decimal::ZERO,
            total: money("8.72"),
            tendered: Some(money("10.00")),
            change: Some(money("1.28")),
            status: OrderStatus::Created,
            created_at: 1_700_000_000_000,
            lines: vec![OrderLine {
                line_id: "line000001".into(),
                order_id: "sale000042".into(),
                item_id: "item000001".into(),
                item: CatalogItem::default(),
                quantity: 2,
                unit_price: money("4.00"),
                line_total: money("9.00"),
                options: vec![LineOption {
                    line_option_id: "lopt000001".into(),
                    line_id: "line000001".into(),
                    option_id: "option000001".into(),
                    option: CatalogOption::default(),
                    price: money("0.50"),
                }],
            }],
            discounts: vec![AppliedDiscount {
                applied_discount_id: "ldisc000001".into(),
                order_id: "sale000042".into(),
                discount_id: "discount000001".into(),
                discount: CatalogDiscount::default(),
                amount: money("1.00"),
            }],
        }
    }

    #[test]
    fn test_to_draft_drops_generated_fields() {
        let order = sample_order();
        let draft = order.to_draft();
        assert_eq!(draft.staff_id, "staff000001");
        assert_eq!(draft.lines[0].options[0].option_id, "option000001");
        assert_eq!(draft.lines[0].options[0].price, money("0.50"));
        assert_eq!(draft.discounts[0].amount, money("1.00"));
        assert_eq!(draft.expected_total(), order.total);
    }

    #[test]
    fn test_counts() {
        let order = sample_order();
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.discount_total(), money("1.00"));
        assert!(!order.is_refunded());
    }
}
