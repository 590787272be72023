//! Order drafts: what a register submits before anything is persisted
//!
//! Drafts carry no identifiers, no timestamp and no display number; the
//! store assigns all of those when it records the sale.

use super::TenderMethod;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sale as assembled by the register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub staff_id: String,
    pub tender: TenderMethod,
    pub subtotal: Decimal,
    pub tax: Decimal,
    #[serde(default)]
    pub tip: Decimal,
    #[serde(default)]
    pub card_fee: Decimal,
    /// Expected to equal subtotal + tax + tip + card_fee - discounts (not enforced)
    pub total: Decimal,
    /// Cash handed over (cash tenders only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tendered: Option<Decimal>,
    /// Change returned (cash tenders only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub lines: Vec<LineDraft>,
    #[serde(default)]
    pub discounts: Vec<DiscountDraft>,
}

/// One catalog item sold, with the price captured at sale time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDraft {
    pub item_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    #[serde(default)]
    pub options: Vec<LineOptionDraft>,
}

/// A modifier option chosen for a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOptionDraft {
    pub option_id: String,
    pub price: Decimal,
}

/// A catalog discount applied to the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountDraft {
    pub discount_id: String,
    /// Amount actually taken off, not the catalog's configured value
    pub amount: Decimal,
}

impl LineDraft {
    /// Line with `line_total = unit_price * quantity` and no options
    pub fn new(item_id: impl Into<String>, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            unit_price,
            line_total: unit_price * Decimal::from(quantity),
            options: Vec::new(),
        }
    }

    /// Add an option; its price counts once per unit toward the line total
    pub fn with_option(mut self, option_id: impl Into<String>, price: Decimal) -> Self {
        self.line_total += price * Decimal::from(self.quantity);
        self.options.push(LineOptionDraft {
            option_id: option_id.into(),
            price,
        });
        self
    }
}

impl DiscountDraft {
    pub fn new(discount_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            discount_id: discount_id.into(),
            amount,
        }
    }
}

impl OrderDraft {
    /// Sum of applied discount amounts
    pub fn discount_total(&self) -> Decimal {
        self.discounts.iter().map(|d| d.amount).sum()
    }

    /// `subtotal + tax + tip + card_fee - discounts`
    pub fn expected_total(&self) -> Decimal {
        self.subtotal + self.tax + self.tip + self.card_fee - self.discount_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_line_with_options_accumulates_total() {
        let line = LineDraft::new("item000001", 2, money("4.50")).with_option("option000001", money("0.75"));
        assert_eq!(line.line_total, money("10.50"));
        assert_eq!(line.options.len(), 1);
    }

    #[test]
    fn test_expected_total_subtracts_discounts() {
        let draft = OrderDraft {
            staff_id: "staff000001".into(),
            tender: TenderMethod::Card,
            subtotal: money("20.00"),
            tax: money("1.60"),
            tip: money("3.00"),
            card_fee: money("0.50"),
            total: money("23.10"),
            tendered: None,
            change: None,
            lines: vec![],
            discounts: vec![DiscountDraft::new("discount000001", money("2.00"))],
        };
        assert_eq!(draft.expected_total(), draft.total);
    }

    #[test]
    fn test_draft_deserializes_without_optional_sections() {
        let json = r#"{"staff_id":"staff000001","tender":"cash","subtotal":"5.00","tax":"0.40","total":"5.40"}"#;
        let draft: OrderDraft = serde_json::from_str(json).unwrap();
        assert!(draft.lines.is_empty());
        assert_eq!(draft.tip, Decimal::ZERO);
        assert!(draft.tendered.is_none());
    }
}
