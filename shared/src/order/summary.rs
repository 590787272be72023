//! Sales summary over a time window

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregated figures for the orders created in a window
///
/// Refunded orders are still counted in the totals; `refunded_orders` and
/// `refunded_sales` report them separately so callers can net them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_orders: i64,
    /// Sum of order totals
    pub gross_sales: Decimal,
    /// Sum of order subtotals
    pub net_sales: Decimal,
    pub total_tax: Decimal,
    pub total_tips: Decimal,
    pub cash_sales: Decimal,
    /// Everything that is not cash
    pub card_sales: Decimal,
    pub cash_orders: i64,
    pub card_orders: i64,
    /// Sum of applied discount amounts
    pub total_discounts: Decimal,
    pub refunded_orders: i64,
    pub refunded_sales: Decimal,
}

impl SalesSummary {
    /// Gross sales per order, rounded to cents; zero when there are no orders
    pub fn average_ticket(&self) -> Decimal {
        if self.total_orders == 0 {
            return Decimal::ZERO;
        }
        (self.gross_sales / Decimal::from(self.total_orders)).round_dp(2)
    }

    pub fn is_empty(&self) -> bool {
        self.total_orders == 0
    }
}
