//! Catalog snapshots joined onto order records
//!
//! Each type mirrors the catalog row at read time. When the row has been
//! deleted the order still reads back, carrying `Default` values here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog item as joined onto an order line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub category_id: String,
    /// Current regular price (NOT the price the line was sold at)
    pub regular_price: Decimal,
    pub event_price: Decimal,
    pub sort_order: i32,
    pub available: bool,
}

/// Catalog modifier option as joined onto a line option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub modifier_id: String,
    pub name: String,
    pub price: Decimal,
    pub available: bool,
    pub sort_order: i32,
}

/// Catalog discount as joined onto an applied discount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDiscount {
    pub name: String,
    pub is_percentage: bool,
    /// Percentage or flat value currently configured
    pub amount: Decimal,
    pub available: bool,
    pub sort_order: i32,
}

impl CatalogItem {
    /// Whether the joined row was missing (deleted from the catalog)
    pub fn is_missing(&self) -> bool {
        self.name.is_empty()
    }
}
