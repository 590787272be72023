//! Shared types for the till ledger
//!
//! Domain types used by the persistence engine and by any outer layer
//! (request handlers, printers, sync): the order aggregate, the drafts a
//! register submits, the reporting summary, catalog snapshots and the
//! unified error code system.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{
    AppliedDiscount, DiscountDraft, LineDraft, LineOption, LineOptionDraft, Order, OrderDraft,
    OrderLine, OrderStatus, SalesSummary, TenderMethod,
};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
