//! Order domain types
//!
//! - [`OrderDraft`]: a sale as submitted by a register
//! - [`Order`]: the persisted aggregate (header, lines, options, discounts)
//! - [`SalesSummary`]: aggregated figures over a window

mod aggregate;
mod draft;
mod summary;
mod types;

pub use aggregate::{AppliedDiscount, LineOption, Order, OrderLine};
pub use draft::{DiscountDraft, LineDraft, LineOptionDraft, OrderDraft};
pub use summary::SalesSummary;
pub use types::{OrderStatus, TenderMethod, UnknownVariant};
