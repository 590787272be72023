//! Core module - configuration
//!
//! - [`Config`] - ledger configuration
//! - [`RefundPolicy`] - how refunds treat missing or already-refunded orders

pub mod config;

pub use config::{Config, RefundPolicy};
