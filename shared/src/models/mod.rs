//! Data models
//!
//! Catalog rows as they are seen from an order: the engine joins the
//! current catalog state at read time and never copies it at write time
//! (beyond the prices captured on the order itself).

pub mod catalog;

// Re-exports
pub use catalog::*;
