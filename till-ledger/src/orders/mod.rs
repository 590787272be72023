//! Order persistence engine
//!
//! - [`OrderStore`]: atomic create, date-ranged reconstruction, refund
//! - [`SalesReporter`]: single-statement summaries over a window
//! - [`IdGenerator`]: collision-checked `prefix + 6 digits` identifiers
//! - [`DisplaySequence`]: daily ticket number with wraparound

pub mod clock;
pub mod error;
pub mod ids;
pub mod money;
pub mod reporting;
mod rows;
pub mod sequence;
pub mod store;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LedgerError, LedgerResult};
pub use ids::{IdGenerator, IdKind, IdNamespace};
pub use reporting::SalesReporter;
pub use sequence::DisplaySequence;
pub use store::OrderStore;
