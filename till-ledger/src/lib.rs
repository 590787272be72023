//! Till Ledger - order and transaction persistence for the till
//!
//! # Overview
//!
//! Turns a sale assembled at a register into a durable order record in
//! SQLite, assigns it a daily display number, and aggregates recorded
//! orders into sales summaries.
//!
//! ```text
//! till-ledger/src/
//! ├── core/      # configuration
//! ├── db/        # SQLite pool + migrations
//! ├── orders/    # store, reporting, ids, sequence
//! └── utils/     # logging, business calendar
//! ```
//!
//! # Example
//!
//! ```ignore
//! let config = Config::from_env();
//! let db = DbService::new(&config.db_path).await?;
//! let store = OrderStore::new(db.pool.clone(), &config);
//! let order = store.create(draft).await?;
//! let summary = SalesReporter::new(db.pool, &config).summarize_today().await?;
//! ```

pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use core::{Config, RefundPolicy};
pub use db::DbService;
pub use orders::{
    Clock, DisplaySequence, IdGenerator, IdKind, IdNamespace, LedgerError, LedgerResult,
    ManualClock, OrderStore, SalesReporter, SystemClock,
};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
