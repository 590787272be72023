//! Utilities - logging and business calendar helpers

pub mod logger;
pub mod time;
