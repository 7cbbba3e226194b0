//! Core domain types and logic.

pub mod ohlcv;
pub mod timeline;
pub mod indicator;
pub mod dbs;
pub mod trend;
pub mod monitor;
pub mod config_validation;
pub mod error;
