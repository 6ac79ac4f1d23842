//! Ticker lookup, price history and market movers for KRX-listed stocks.

/// Explicit time-to-live cache shared by the listing and movers snapshots
pub mod cache;

/// Exchange-local dates
pub mod calendar;

/// Environment-driven settings
pub mod config;

/// Remote listing and market data sources
pub mod data;

pub mod errors;

/// Moving averages over a fetched price history
pub mod indicators;

pub mod history;

/// Company listing cache
pub mod listing;

pub mod logger;

/// Top movers snapshot
pub mod movers;

/// Company name or code to ticker code resolution
pub mod resolver;

pub mod schema;

pub use errors::{Error, Result};
