use crate::schema::ticker::TickerCode;
use serde::{Deserialize, Serialize};

/// One row of the exchange's company directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyListing {
    pub name: String,
    pub code: TickerCode,
}

/// One row of the full market listing, as ranked by market capitalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketListing {
    pub code: TickerCode,
    pub name: String,
    pub market: String,
    pub last_close: f64,
    /// Signed percentage change versus the prior session.
    pub change_percent: f64,
    /// Market capitalization in KRW.
    pub market_cap: u64,
}
