use crate::errors::Result;
use crate::schema::{CompanyListing, MarketListing, PriceBar, TickerCode};
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;

/// The exchange's company directory.
#[automock]
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<CompanyListing>>;
}

/// Market data provider.
#[automock]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily bars between `start` and `end` inclusive, oldest first. A range
    /// with no trading sessions is an empty vector, not an error.
    async fn fetch_history(
        &self,
        code: TickerCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>>;

    /// Every listed security with its close, change rate and market cap.
    async fn fetch_market_listing(&self) -> Result<Vec<MarketListing>>;
}
