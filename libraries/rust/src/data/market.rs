use crate::calendar;
use crate::data::client::MarketData;
use crate::data::{krx, naver};
use crate::errors::Result;
use crate::schema::{MarketListing, PriceBar, TickerCode};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client as HTTPClient;
use reqwest::Url;

/// Market data backed by Naver for history and the KRX data portal for the
/// ranked listing.
#[derive(Clone)]
pub struct Client {
    chart_url: Url,
    krx_data_url: Url,
    http_client: HTTPClient,
}

impl Client {
    pub fn new(chart_url: &str, krx_data_url: &str, http_client: HTTPClient) -> Result<Self> {
        Ok(Client {
            chart_url: Url::parse(chart_url)?,
            krx_data_url: Url::parse(krx_data_url)?,
            http_client,
        })
    }
}

#[async_trait]
impl MarketData for Client {
    async fn fetch_history(
        &self,
        code: TickerCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        naver::fetch_daily_bars(&self.http_client, &self.chart_url, &code, start, end).await
    }

    async fn fetch_market_listing(&self) -> Result<Vec<MarketListing>> {
        let trade_date = calendar::latest_weekday(calendar::today());

        krx::fetch_market_listing(&self.http_client, &self.krx_data_url, trade_date).await
    }
}
